use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use crate::error::ApiError;
use crate::helpers::extractors::{ApiJson, ApiQuery};
use crate::models::review::{Review, ReviewRequest};
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_restaurant_reviews).post(add_review))
        .route_layer(Extension(app_state))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RetrieveRestaurantReviews {
    pub restaurant_name: String,
}

/// Reviews of every restaurant row carrying this name, so branches of a chain
/// share one list. Datastore failures degrade to an empty list.
pub async fn retrieve_restaurant_reviews(
    Extension(app_state): Extension<AppState>,
    ApiQuery(query): ApiQuery<RetrieveRestaurantReviews>,
) -> Json<Vec<Review>> {
    let postgres_repo = match app_state.postgres_repo.as_deref() {
        Some(repo) => repo,
        None => return Json(Vec::new()),
    };

    let restaurant_name = query.restaurant_name.trim();
    match postgres_repo.retrieve_reviews_by_restaurant_name(restaurant_name).await {
        Ok(reviews) => Json(reviews),
        Err(e) => {
            warn!("Something went wrong retrieving reviews for restaurant: {}, due to: {:#}", restaurant_name, e);
            Json(Vec::new())
        }
    }
}

pub async fn add_review(
    Extension(app_state): Extension<AppState>,
    ApiJson(body): ApiJson<ReviewRequest>,
) -> Result<Response, ApiError> {
    body.validate()?;

    let postgres_repo = match app_state.postgres_repo.as_deref() {
        Some(repo) => repo,
        None => {
            return Ok(Json(json!({ "message": "Review saved (Mock - DB not connected)" })).into_response());
        }
    };

    let inserted = postgres_repo
        .add_review(&body)
        .await
        .map_err(|e| {
            error!("Something went wrong adding review for restaurant due to: {:#}", e);
            ApiError::from(e)
        })?;

    Ok(Json(inserted).into_response())
}
