use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use crate::error::ApiError;
use crate::helpers::extractors::ApiJson;
use crate::models::assessment::{AssessmentRequest, AssessmentResponse};
use crate::models::restaurant::Restaurant;
use crate::services::restaurants;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/assess", post(assess_restaurant))
        .route("/restaurants/:place_id", get(retrieve_restaurant))
        .route_layer(Extension(app_state))
}

pub async fn assess_restaurant(
    Extension(app_state): Extension<AppState>,
    ApiJson(body): ApiJson<AssessmentRequest>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    restaurants::assess_restaurant(&app_state, body).await.map(Json)
}

pub async fn retrieve_restaurant(
    Extension(app_state): Extension<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    restaurants::fetch_or_create_restaurant(&app_state, place_id.trim())
        .await
        .map(Json)
}
