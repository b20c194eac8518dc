use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::error::ApiError;
use crate::helpers::extractors::ApiQuery;
use crate::models::place::PlacesSearchResponse;
use crate::services::google_places::retain_food_places;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/search", get(proxy_google_places_search))
        .route_layer(Extension(app_state))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlacesSearchParam {
    pub query: String,
}

pub async fn proxy_google_places_search(
    Extension(app_state): Extension<AppState>,
    ApiQuery(params): ApiQuery<PlacesSearchParam>,
) -> Result<Json<PlacesSearchResponse>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let places = app_state
        .places_client()?
        .search_text(query)
        .await
        .map_err(|e| {
            warn!("Something went wrong searching Google Places for: {}, due to: {}", query, e);
            ApiError::from(e)
        })?;

    let total = places.len();
    let places = retain_food_places(places);
    info!("Places search for {} kept {} of {} results", query, places.len(), total);

    Ok(Json(PlacesSearchResponse { places }))
}
