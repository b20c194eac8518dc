use axum::http::Uri;
use axum::response::IntoResponse;
use tracing::debug;
use crate::error::ApiError;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route matched for: {}", uri);
    ApiError::NotFound("Not Found".to_string())
}
