use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use crate::error::ApiError;
use crate::models::place::{Place, PlacesSearchResponse};

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.types,\
places.websiteUri,places.rating,places.location";
const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,types,websiteUri,rating,location,editorialSummary";

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Google Places API responded with {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Failed to reach Google Places API: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<PlacesError> for ApiError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Upstream { status, body } => ApiError::Upstream { status, detail: body },
            PlacesError::Transport(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn search_text(&self, query: &str) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/v1/places:searchText", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&json!({ "textQuery": query }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let search: PlacesSearchResponse = response.json().await?;
        Ok(search.places)
    }

    /// Caller is expected to have validated `place_id`.
    pub async fn place_details(&self, place_id: &str) -> Result<Place, PlacesError> {
        let url = format!("{}/v1/places/{}", self.base_url, place_id);
        let response = self
            .http
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlacesError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Google Places API responded with {}: {}", status, body);
    Err(PlacesError::Upstream { status, body })
}

/// Drops everything that is not somewhere to eat.
pub fn retain_food_places(places: Vec<Place>) -> Vec<Place> {
    places.into_iter().filter(Place::is_food_place).collect()
}
