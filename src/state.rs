use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tracing::{info, warn};
use crate::config::Config;
use crate::error::ApiError;
use crate::repositories::postgres_repo::{connect_postgres_pool, PostgresConnectionRepo};
use crate::services::gemini::GeminiClient;
use crate::services::google_places::GooglePlacesClient;

/// Every collaborator is optional; handlers degrade when one is missing.
#[derive(Clone, Default)]
pub struct AppState {
    pub postgres_repo: Option<Arc<PostgresConnectionRepo>>,
    pub gemini: Option<Arc<GeminiClient>>,
    pub places: Option<Arc<GooglePlacesClient>>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let postgres_repo = match config.database_url() {
            Some(url) => match connect_postgres_pool(url, config.pool_size()).await {
                Ok(pool) => Some(Arc::new(PostgresConnectionRepo::new(pool))),
                Err(e) => {
                    warn!("Failed to initialise datastore, continuing without it: {:#}", e);
                    None
                }
            },
            None => {
                warn!("DATABASE_URL not set, reviews and restaurants will not be persisted");
                None
            }
        };

        let gemini = match config.gemini_api_key() {
            Some(key) => {
                info!("Using Gemini model: {}", config.gemini_model);
                Some(Arc::new(GeminiClient::new(
                    http.clone(),
                    &config.gemini_base_url,
                    key,
                    &config.gemini_model,
                )))
            }
            None => {
                warn!("Gemini API key not found, assessments will be mocked");
                None
            }
        };

        let places = match config.google_places_api_key() {
            Some(key) => Some(Arc::new(GooglePlacesClient::new(
                http,
                &config.google_places_base_url,
                key,
            ))),
            None => {
                warn!("Google Places API key not found, place lookups are disabled");
                None
            }
        };

        Ok(Self {
            postgres_repo,
            gemini,
            places,
        })
    }

    pub fn places_client(&self) -> Result<&GooglePlacesClient, ApiError> {
        self.places
            .as_deref()
            .ok_or_else(|| ApiError::ServiceUnavailable("Google Places API key not configured".to_string()))
    }
}
