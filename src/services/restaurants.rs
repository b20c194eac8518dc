//! Get-or-create of restaurant rows, enrichment from the Places API and the
//! dairy-free assessment built on top of them.
//!
//! Datastore and Places failures only degrade the result (logged, then the
//! workflow carries on); the language model call is the one step whose
//! failure is surfaced to the client.

use tracing::{error, info, warn};
use crate::error::ApiError;
use crate::helpers::text::non_blank;
use crate::models::assessment::{AssessmentRequest, AssessmentResponse};
use crate::models::place::is_valid_place_id;
use crate::models::restaurant::{NewRestaurant, Restaurant};
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::services::gemini::AssessmentSubject;
use crate::state::AppState;

pub async fn assess_restaurant(
    app_state: &AppState,
    request: AssessmentRequest,
) -> Result<AssessmentResponse, ApiError> {
    let name = request.restaurant_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("restaurant_name must not be empty".to_string()));
    }

    let gemini = match app_state.gemini.as_deref() {
        Some(gemini) => gemini,
        None => return Ok(AssessmentResponse::mock()),
    };

    let requested_place_id = owned_non_blank(request.google_place_id);
    if let Some(place_id) = requested_place_id.as_deref() {
        if !is_valid_place_id(place_id) {
            return Err(ApiError::BadRequest(format!("Invalid google_place_id: {}", place_id)));
        }
    }

    let mut subject = AssessmentSubject {
        name: name.to_string(),
        description: owned_non_blank(request.description),
        website: owned_non_blank(request.website),
    };

    let mut restaurant = None;
    if let Some(repo) = app_state.postgres_repo.as_deref() {
        let lookup = NewRestaurant {
            name: subject.name.clone(),
            google_place_id: requested_place_id.clone(),
            website: subject.website.clone(),
        };
        match repo.get_or_create_restaurant(&lookup).await {
            Ok(found) => restaurant = Some(found),
            Err(e) => warn!("Failed to get or create restaurant: {}, due to: {:#}", name, e),
        }
    }

    if subject.website.is_none() {
        subject.website = restaurant.as_ref().and_then(|r| r.website.clone());
    }

    let place_id = requested_place_id
        .or_else(|| restaurant.as_ref().and_then(|r| r.google_place_id.clone()));
    let needs_enrichment = subject.website.is_none() || subject.description.is_none();
    if let (Some(place_id), Some(places), true) = (place_id.as_deref(), app_state.places.as_deref(), needs_enrichment) {
        match places.place_details(place_id).await {
            Ok(place) => {
                if subject.description.is_none() {
                    subject.description = place.summary().map(str::to_string);
                }
                if subject.website.is_none() && place.website_uri.is_some() {
                    subject.website = place.website_uri.clone();
                    if let (Some(repo), Some(found)) = (app_state.postgres_repo.as_deref(), restaurant.as_ref()) {
                        if let Err(e) = repo
                            .update_restaurant_details(found.id, None, subject.website.as_deref())
                            .await
                        {
                            warn!("Failed to store website for restaurant id: {}, due to: {:#}", found.id, e);
                        }
                    }
                }
            }
            Err(e) => warn!("Failed to enrich restaurant: {} from Google Places, due to: {}", name, e),
        }
    }

    let assessment = gemini
        .assess_restaurant(&subject)
        .await
        .map_err(|e| {
            error!("Gemini assessment failed for: {}, due to: {:#}", name, e);
            ApiError::from(e)
        })?;

    info!("Assessed {} with dairy-free score {}", name, assessment.score);
    Ok(AssessmentResponse {
        id: restaurant.map(|r| r.id),
        assessment,
    })
}

pub async fn fetch_or_create_restaurant(
    app_state: &AppState,
    place_id: &str,
) -> Result<Restaurant, ApiError> {
    if !is_valid_place_id(place_id) {
        return Err(ApiError::BadRequest(format!("Invalid place id: {}", place_id)));
    }

    let repo = app_state.postgres_repo.as_deref();
    if let Some(repo) = repo {
        match repo.find_restaurant_by_place_id(place_id).await {
            Ok(Some(restaurant)) => return Ok(fill_missing_website(app_state, repo, restaurant).await),
            Ok(None) => {}
            Err(e) => warn!("Failed to look up restaurant with place id: {}, due to: {:#}", place_id, e),
        }
    }

    let place = app_state.places_client()?.place_details(place_id).await?;
    let name = place
        .name()
        .ok_or_else(|| ApiError::BadGateway(format!("Place {} has no display name", place_id)))?;

    let lookup = NewRestaurant {
        name: name.to_string(),
        google_place_id: Some(place_id.to_string()),
        website: place.website_uri.clone(),
    };

    if let Some(repo) = repo {
        match repo.get_or_create_restaurant(&lookup).await {
            Ok(restaurant) => return Ok(restaurant),
            Err(e) => warn!("Failed to persist restaurant with place id: {}, due to: {:#}", place_id, e),
        }
    }

    Ok(Restaurant {
        id: 0,
        name: lookup.name,
        google_place_id: lookup.google_place_id,
        website: lookup.website,
    })
}

async fn fill_missing_website(
    app_state: &AppState,
    repo: &PostgresConnectionRepo,
    restaurant: Restaurant,
) -> Restaurant {
    let (places, place_id) = match (app_state.places.as_deref(), restaurant.google_place_id.as_deref()) {
        (Some(places), Some(place_id)) if restaurant.website.is_none() => (places, place_id),
        _ => return restaurant,
    };

    let website = match places.place_details(place_id).await {
        Ok(place) => place.website_uri,
        Err(e) => {
            warn!("Failed to fetch place details for: {}, due to: {}", place_id, e);
            None
        }
    };

    match website {
        Some(website) => repo
            .update_restaurant_details(restaurant.id, None, Some(&website))
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to store website for restaurant id: {}, due to: {:#}", restaurant.id, e);
                Restaurant { website: Some(website), ..restaurant }
            }),
        None => restaurant,
    }
}

fn owned_non_blank(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}
