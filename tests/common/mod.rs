#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use axum::extract::Path;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use nowhey_backend::controller;
use nowhey_backend::services::gemini::GeminiClient;
use nowhey_backend::services::google_places::GooglePlacesClient;
use nowhey_backend::state::AppState;

pub const GEMINI_KEY: &str = "test-gemini-key";
pub const PLACES_KEY: &str = "test-places-key";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Request bodies (and the headers we care about) seen by a fake upstream.
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<Value>>>);

impl Recorded {
    fn push(&self, value: Value) {
        self.0.lock().unwrap().push(value);
    }

    pub fn all(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

pub fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router.into_make_service());
    tokio::spawn(async move {
        server.await.unwrap();
    });
    addr
}

pub fn spawn_app(app_state: AppState) -> String {
    let router = controller::app(app_state, vec![HeaderValue::from_static(FRONTEND_ORIGIN)]);
    format!("http://{}", spawn(router))
}

pub fn app_state(gemini: Option<SocketAddr>, places: Option<SocketAddr>) -> AppState {
    let http = reqwest::Client::new();
    AppState {
        postgres_repo: None,
        gemini: gemini.map(|addr| {
            Arc::new(GeminiClient::new(
                http.clone(),
                &format!("http://{}", addr),
                GEMINI_KEY,
                "gemini-2.0-flash",
            ))
        }),
        places: places.map(|addr| {
            Arc::new(GooglePlacesClient::new(
                http.clone(),
                &format!("http://{}/", addr),
                PLACES_KEY,
            ))
        }),
    }
}

pub fn gemini_text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [ { "text": text } ] },
                "finishReason": "STOP"
            }
        ]
    })
}

/// Fake `generateContent`: records the prompt text, rejects unknown keys.
pub fn fake_gemini(status: StatusCode, reply: Value) -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let seen = recorded.clone();

    let router = Router::new().route(
        "/v1beta/models/:model_action",
        post(move |Path(model_action): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen.clone();
            let reply = reply.clone();
            async move {
                if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(GEMINI_KEY) {
                    return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"}))).into_response();
                }
                seen.push(json!({
                    "model_action": model_action,
                    "prompt": body["contents"][0]["parts"][0]["text"],
                }));
                (status, Json(reply)).into_response()
            }
        }),
    );

    (spawn(router), recorded)
}

pub fn sample_places() -> Value {
    json!({
        "places": [
            {
                "id": "place1",
                "displayName": {"text": "Vegan Bistro"},
                "formattedAddress": "123 Green St",
                "types": ["restaurant", "vegan_restaurant", "food"]
            },
            {
                "id": "place2",
                "displayName": {"text": "Gas Station Sushi"},
                "formattedAddress": "456 Highway Rd",
                "types": ["gas_station", "store", "food"]
            },
            {
                "id": "place3",
                "displayName": {"text": "Cool Cafe"},
                "formattedAddress": "789 Bean Blvd",
                "types": ["cafe", "food", "establishment"]
            },
            {
                "id": "place4",
                "displayName": {"text": "Hardware Store"},
                "formattedAddress": "101 Tool Ln",
                "types": ["store", "point_of_interest"]
            }
        ]
    })
}

pub fn vegan_bistro_details() -> Value {
    vegan_bistro_details_for("place1")
}

/// Details for `place1` or any `place1_<suffix>` id; the suffix is carried
/// into the display name so every id maps to its own restaurant name.
pub fn vegan_bistro_details_for(place_id: &str) -> Value {
    let name = match place_id.strip_prefix("place1_") {
        Some(suffix) => format!("Vegan Bistro {}", suffix),
        None => "Vegan Bistro".to_string(),
    };
    json!({
        "id": place_id,
        "displayName": {"text": name, "languageCode": "en"},
        "formattedAddress": "123 Green St",
        "types": ["restaurant", "vegan_restaurant", "food"],
        "websiteUri": "https://veganbistro.test",
        "editorialSummary": {"text": "Plant-based bistro with house-made oat cream."}
    })
}

/// Fake Places API: `POST /v1/places:searchText` answers with `search_status`
/// and `search_reply`; `GET /v1/places/{id}` knows `place1` and `place1_*`.
pub fn fake_places(search_status: StatusCode, search_reply: Value) -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let search_seen = recorded.clone();
    let details_seen = recorded.clone();

    let router = Router::new().route(
        "/v1/*rest",
        post(move |Path(rest): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
            let seen = search_seen.clone();
            let reply = search_reply.clone();
            async move {
                let rest = rest.trim_start_matches('/').to_string();
                if rest != "places:searchText" {
                    return (StatusCode::NOT_FOUND, Json(json!({"error": "no such method"}))).into_response();
                }
                if header(&headers, "x-goog-api-key") != Some(PLACES_KEY.to_string()) {
                    return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"}))).into_response();
                }
                seen.push(json!({
                    "path": rest,
                    "field_mask": header(&headers, "x-goog-fieldmask"),
                    "body": body,
                }));
                (search_status, Json(reply)).into_response()
            }
        })
        .get(move |Path(rest): Path<String>, headers: HeaderMap| {
            let seen = details_seen.clone();
            async move {
                let rest = rest.trim_start_matches('/').to_string();
                seen.push(json!({
                    "path": rest,
                    "field_mask": header(&headers, "x-goog-fieldmask"),
                }));
                match rest.strip_prefix("places/") {
                    Some(id) if id == "place1" || id.starts_with("place1_") => {
                        (StatusCode::OK, Json(vegan_bistro_details_for(id))).into_response()
                    }
                    _ => (
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": {"code": 404, "status": "NOT_FOUND"}})),
                    )
                        .into_response(),
                }
            }
        }),
    );

    (spawn(router), recorded)
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
