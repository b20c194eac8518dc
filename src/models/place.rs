use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Place types that count as somewhere you can eat.
pub const FOOD_PLACE_TYPES: [&str; 8] = [
    "restaurant",
    "food",
    "cafe",
    "bakery",
    "bar",
    "meal_takeaway",
    "meal_delivery",
    "coffee_shop",
];

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub website_uri: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<LatLng>,
    pub editorial_summary: Option<LocalizedText>,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    pub language_code: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

impl Place {
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .map(|n| n.text.trim())
            .filter(|n| !n.is_empty())
    }

    pub fn summary(&self) -> Option<&str> {
        self.editorial_summary
            .as_ref()
            .map(|s| s.text.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn is_food_place(&self) -> bool {
        self.types.iter().any(|t| {
            FOOD_PLACE_TYPES.contains(&t.as_str()) || t.ends_with("_restaurant")
        })
    }
}

/// Place ids are opaque url-safe tokens; anything else never reaches the upstream path.
pub fn is_valid_place_id(place_id: &str) -> bool {
    !place_id.is_empty()
        && place_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
