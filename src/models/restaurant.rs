use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub google_place_id: Option<String>,
    pub website: Option<String>,
}

/// Lookup / insert key for the get-or-create path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub google_place_id: Option<String>,
    pub website: Option<String>,
}
