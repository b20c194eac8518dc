use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_SCORE: u8 = 10;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AssessmentRequest {
    pub restaurant_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub google_place_id: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// What the language model is asked to return.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub summary: String,
    #[serde(default)]
    pub dairy_free_options: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AssessmentResponse {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub assessment: Assessment,
}

impl AssessmentResponse {
    /// Returned when no language model key is configured.
    pub fn mock() -> Self {
        Self {
            id: Some(0),
            assessment: Assessment {
                score: 7,
                summary: "Mock assessment (No API Key)".to_string(),
                dairy_free_options: vec!["Mock Option 1".to_string(), "Mock Option 2".to_string()],
            },
        }
    }
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, MAX_SCORE as f64) as u8)
}
