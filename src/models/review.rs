use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::error::ApiError;

pub const MAX_RATING: f64 = 5.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_name: String,
    pub rating: f64,
    pub review: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReviewRequest {
    pub restaurant_id: i64,
    pub user_name: String,
    pub rating: f64,
    pub review: String,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.user_name.trim().is_empty() {
            return Err(ApiError::BadRequest("user_name must not be empty".to_string()));
        }
        if self.review.trim().is_empty() {
            return Err(ApiError::BadRequest("review must not be empty".to_string()));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ApiError::BadRequest(format!(
                "rating must be between 0 and {}",
                MAX_RATING
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request(rating: f64) -> ReviewRequest {
        ReviewRequest {
            restaurant_id: 1,
            user_name: "sam".to_string(),
            rating,
            review: "Oat milk latte was great".to_string(),
        }
    }

    #[test]
    fn accepts_half_star_ratings_in_range() {
        assert!(request(0.0).validate().is_ok());
        assert!(request(4.5).validate().is_ok());
        assert!(request(5.0).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_or_nan_rating() {
        assert!(request(-0.5).validate().is_err());
        assert!(request(5.5).validate().is_err());
        assert!(request(f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_blank_user_or_text() {
        let mut blank_user = request(3.0);
        blank_user.user_name = "   ".to_string();
        assert!(blank_user.validate().is_err());

        let mut blank_review = request(3.0);
        blank_review.review = String::new();
        assert!(blank_review.validate().is_err());
    }

    #[test]
    fn created_at_serializes_as_rfc3339() {
        let review = Review {
            id: 3,
            restaurant_id: 1,
            user_name: "sam".to_string(),
            rating: 4.0,
            review: "ok".to_string(),
            created_at: datetime!(2024-05-01 12:30:00 UTC),
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["created_at"], "2024-05-01T12:30:00Z");
    }
}
