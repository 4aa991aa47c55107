//! Movie record model and validation bounds.

use chrono::Datelike;

use crate::error::CatalogError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;
pub const MIN_YEAR: i32 = 1900;

/// Upper bound for manually entered release years.
pub fn max_year() -> i32 {
    chrono::Local::now().year()
}

/// One cataloged movie. Field names in the serialized form match the
/// legacy catalog file (`Title` / `Rating` / `Year` / `Poster`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Movie {
    pub fn new(title: impl Into<String>, rating: f64, year: i32) -> Self {
        Self {
            title: title.into(),
            rating,
            year,
            poster: None,
        }
    }

    pub fn with_poster(
        title: impl Into<String>,
        rating: f64,
        year: i32,
        poster: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            rating,
            year,
            poster: Some(poster.into()),
        }
    }
}

/// A record is rejected whole when any field fails; these helpers carry
/// the per-field rules.
pub fn validate_title(title: &str) -> Result<String, CatalogError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(
            "movie title must not be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_rating(rating: f64) -> Result<f64, CatalogError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CatalogError::Validation(format!(
            "rating {} is invalid, expected {} to {}",
            rating, MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}

pub fn validate_year(year: i32) -> Result<i32, CatalogError> {
    let max = max_year();
    if year < MIN_YEAR || year > max {
        return Err(CatalogError::Validation(format!(
            "year {} is invalid, expected {} to {}",
            year, MIN_YEAR, max
        )));
    }
    Ok(year)
}
