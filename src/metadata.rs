//! OMDb metadata lookup and validation.
//!
//! The fetcher rejects any response carrying a missing or `N/A` field,
//! and collapses a year-range value ("1990–1995") to its start year. A
//! rejected response never produces a partially constructed record.

use std::io::Read;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::config::MetadataConfig;
use crate::error::CatalogError;

/// The sentinel OMDb uses for absent fields.
const MISSING_SENTINEL: &str = "N/A";

/// Validated lookup result; all fields present and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

pub struct MetadataFetcher {
    http_client: ureq::Agent,
    endpoint: String,
    api_key: String,
}

impl MetadataFetcher {
    pub fn new(config: &MetadataConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .timeout_write(Duration::from_secs(config.read_timeout_secs))
            .build();
        Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Looks a title up and returns the validated record fields.
    pub fn fetch(&self, title: &str) -> Result<FetchedMovie, CatalogError> {
        let url = lookup_url(&self.endpoint, &self.api_key, title);
        debug!("Fetching metadata for \"{}\"", title);
        let response = self
            .http_client
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| CatalogError::ExternalService(format!("request failed: {}", err)))?;
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|err| {
                CatalogError::ExternalService(format!("failed to read response: {}", err))
            })?;
        let payload: Value = serde_json::from_str(&body).map_err(|err| {
            CatalogError::ExternalService(format!("invalid JSON response: {}", err))
        })?;
        parse_payload(title, &payload)
    }
}

fn lookup_url(endpoint: &str, api_key: &str, title: &str) -> String {
    format!(
        "{}?apikey={}&t={}",
        endpoint,
        urlencoding::encode(api_key),
        urlencoding::encode(title)
    )
}

/// Turns a raw OMDb payload into a validated record, or the reason it
/// cannot become one.
fn parse_payload(query: &str, payload: &Value) -> Result<FetchedMovie, CatalogError> {
    if payload.get("Response").and_then(Value::as_str) == Some("False") {
        return Err(CatalogError::NotFound(query.to_string()));
    }

    let title = required_field(payload, "Title")?;
    let year_text = required_field(payload, "Year")?;
    let year = collapse_year_range(&year_text).ok_or_else(|| {
        CatalogError::ExternalService(format!("unusable year value \"{}\"", year_text))
    })?;
    let rating_text = required_field(payload, "imdbRating")?;
    let rating = rating_text.parse::<f64>().map_err(|_| {
        CatalogError::ExternalService(format!("unusable rating value \"{}\"", rating_text))
    })?;
    let poster = required_field(payload, "Poster")?;

    Ok(FetchedMovie {
        title,
        year,
        rating,
        poster,
    })
}

fn required_field(payload: &Value, key: &str) -> Result<String, CatalogError> {
    match payload.get(key).and_then(Value::as_str) {
        Some(text) if !text.is_empty() && text != MISSING_SENTINEL => Ok(text.to_string()),
        _ => Err(CatalogError::ExternalService(format!(
            "field {} is missing from the metadata response",
            key
        ))),
    }
}

/// Start year of a range value; series years arrive as "1990–1995" or
/// "1990-" and only the start year is retained.
fn collapse_year_range(value: &str) -> Option<i32> {
    value
        .split(['\u{2013}', '-'])
        .next()
        .map(str::trim)
        .and_then(|start| start.parse::<i32>().ok())
}
