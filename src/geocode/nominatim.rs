//! Nominatim backend - OpenStreetMap forward geocoding over HTTP

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::{Coordinates, Geocoder, ResolveError};

/// Public OpenStreetMap instance
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub const DEFAULT_USER_AGENT: &str = concat!("geocache/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for a Nominatim-compatible endpoint
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct NominatimGeocoder {
    search_url: String,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    /// Build the HTTP client once; every `resolve` reuses it.
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .context("Failed to build Nominatim HTTP client")?;

        Ok(Self {
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            client,
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, name: &str) -> Result<Coordinates, ResolveError> {
        let transport = |message: String| ResolveError::Transport {
            name: name.to_string(),
            message,
        };

        debug!(name, url = %self.search_url, "querying Nominatim");
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", name), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("Nominatim returned status {}", status)));
        }

        let body = response.text().map_err(|e| transport(e.to_string()))?;
        parse_search_response(name, &body)
    }
}

/// Interpret the body of a `/search?format=jsonv2` response.
///
/// The first result wins. Nominatim encodes lat/lon as strings.
pub fn parse_search_response(name: &str, body: &str) -> Result<Coordinates, ResolveError> {
    let malformed = |message: String| ResolveError::Malformed {
        name: name.to_string(),
        message,
    };

    let results: Vec<Value> =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NotFound {
            name: name.to_string(),
        })?;

    let latitude = coordinate_field(&first, "lat").map_err(&malformed)?;
    let longitude = coordinate_field(&first, "lon").map_err(&malformed)?;

    let coords = Coordinates::new(latitude, longitude);
    coords.validate().map_err(&malformed)?;
    Ok(coords.with_raw(first))
}

fn coordinate_field(result: &Value, field: &str) -> Result<f64, String> {
    let value = match result.get(field) {
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {}: {}", field, e))?,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("invalid {}: {}", field, n))?,
        Some(other) => return Err(format!("invalid {}: {}", field, other)),
        None => return Err(format!("missing {}", field)),
    };

    // "NaN" and "inf" parse as f64 but are not positions.
    if !value.is_finite() {
        return Err(format!("invalid {}: {}", field, value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_result() {
        let body = r#"[
            {"place_id": 1, "lat": "56.1303673", "lon": "-106.3467712", "display_name": "Canada"},
            {"place_id": 2, "lat": "0", "lon": "0", "display_name": "Elsewhere"}
        ]"#;

        let coords = parse_search_response("Canada", body).unwrap();
        assert_eq!(coords.latitude, 56.1303673);
        assert_eq!(coords.longitude, -106.3467712);
        assert_eq!(coords.display_name(), Some("Canada"));
    }

    #[test]
    fn test_parse_numeric_fields() {
        let body = r#"[{"lat": 48.85, "lon": 2.35}]"#;
        let coords = parse_search_response("Paris", body).unwrap();
        assert_eq!(coords.latitude, 48.85);
        assert_eq!(coords.longitude, 2.35);
    }

    #[test]
    fn test_parse_empty_is_not_found() {
        let err = parse_search_response("Atlantis", "[]").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { ref name } if name == "Atlantis"));
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        let err = parse_search_response("USA", "<html>rate limited</html>").unwrap_err();
        assert_eq!(err.code(), "MALFORMED");
    }

    #[test]
    fn test_parse_bad_latitude_is_malformed() {
        let err = parse_search_response("USA", r#"[{"lat": "north", "lon": "1"}]"#).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(err.to_string().contains("lat"));
    }

    #[test]
    fn test_parse_missing_longitude_is_malformed() {
        let err = parse_search_response("USA", r#"[{"lat": "1"}]"#).unwrap_err();
        assert!(err.to_string().contains("missing lon"));
    }

    #[test]
    fn test_parse_non_finite_is_malformed() {
        let err = parse_search_response("X", r#"[{"lat": "NaN", "lon": "1"}]"#).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(err.to_string().contains("lat"));

        let err = parse_search_response("X", r#"[{"lat": "1", "lon": "inf"}]"#).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(err.to_string().contains("lon"));

        let err = parse_search_response("X", r#"[{"lat": "-inf", "lon": "1"}]"#).unwrap_err();
        assert_eq!(err.code(), "MALFORMED");
    }

    #[test]
    fn test_parse_out_of_range_is_malformed() {
        let err = parse_search_response("X", r#"[{"lat": "91", "lon": "0"}]"#).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(err.to_string().contains("latitude out of range"));

        let err = parse_search_response("X", r#"[{"lat": "0", "lon": -180.5}]"#).unwrap_err();
        assert!(err.to_string().contains("longitude out of range"));
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let geocoder = NominatimGeocoder::new(NominatimConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(geocoder.search_url, "http://localhost:8080/search");
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let geocoder = NominatimGeocoder::new(NominatimConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();
        let err = geocoder.resolve("USA").unwrap_err();
        assert_eq!(err.code(), "TRANSPORT");
    }
}
