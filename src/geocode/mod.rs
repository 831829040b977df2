//! Geocode module - Provider adapters that turn place names into coordinates
//!
//! Provides:
//! - The `Geocoder` trait every provider implements
//! - The `Coordinates` value shared by providers, the cache and consumers
//! - Nominatim (HTTP) and gazetteer (local JSON file) adapters

pub mod gazetteer;
pub mod nominatim;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resolved geographic position.
///
/// `raw` carries whatever the provider returned alongside the pair
/// (display name, bounding box, ...). Consumers are free to ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            raw: None,
        }
    }

    /// Attach provider metadata
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Check the pair is a real position on the globe.
    ///
    /// Both values must be finite, latitude within [-90, 90] and longitude
    /// within [-180, 180]. Anything else cannot be stored in a snapshot.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude out of range: {}", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude out of range: {}", self.longitude));
        }
        Ok(())
    }

    /// Human-readable label from the provider metadata, if any
    pub fn display_name(&self) -> Option<&str> {
        self.raw
            .as_ref()
            .and_then(|raw| raw.get("display_name"))
            .and_then(|name| name.as_str())
    }
}

/// Why a provider could not resolve a name
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no geocoding result for \"{name}\"")]
    NotFound { name: String },

    #[error("geocoding request for \"{name}\" failed: {message}")]
    Transport { name: String, message: String },

    #[error("malformed geocoding response for \"{name}\": {message}")]
    Malformed { name: String, message: String },
}

impl ResolveError {
    /// Stable code used when a failure is rendered as a result item
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::NotFound { .. } => "NOT_FOUND",
            ResolveError::Transport { .. } => "TRANSPORT",
            ResolveError::Malformed { .. } => "MALFORMED",
        }
    }
}

/// A geocoding provider.
///
/// Each call to `resolve` performs exactly one provider request. Providers do
/// not cache and do not retry; that is left to the caller.
pub trait Geocoder {
    fn resolve(&self, name: &str) -> Result<Coordinates, ResolveError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn resolve(&self, name: &str) -> Result<Coordinates, ResolveError> {
        (**self).resolve(name)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn resolve(&self, name: &str) -> Result<Coordinates, ResolveError> {
        (**self).resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinates_serialize_without_raw() {
        let coords = Coordinates::new(56.13, -106.35);
        let json = serde_json::to_value(&coords).unwrap();
        assert_eq!(json, json!({"latitude": 56.13, "longitude": -106.35}));
    }

    #[test]
    fn test_coordinates_deserialize_missing_raw() {
        let coords: Coordinates =
            serde_json::from_str(r#"{"latitude": 1.5, "longitude": -2.5}"#).unwrap();
        assert_eq!(coords, Coordinates::new(1.5, -2.5));
    }

    #[test]
    fn test_display_name() {
        let coords =
            Coordinates::new(51.5, -0.1).with_raw(json!({"display_name": "United Kingdom"}));
        assert_eq!(coords.display_name(), Some("United Kingdom"));
        assert_eq!(Coordinates::new(0.0, 0.0).display_name(), None);
    }

    #[test]
    fn test_validate_range() {
        assert!(Coordinates::new(90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());

        let err = Coordinates::new(90.5, 0.0).validate().unwrap_err();
        assert!(err.contains("latitude"));
        let err = Coordinates::new(0.0, -180.1).validate().unwrap_err();
        assert!(err.contains("longitude"));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).validate().is_err());
        assert!(Coordinates::new(f64::NEG_INFINITY, 0.0).validate().is_err());
    }

    #[test]
    fn test_resolve_error_codes() {
        let not_found = ResolveError::NotFound {
            name: "Atlantis".to_string(),
        };
        assert_eq!(not_found.code(), "NOT_FOUND");
        assert!(not_found.to_string().contains("Atlantis"));

        let transport = ResolveError::Transport {
            name: "USA".to_string(),
            message: "timed out".to_string(),
        };
        assert_eq!(transport.code(), "TRANSPORT");
    }

    struct Fixed;

    impl Geocoder for Fixed {
        fn resolve(&self, _name: &str) -> Result<Coordinates, ResolveError> {
            Ok(Coordinates::new(1.0, 2.0))
        }
    }

    #[test]
    fn test_blanket_impls() {
        let fixed = Fixed;
        let by_ref: &dyn Geocoder = &fixed;
        assert_eq!(by_ref.resolve("x").unwrap().longitude, 2.0);

        let boxed: Box<dyn Geocoder> = Box::new(Fixed);
        assert_eq!(boxed.resolve("x").unwrap().latitude, 1.0);
    }
}
