//! Gazetteer backend - Resolves names from a local JSON file
//!
//! The file is a JSON object mapping place names to coordinates, in the same
//! shape as a cache snapshot:
//!
//! ```json
//! { "Canada": { "latitude": 56.13, "longitude": -106.35 } }
//! ```

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{Coordinates, Geocoder, ResolveError};

pub struct GazetteerGeocoder {
    places: HashMap<String, Coordinates>,
}

impl GazetteerGeocoder {
    /// Load a gazetteer file. Names are matched exactly (case-sensitive).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer: {:?}", path))?;
        let places: HashMap<String, Coordinates> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse gazetteer: {:?}", path))?;

        let gazetteer = Self::from_places(places);
        debug!(path = %path.display(), places = gazetteer.len(), "loaded gazetteer");
        Ok(gazetteer)
    }

    pub fn from_places(places: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            places: places.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }
}

impl Geocoder for GazetteerGeocoder {
    fn resolve(&self, name: &str) -> Result<Coordinates, ResolveError> {
        self.places
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_and_resolve() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("places.json");
        fs::write(
            &path,
            r#"{"India": {"latitude": 20.59, "longitude": 78.96}, "UK": {"latitude": 55.37, "longitude": -3.43}}"#,
        )
        .unwrap();

        let gazetteer = GazetteerGeocoder::load(&path).unwrap();
        assert_eq!(gazetteer.len(), 2);

        let india = gazetteer.resolve("India").unwrap();
        assert_eq!(india.latitude, 20.59);
        assert_eq!(india.longitude, 78.96);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let gazetteer =
            GazetteerGeocoder::from_places([("UK".to_string(), Coordinates::new(55.37, -3.43))]);
        assert!(gazetteer.resolve("UK").is_ok());
        let err = gazetteer.resolve("uk").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let result = GazetteerGeocoder::load(&temp.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = GazetteerGeocoder::load(&path).err().unwrap();
        assert!(err.to_string().contains("Failed to parse gazetteer"));
    }
}
