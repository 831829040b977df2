//! Plot module - Turns resolved locations and a numeric dataset into map markers
//!
//! The map itself is drawn elsewhere. This module only consumes a
//! name -> coordinates mapping and computes what should be drawn where.

pub mod markers;
pub mod projection;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub use markers::{build_markers, Marker};
pub use projection::MercatorProjection;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path:?}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("baseline must be a finite, non-zero number (got {0})")]
    InvalidBaseline(f64),

    #[error("value for \"{0}\" is not a finite number")]
    InvalidValue(String),
}

/// Per-location values compared against a common baseline
///
/// ```json
/// { "data": { "UK": 120.0, "India": 80.0 }, "baseline": 100.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub data: BTreeMap<String, f64>,
    pub baseline: f64,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let display = path.to_string_lossy().to_string();
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: display.clone(),
            source,
        })?;
        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
                path: display,
                source,
            })?;
        dataset.validate()
    }

    pub fn validate(self) -> Result<Self, DatasetError> {
        if !self.baseline.is_finite() || self.baseline == 0.0 {
            return Err(DatasetError::InvalidBaseline(self.baseline));
        }
        if let Some((name, _)) = self.data.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DatasetError::InvalidValue(name.clone()));
        }
        Ok(self)
    }

    /// Location names in dataset order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}
