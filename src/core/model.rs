//! Unified Result Model
//!
//! Every command maps what it produced to `ResultItem`s before rendering.

use serde::{Deserialize, Serialize};

use crate::geocode::Coordinates;
use crate::plot::Marker;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Location,
    Marker,
    Error,
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Served from the session's in-memory cache
    Cache,
    /// Resolved through the geocoding provider
    Provider,
    /// Read straight from the snapshot file
    Snapshot,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Place name as requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Provider's label for the place, when it supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Structured payload (marker geometry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_mode: Option<SourceMode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    /// A resolved place
    pub fn location(name: impl Into<String>, coords: &Coordinates, source: SourceMode) -> Self {
        Self {
            kind: Kind::Location,
            name: Some(name.into()),
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
            display_name: coords.display_name().map(str::to_string),
            data: None,
            source_mode: Some(source),
            errors: Vec::new(),
        }
    }

    /// A plotted marker; geometry goes into `data`
    pub fn marker(marker: &Marker) -> serde_json::Result<Self> {
        Ok(Self {
            kind: Kind::Marker,
            name: Some(marker.name.clone()),
            latitude: Some(marker.latitude),
            longitude: Some(marker.longitude),
            display_name: None,
            data: Some(serde_json::to_value(marker)?),
            source_mode: None,
            errors: Vec::new(),
        })
    }

    /// A failure tied to a name (or to the whole command when `name` is `None`)
    pub fn error(name: Option<String>, error: ItemError) -> Self {
        Self {
            kind: Kind::Error,
            name,
            latitude: None,
            longitude: None,
            display_name: None,
            data: None,
            source_mode: None,
            errors: vec![error],
        }
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort by name for stable output; unnamed items go last
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.name, &b.name) {
            (Some(na), Some(nb)) => na.cmp(nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_item() {
        let coords = Coordinates::new(56.13, -106.35).with_raw(json!({"display_name": "Canada"}));
        let item = ResultItem::location("Canada", &coords, SourceMode::Provider);
        assert_eq!(item.kind, Kind::Location);
        assert_eq!(item.latitude, Some(56.13));
        assert_eq!(item.display_name.as_deref(), Some("Canada"));
        assert_eq!(item.source_mode, Some(SourceMode::Provider));
    }

    #[test]
    fn test_location_serializes_without_empty_fields() {
        let item = ResultItem::location("UK", &Coordinates::new(1.0, 2.0), SourceMode::Cache);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "location",
                "name": "UK",
                "latitude": 1.0,
                "longitude": 2.0,
                "source_mode": "cache"
            })
        );
    }

    #[test]
    fn test_error_item() {
        let item = ResultItem::error(
            Some("Atlantis".to_string()),
            ItemError::new("NOT_FOUND", "no geocoding result"),
        );
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "NOT_FOUND");
    }

    #[test]
    fn test_marker_item_carries_geometry() {
        use crate::plot::{build_markers, Dataset, MercatorProjection};
        use std::collections::BTreeMap;

        let dataset = Dataset {
            data: [("UK".to_string(), 150.0)].into_iter().collect(),
            baseline: 100.0,
        };
        let resolved: BTreeMap<_, _> = [("UK".to_string(), Coordinates::new(55.37, -3.43))]
            .into_iter()
            .collect();
        let markers = build_markers(&dataset, &resolved, &MercatorProjection::default());

        let item = ResultItem::marker(&markers[0]).unwrap();
        assert_eq!(item.kind, Kind::Marker);
        assert_eq!(item.name.as_deref(), Some("UK"));
        let data = item.data.unwrap();
        assert_eq!(data["ratio"].as_f64(), Some(1.5));
        assert_eq!(data["arrow"]["color"], "crimson");
    }

    #[test]
    fn test_result_set_sort() {
        let mut set: ResultSet = [
            ResultItem::error(None, ItemError::new("E", "whole command")),
            ResultItem::location("UK", &Coordinates::new(0.0, 0.0), SourceMode::Cache),
            ResultItem::location("India", &Coordinates::new(0.0, 0.0), SourceMode::Cache),
        ]
        .into_iter()
        .collect();

        set.sort();
        assert_eq!(set.items[0].name.as_deref(), Some("India"));
        assert_eq!(set.items[1].name.as_deref(), Some("UK"));
        assert!(set.items[2].name.is_none());
        assert_eq!(set.len(), 3);
    }
}
