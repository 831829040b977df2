//! Markers - One dot, arrow and label per dataset location

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::projection::{MercatorProjection, Point};
use super::Dataset;
use crate::geocode::Coordinates;

/// Arrow length (metres) for a value equal to the baseline
pub const UNIT_ARROW_LENGTH: f64 = 1_800_000.0;
pub const UNIT_ARROW_WIDTH: f64 = 250_000.0;
pub const UNIT_ARROW_HEAD_WIDTH: f64 = 3.0 * UNIT_ARROW_WIDTH;

/// Label offset from the dot, both axes (metres)
pub const LABEL_OFFSET: f64 = 50_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowColor {
    /// Above baseline
    Crimson,
    /// Below baseline
    Springgreen,
    /// Exactly at baseline
    Black,
}

impl ArrowColor {
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio > 1.0 {
            ArrowColor::Crimson
        } else if ratio < 1.0 {
            ArrowColor::Springgreen
        } else {
            ArrowColor::Black
        }
    }
}

/// A vertical arrow anchored at the location's dot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub length: f64,
    pub width: f64,
    pub head_width: f64,
    pub color: ArrowColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Value divided by the dataset baseline
    pub ratio: f64,
    pub arrow: Arrow,
    /// `None` when the location lies outside the map
    pub position: Option<Point>,
    pub label: Option<Point>,
}

/// Build markers for every dataset location present in `resolved`.
///
/// Locations missing from `resolved` are skipped; the caller decides whether
/// that is an error.
pub fn build_markers(
    dataset: &Dataset,
    resolved: &BTreeMap<String, Coordinates>,
    projection: &MercatorProjection,
) -> Vec<Marker> {
    dataset
        .data
        .iter()
        .filter_map(|(name, value)| {
            let coords = resolved.get(name)?;
            let ratio = value / dataset.baseline;
            let position = projection.project(coords.latitude, coords.longitude);

            Some(Marker {
                name: name.clone(),
                latitude: coords.latitude,
                longitude: coords.longitude,
                ratio,
                arrow: Arrow {
                    length: ratio * UNIT_ARROW_LENGTH,
                    width: UNIT_ARROW_WIDTH,
                    head_width: UNIT_ARROW_HEAD_WIDTH,
                    color: ArrowColor::for_ratio(ratio),
                },
                position,
                label: position.map(|p| Point {
                    x: p.x + LABEL_OFFSET,
                    y: p.y + LABEL_OFFSET,
                }),
            })
        })
        .collect()
}
