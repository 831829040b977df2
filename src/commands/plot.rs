//! Plot - Resolve a dataset's locations and emit map markers

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::cache::with_session;
use crate::commands::{emit, resolve_names};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::RenderConfig;
use crate::geocode::Geocoder;
use crate::plot::{build_markers, Dataset, MercatorProjection};

pub fn run_plot<G: Geocoder>(
    cache_path: &Path,
    geocoder: G,
    dataset_path: &Path,
    skip_unresolved: bool,
    config: RenderConfig,
) -> Result<()> {
    let dataset = Dataset::load(dataset_path).context("Failed to load dataset")?;
    let names: Vec<String> = dataset.locations().map(str::to_string).collect();

    let resolution = with_session(cache_path, geocoder, |session| {
        resolve_names(session, &names, skip_unresolved)
    })?;

    let projection = MercatorProjection::default();
    let extent = projection.extent();
    let markers = build_markers(&dataset, &resolution.resolved, &projection);
    info!(
        width_m = extent.x,
        height_m = extent.y,
        markers = markers.len(),
        off_map = markers.iter().filter(|m| m.position.is_none()).count(),
        "built map markers"
    );

    let mut result_set: ResultSet = markers
        .iter()
        .map(ResultItem::marker)
        .collect::<Result<ResultSet, _>>()
        .context("Failed to serialize map markers")?;
    for failure in resolution.failures {
        result_set.push(failure);
    }

    emit(&result_set, config);
    Ok(())
}
