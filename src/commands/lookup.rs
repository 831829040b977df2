//! Lookup - Resolve place names through the cache

use anyhow::Result;
use std::path::Path;

use crate::cache::with_session;
use crate::commands::{emit, resolve_names};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::RenderConfig;
use crate::geocode::Geocoder;

pub fn run_lookup<G: Geocoder>(
    cache_path: &Path,
    geocoder: G,
    names: &[String],
    skip_unresolved: bool,
    config: RenderConfig,
) -> Result<()> {
    let result_set = with_session(cache_path, geocoder, |session| -> Result<ResultSet> {
        let resolution = resolve_names(session, names, skip_unresolved)?;

        let mut result_set: ResultSet = resolution
            .resolved
            .iter()
            .map(|(name, coords)| ResultItem::location(name, coords, resolution.source_of(name)))
            .collect();
        for failure in resolution.failures {
            result_set.push(failure);
        }
        result_set.sort();
        Ok(result_set)
    })?;

    emit(&result_set, config);
    Ok(())
}
