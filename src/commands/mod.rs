//! Command handlers - Glue between the CLI, the cache session and rendering

pub mod lookup;
pub mod plot;
pub mod show;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::cache::CacheSession;
use crate::core::model::{ItemError, ResultItem, ResultSet, SourceMode};
use crate::core::render::{RenderConfig, Renderer};
use crate::error::CacheError;
use crate::geocode::{Coordinates, Geocoder};

/// Names resolved in one pass, plus what could not be resolved
pub struct Resolution {
    pub resolved: BTreeMap<String, Coordinates>,
    /// Names that were already cached before this pass
    pub cached: BTreeSet<String>,
    /// One error item per unresolved name (only with `skip_unresolved`)
    pub failures: Vec<ResultItem>,
}

impl Resolution {
    pub fn source_of(&self, name: &str) -> SourceMode {
        if self.cached.contains(name) {
            SourceMode::Cache
        } else {
            SourceMode::Provider
        }
    }
}

/// Resolve `names` through `session`.
///
/// Without `skip_unresolved` the first provider failure aborts the batch.
/// With it, each failed name becomes an error item and the batch continues.
/// Storage and session errors always abort.
pub fn resolve_names<G: Geocoder>(
    session: &mut CacheSession<G>,
    names: &[String],
    skip_unresolved: bool,
) -> Result<Resolution> {
    let cached: BTreeSet<String> = names
        .iter()
        .filter(|name| session.entries().contains_key(name.as_str()))
        .cloned()
        .collect();

    if !skip_unresolved {
        let resolved = session
            .lookup_many(names)
            .context("Failed to resolve place names")?;
        return Ok(Resolution {
            resolved,
            cached,
            failures: Vec::new(),
        });
    }

    let mut resolved = BTreeMap::new();
    let mut failures = Vec::new();
    for name in names {
        match session.lookup(name) {
            Ok(coords) => {
                resolved.insert(name.clone(), coords);
            }
            Err(CacheError::Resolution(err)) => {
                warn!(name = name.as_str(), error = %err, "skipping unresolved place");
                failures.push(ResultItem::error(
                    Some(name.clone()),
                    ItemError::new(err.code(), err.to_string()),
                ));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Resolution {
        resolved,
        cached,
        failures,
    })
}

/// Print a result set to stdout in the configured format
pub fn emit(result_set: &ResultSet, config: RenderConfig) {
    if result_set.is_empty() {
        return;
    }
    debug!(items = result_set.len(), "rendering results");
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(result_set));
}
