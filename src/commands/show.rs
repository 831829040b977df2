//! Show - List the snapshot without opening a session

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::cache::read_snapshot;
use crate::commands::emit;
use crate::core::model::{ResultItem, ResultSet, SourceMode};
use crate::core::render::RenderConfig;

pub fn run_show(cache_path: &Path, config: RenderConfig) -> Result<()> {
    let snapshot = read_snapshot(cache_path)
        .with_context(|| format!("Failed to read cache: {:?}", cache_path))?;

    let Some(snapshot) = snapshot else {
        info!(path = %cache_path.display(), "no cache file yet");
        return Ok(());
    };

    let result_set: ResultSet = snapshot
        .iter()
        .map(|(name, coords)| ResultItem::location(name, coords, SourceMode::Snapshot))
        .collect();

    emit(&result_set, config);
    Ok(())
}
