//! Snapshot store - Durable name -> coordinates mapping on disk
//!
//! A snapshot is a pretty-printed JSON object with keys in sorted order.
//! Writes go to a temporary file in the target directory which is synced and
//! then renamed over the target, so readers only ever observe a complete
//! old snapshot or a complete new one.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::{CacheError, CacheResult, StorageFault};
use crate::geocode::Coordinates;

/// The unit of durable storage: place name (exact, case-sensitive) to coordinates
pub type CacheSnapshot = BTreeMap<String, Coordinates>;

/// Read the snapshot at `path`.
///
/// Returns `Ok(None)` when no file exists. Any other failure, including a file
/// that does not parse, is `StorageUnavailable`.
pub fn read_snapshot(path: &Path) -> CacheResult<Option<CacheSnapshot>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::storage(path, e)),
    };

    let snapshot: CacheSnapshot =
        serde_json::from_str(&content).map_err(|e| CacheError::storage(path, e))?;
    Ok(Some(snapshot))
}

/// Atomically replace the snapshot at `path`.
///
/// The previous file is left untouched unless the new one was fully written
/// and synced. An entry that would not read back (non-finite or out-of-range
/// coordinates) fails the whole write. The replacement keeps the permissions
/// of the file it replaces.
pub fn write_snapshot(path: &Path, snapshot: &CacheSnapshot) -> CacheResult<()> {
    for (name, coords) in snapshot {
        coords.validate().map_err(|reason| {
            CacheError::storage(
                path,
                StorageFault::InvalidEntry {
                    name: name.clone(),
                    reason,
                },
            )
        })?;
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| CacheError::storage(path, e))?;

    let mut bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| CacheError::storage(path, e))?;
    bytes.push(b'\n');

    // Dropping the temp file on any early return removes it.
    let mut temp = tempfile::Builder::new()
        .prefix(".geocache-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CacheError::storage(path, e))?;

    temp.write_all(&bytes)
        .and_then(|_| temp.flush())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| CacheError::storage(path, e))?;

    match fs::metadata(path) {
        Ok(existing) => temp
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| CacheError::storage(path, e))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(CacheError::storage(path, e)),
    }

    temp.persist(path)
        .map_err(|e| CacheError::storage(path, e.error))?;

    Ok(())
}

/// Overlay `session` entries onto `base`; on key collision the session wins.
pub fn merge_snapshot(mut base: CacheSnapshot, session: &CacheSnapshot) -> CacheSnapshot {
    for (name, coords) in session {
        base.insert(name.clone(), coords.clone());
    }
    base
}
