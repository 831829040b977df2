//! Cache session - One open-to-close unit of work against a snapshot
//!
//! A session loads the snapshot into memory at open, serves lookups from
//! memory and falls back to the geocoder on a miss, then merges its entries
//! into whatever is on disk at close. Entries another session wrote in the
//! meantime survive the merge.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cache::snapshot::{merge_snapshot, read_snapshot, write_snapshot, CacheSnapshot};
use crate::error::{CacheError, CacheResult, SessionState};
use crate::geocode::{Coordinates, Geocoder, ResolveError};

/// Counters for a single session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub hits: usize,
    pub misses: usize,
}

/// Outcome of a successful close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseReport {
    /// Entries in the snapshot after the merge
    pub written: usize,
    /// Entries this session resolved through the geocoder
    pub added: usize,
}

pub struct CacheSession<G: Geocoder> {
    path: PathBuf,
    geocoder: G,
    entries: CacheSnapshot,
    added: BTreeSet<String>,
    stats: SessionStats,
    state: SessionState,
}

impl<G: Geocoder> CacheSession<G> {
    /// Open a session over the snapshot at `path`.
    ///
    /// A missing snapshot is created empty and persisted before returning.
    pub fn open(path: impl Into<PathBuf>, geocoder: G) -> CacheResult<Self> {
        let path = path.into();
        let entries = match read_snapshot(&path)? {
            Some(snapshot) => snapshot,
            None => {
                info!(path = %path.display(), "cache file not found, creating an empty one");
                let empty = CacheSnapshot::new();
                write_snapshot(&path, &empty)?;
                empty
            }
        };

        info!(path = %path.display(), entries = entries.len(), "opened geo cache");
        Ok(Self {
            path,
            geocoder,
            entries,
            added: BTreeSet::new(),
            stats: SessionStats::default(),
            state: SessionState::Open,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[cfg(test)]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Current in-memory entries (snapshot at open plus everything resolved since)
    pub fn entries(&self) -> &CacheSnapshot {
        &self.entries
    }

    /// Resolve a single name, from memory if possible.
    ///
    /// A failed resolution is returned as is and nothing is recorded for it.
    /// Coordinates outside the valid range count as a malformed response.
    pub fn lookup(&mut self, name: &str) -> CacheResult<Coordinates> {
        self.ensure_open("look up names")?;

        if let Some(coords) = self.entries.get(name) {
            debug!(name, "geo cache hit");
            self.stats.hits += 1;
            return Ok(coords.clone());
        }

        debug!(name, "geo cache miss, asking the geocoder");
        self.stats.misses += 1;
        let coords = self.geocoder.resolve(name)?;
        coords
            .validate()
            .map_err(|message| ResolveError::Malformed {
                name: name.to_string(),
                message,
            })?;
        debug!(
            name,
            latitude = coords.latitude,
            longitude = coords.longitude,
            "resolved"
        );

        self.entries.insert(name.to_string(), coords.clone());
        self.added.insert(name.to_string());
        Ok(coords)
    }

    /// Resolve every name in order.
    ///
    /// Stops at the first failure. Names resolved before it stay cached in
    /// this session and are persisted at close.
    pub fn lookup_many<I, S>(&mut self, names: I) -> CacheResult<BTreeMap<String, Coordinates>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open("look up names")?;

        let mut resolved = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let coords = self.lookup(name)?;
            resolved.insert(name.to_string(), coords);
        }
        Ok(resolved)
    }

    /// Merge this session's entries into the current on-disk snapshot.
    ///
    /// Reads the snapshot fresh, overlays the session (session wins on
    /// collision) and writes the result atomically. On failure the session
    /// stays open so the caller may retry; the previous snapshot is intact.
    pub fn close(&mut self) -> CacheResult<CloseReport> {
        self.ensure_open("close the session")?;

        let on_disk = read_snapshot(&self.path)?.unwrap_or_default();
        let merged = merge_snapshot(on_disk, &self.entries);
        write_snapshot(&self.path, &merged)?;

        let report = CloseReport {
            written: merged.len(),
            added: self.added.len(),
        };
        info!(
            path = %self.path.display(),
            written = report.written,
            added = report.added,
            hits = self.stats.hits,
            misses = self.stats.misses,
            "closed geo cache"
        );

        self.state = SessionState::Closed;
        self.entries.clear();
        self.added.clear();
        Ok(report)
    }

    fn ensure_open(&self, operation: &'static str) -> CacheResult<()> {
        match self.state {
            SessionState::Open => Ok(()),
            state => Err(CacheError::SessionState { state, operation }),
        }
    }
}

impl<G: Geocoder> Drop for CacheSession<G> {
    fn drop(&mut self) {
        if self.state == SessionState::Open && !self.added.is_empty() {
            warn!(
                path = %self.path.display(),
                discarded = self.added.len(),
                "geo cache session dropped without close; new entries were not saved"
            );
        }
    }
}

/// Run `f` inside a session that is closed on every exit path.
///
/// The session is closed even when `f` fails, so lookups that succeeded before
/// the failure are kept. If both `f` and the close fail, the error from `f` is
/// returned and the close error is logged.
pub fn with_session<G, T, E, F>(path: impl Into<PathBuf>, geocoder: G, f: F) -> Result<T, E>
where
    G: Geocoder,
    E: From<CacheError>,
    F: FnOnce(&mut CacheSession<G>) -> Result<T, E>,
{
    let mut session = CacheSession::open(path, geocoder)?;
    let outcome = f(&mut session);

    match (outcome, session.close()) {
        (Ok(value), Ok(_)) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(_)) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "failed to save geo cache after an earlier error");
            Err(err)
        }
    }
}
