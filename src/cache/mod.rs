//! Cache module - Persistent place name -> coordinates lookup cache
//!
//! Provides:
//! - Snapshot storage (atomic JSON file)
//! - Sessions that serve lookups from memory and merge back on close

pub mod session;
pub mod snapshot;

pub use session::{with_session, CacheSession};
pub use snapshot::read_snapshot;
