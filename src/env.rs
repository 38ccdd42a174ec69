//! Name and path constants shared across the crate.
//!
//! Centralizes the cookie name, on-disk file names, and path helpers so the
//! store implementations and tests agree on a single source of truth.

use std::path::{Path, PathBuf};

/// Default name of the session identifier cookie.
pub const DEFAULT_COOKIE_NAME: &str = "sid";

/// Default inactivity timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: i64 = 1800;

/// Default store-side garbage collection horizon in seconds.
pub const DEFAULT_GC_MAXLIFETIME_SECS: i64 = 86400;

/// File-store related names.
pub mod store {
    /// Directory name used when a save path is derived from a parent directory.
    pub const SESSIONS_DIR_NAME: &str = "sessions";

    /// Extension of persisted session documents.
    pub const RECORD_FILE_EXT: &str = "json";

    /// Suffix appended to a record file while an atomic write is in flight.
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";
}

/// Build the record file path for a session identifier under a save path.
pub fn record_file_path(save_path: &Path, id: &str) -> PathBuf {
    save_path.join(format!("{}.{}", id, store::RECORD_FILE_EXT))
}
