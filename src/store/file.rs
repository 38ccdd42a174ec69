use super::{SessionStore, is_valid_id, mint_id};
use crate::env;
use crate::session::record::SessionRecord;
use crate::session::types::{SessionError, SessionStatus};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// File-backed session store: one JSON document per identifier under a save
/// path directory.
///
/// Writes are atomic (temp file in the same directory, then rename) so a
/// crash mid-persist never leaves a torn record. Documents whose mtime is
/// older than the configured max lifetime are garbage collected on `start`.
pub struct FileStore {
    save_path: PathBuf,
    cookie_name: String,
    client_id: Option<String>,
    bound_id: Option<String>,
    strict_mode: bool,
    max_lifetime_secs: i64,
}

impl FileStore {
    /// Open a store rooted at `save_path`, resuming the identifier the client
    /// presented (if any). The directory is created when missing.
    pub fn new(
        save_path: impl Into<PathBuf>,
        client_id: Option<String>,
    ) -> Result<Self, SessionError> {
        let save_path = save_path.into();
        fs::create_dir_all(&save_path)?;
        Ok(Self {
            save_path,
            cookie_name: env::DEFAULT_COOKIE_NAME.to_string(),
            client_id,
            bound_id: None,
            strict_mode: true,
            max_lifetime_secs: env::DEFAULT_GC_MAXLIFETIME_SECS,
        })
    }

    /// Override the cookie name (default `sid`).
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    fn record_path(&self, id: &str) -> PathBuf {
        env::record_file_path(&self.save_path, id)
    }

    fn read_record(&self, id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let path = self.record_path(id);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                let record = serde_json::from_str(&raw)?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the record under `id` via temp file + rename.
    fn write_record(&self, id: &str, record: &SessionRecord) -> Result<(), SessionError> {
        let path = self.record_path(id);
        let temp_path = temp_path_for(&path);
        let json = serde_json::to_string(record)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove_record(&self, id: &str) -> Result<(), SessionError> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove documents past the max lifetime. Unreadable entries are logged
    /// and skipped rather than failing the start.
    fn gc(&self) {
        let horizon = Duration::from_secs(self.max_lifetime_secs.max(0) as u64);
        let entries = match fs::read_dir(&self.save_path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("session gc skipped, cannot read save path: {}", e);
                return;
            }
        };
        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(env::store::RECORD_FILE_EXT) {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|mtime| {
                    SystemTime::now()
                        .duration_since(mtime)
                        .map(|age| age > horizon)
                        .unwrap_or(false)
                })
                .unwrap_or(false);
            if expired && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "garbage collected expired session records");
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(env::store::TEMP_FILE_SUFFIX);
    PathBuf::from(os)
}

impl SessionStore for FileStore {
    fn configure(&mut self, strict_mode: bool, max_lifetime_secs: i64, _cookie_only: bool) {
        self.strict_mode = strict_mode;
        self.max_lifetime_secs = max_lifetime_secs;
    }

    fn start(&mut self) -> Result<SessionRecord, SessionError> {
        if let Some(id) = &self.bound_id {
            return Ok(self.read_record(&id.clone())?.unwrap_or_default());
        }

        self.gc();

        if let Some(id) = self.client_id.take().filter(|id| is_valid_id(id)) {
            if let Some(record) = self.read_record(&id)? {
                debug!(id, "resumed session");
                self.bound_id = Some(id);
                return Ok(record);
            }
            if !self.strict_mode {
                let record = SessionRecord::new();
                self.write_record(&id, &record)?;
                self.bound_id = Some(id);
                return Ok(record);
            }
        }

        let id = mint_id();
        let record = SessionRecord::new();
        self.write_record(&id, &record)?;
        debug!(id, "started new session");
        self.bound_id = Some(id);
        Ok(record)
    }

    fn persist(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        if let Some(id) = self.bound_id.clone() {
            self.write_record(&id, record)?;
        }
        Ok(())
    }

    fn unset_all(&mut self) -> Result<(), SessionError> {
        if let Some(id) = self.bound_id.clone() {
            self.write_record(&id, &SessionRecord::new())?;
        }
        Ok(())
    }

    fn destroy_session(&mut self) -> Result<(), SessionError> {
        if let Some(id) = self.bound_id.take() {
            self.remove_record(&id)?;
            debug!(id, "destroyed session");
        }
        Ok(())
    }

    fn regenerate_id(&mut self, delete_old: bool) -> Result<String, SessionError> {
        let Some(old_id) = self.bound_id.clone() else {
            return Err(SessionError::Internal(
                "cannot regenerate an unbound session".to_string(),
            ));
        };
        let record = self.read_record(&old_id)?.unwrap_or_default();
        let new_id = mint_id();
        self.write_record(&new_id, &record)?;
        if delete_old {
            self.remove_record(&old_id)?;
        }
        debug!(old_id, new_id, "regenerated session identifier");
        self.bound_id = Some(new_id.clone());
        Ok(new_id)
    }

    fn current_id(&self) -> String {
        self.bound_id.clone().unwrap_or_default()
    }

    fn cookie_name(&self) -> String {
        self.cookie_name.clone()
    }

    fn save_path(&self) -> PathBuf {
        self.save_path.clone()
    }

    fn status(&self) -> SessionStatus {
        if self.bound_id.is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        }
    }
}
