// ── Session persistence backends ──

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CoreError;

/// Key the session record is stored under, whatever the backend.
pub const SESSION_STORAGE_KEY: &str = "auth";

/// Durable slot for the single persisted session record.
///
/// Implementations store the record verbatim; parsing is the
/// [`SessionManager`](super::SessionManager)'s job.
pub trait SessionStore: Send + Sync {
    /// The stored record, or `None` if nothing is stored.
    fn load(&self) -> Result<Option<String>, CoreError>;

    fn save(&self, record: &str) -> Result<(), CoreError>;

    /// Remove the record. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CoreError>;
}

// ── File ─────────────────────────────────────────────────────────────

/// Stores the record as `<dir>/auth.json`, or at an explicit path.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store inside `dir` under the standard file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_STORAGE_KEY}.json")),
        }
    }

    /// Store at exactly `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::Persistence {
        message: format!("cannot {action} {}: {err}", path.display()),
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &self.path, &e)),
        }
    }

    fn save(&self, record: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create", parent, &e))?;
        }
        // Write-then-rename: readers never observe a partial record.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, record).map_err(|e| io_error("write", &tmp, &e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error("write", &self.path, &e))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &self.path, &e)),
        }
    }
}

// ── Memory ───────────────────────────────────────────────────────────

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `record`.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, CoreError> {
        self.record
            .lock()
            .map_err(|_| CoreError::Internal("session store lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, CoreError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, record: &str) -> Result<(), CoreError> {
        *self.slot()? = Some(record.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), None);

        store.save(r#"{"token":"T"}"#).unwrap();
        assert!(store.path().ends_with("auth.json"));
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"token":"T"}"#));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_starts_empty() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save("x").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("x"));
    }
}
