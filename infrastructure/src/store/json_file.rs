//! JSON file session store.
//!
//! One pretty-printed JSON file per session under a shared directory.
//! Writes go through a temp file and a rename, so a reader polling the
//! directory never observes a half-written record. There is no locking:
//! concurrent writers race and the last rename wins, which is exactly the
//! coordination model the registry is documented to assume.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use convene_application::{SessionStore, StoreError};
use convene_domain::{SessionId, SessionRecord};

/// File-backed store, one `<session_id>.json` per session.
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", session_id))
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let path = self.record_path(session_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let record: SessionRecord = serde_json::from_str(&contents)
            .map_err(|e| StoreError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        record.validate()?;
        Ok(Some(record))
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.record_path(&record.session_id);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        // Write-then-rename keeps pollers from seeing partial records.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!(session = %record.session_id, path = %path.display(), "record written");
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let path = self.record_path(session_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteFailed(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "{}: {}",
                    self.dir.display(),
                    e
                )));
            }
        };

        let mut sessions = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::ReadFailed(format!("{}: {}", self.dir.display(), e)))?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                sessions.push(SessionId::new(stem));
            }
        }
        sessions.sort();
        Ok(sessions)
    }
}
