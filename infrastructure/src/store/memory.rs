//! In-memory session store.
//!
//! Backs single-process runs where nothing needs to survive the process,
//! and tests that don't want a filesystem.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use convene_application::{SessionStore, StoreError};
use convene_domain::{SessionId, SessionRecord};

/// Process-local store. Last write wins, like every other store.
#[derive(Default)]
pub struct InMemorySessionStore {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        Ok(records.get(session_id).cloned())
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        records.insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        records.remove(session_id);
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        let mut sessions: Vec<SessionId> = records.keys().cloned().collect();
        sessions.sort();
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_domain::RoomConfiguration;

    #[tokio::test]
    async fn test_roundtrip_and_remove() {
        let store = InMemorySessionStore::new();
        let record = SessionRecord::new(
            SessionId::new("AAAA"),
            vec![],
            RoomConfiguration::default(),
            chrono::Utc::now(),
        );

        store.save(&record).await.unwrap();
        assert!(store.load(&SessionId::new("AAAA")).await.unwrap().is_some());
        assert_eq!(store.list_sessions().await.unwrap().len(), 1);

        store.remove(&SessionId::new("AAAA")).await.unwrap();
        assert!(store.load(&SessionId::new("AAAA")).await.unwrap().is_none());
    }
}
