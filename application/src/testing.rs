//! Shared test doubles for service tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use convene_domain::{Participant, RoomDescriptor, RoomType, SessionId, SessionRecord};

use crate::ports::room_provider::{ProviderError, RoomProvider};
use crate::ports::session_store::{SessionStore, StoreError};

/// Derives rooms deterministically, like the static adapter does.
pub struct EchoProvider;

#[async_trait]
impl RoomProvider for EchoProvider {
    async fn create_room(
        &self,
        name: &str,
        room_type: RoomType,
    ) -> Result<RoomDescriptor, ProviderError> {
        Ok(RoomDescriptor::new(
            name,
            format!("https://rooms.example/{}", name),
            room_type,
        ))
    }
}

/// Always down, for failure paths.
pub struct DownProvider;

#[async_trait]
impl RoomProvider for DownProvider {
    async fn create_room(
        &self,
        _name: &str,
        _room_type: RoomType,
    ) -> Result<RoomDescriptor, ProviderError> {
        Err(ProviderError::unavailable("connection refused"))
    }
}

/// In-memory session store double.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(session_id).cloned())
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.records.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        Ok(self.records.lock().unwrap().keys().cloned().collect())
    }
}

/// `hosts` hosts followed by `others` regular participants.
pub fn roster(hosts: usize, others: usize) -> Vec<Participant> {
    let mut all = Vec::new();
    for i in 0..hosts {
        all.push(Participant::host(format!("h{}", i), format!("Host {}", i)));
    }
    for i in 0..others {
        all.push(Participant::new(format!("p{}", i), format!("Person {}", i)));
    }
    all
}
