//! Store polling for participant processes.
//!
//! Only the host process mutates the shared record; everyone else observes
//! it. The watcher polls the store on a short interval and re-broadcasts
//! any change it sees as a [`SessionEvent`], giving readers the same event
//! stream whether a change originated in-process or in another process.
//! Polling is bounded to the 2-5 second range the coordination model
//! assumes.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use convene_domain::{SessionId, SessionRecord};

use crate::ports::events::{session_events, SessionEvent};
use crate::ports::session_store::SessionStore;

/// Shortest allowed polling interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Longest allowed polling interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls one session's record and announces observed changes.
pub struct RegistryWatcher {
    store: Arc<dyn SessionStore>,
    session_id: SessionId,
    interval: Duration,
    events: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
}

impl RegistryWatcher {
    pub fn new(store: Arc<dyn SessionStore>, session_id: SessionId, interval: Duration) -> Self {
        let (events, _) = session_events();
        Self {
            store,
            session_id,
            interval: interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL),
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe before calling [`Self::spawn`] to observe every change.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Token that stops the polling task; cancelled on teardown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start the polling loop on the runtime.
    pub fn spawn(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let session_id = self.session_id.clone();
        let events = self.events.clone();
        let cancel = self.cancel.clone();
        let poll_interval = self.interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            let mut last_seen: Option<SessionRecord> = None;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(session = %session_id, "watcher stopped");
                        return;
                    }
                    _ = interval.tick() => {}
                }

                match store.load(&session_id).await {
                    Ok(Some(record)) => {
                        if let Err(e) = record.validate() {
                            warn!(session = %session_id, "ignoring invalid record: {}", e);
                            continue;
                        }
                        if last_seen.as_ref() != Some(&record) {
                            debug!(session = %session_id, status = %record.status, "observed change");
                            let _ = events.send(SessionEvent::Updated(record.clone()));
                            last_seen = Some(record);
                        }
                    }
                    Ok(None) => {
                        if last_seen.take().is_some() {
                            let _ = events.send(SessionEvent::Removed(session_id.clone()));
                        }
                    }
                    Err(e) => {
                        // Transient read failures just mean we see the next
                        // state one tick later.
                        warn!(session = %session_id, "poll failed: {}", e);
                    }
                }
            }
        })
    }
}

impl Drop for RegistryWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{roster, MemoryStore};
    use convene_domain::{RoomConfiguration, SessionStatus};

    fn record(status: SessionStatus) -> SessionRecord {
        let mut record = SessionRecord::new(
            SessionId::new("AAAA"),
            roster(1, 2),
            RoomConfiguration::default(),
            chrono::Utc::now(),
        );
        record.status = status;
        record
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_reports_change_and_removal() {
        let store = Arc::new(MemoryStore::new());
        store.save(&record(SessionStatus::Waiting)).await.unwrap();

        let watcher = RegistryWatcher::new(
            store.clone(),
            SessionId::new("AAAA"),
            Duration::from_secs(2),
        );
        let mut events = watcher.subscribe();
        let handle = watcher.spawn();

        // First tick observes the initial record.
        match events.recv().await.unwrap() {
            SessionEvent::Updated(seen) => assert_eq!(seen.status, SessionStatus::Waiting),
            other => panic!("unexpected event: {other:?}"),
        }

        store
            .save(&record(SessionStatus::MainRoomActive))
            .await
            .unwrap();
        match events.recv().await.unwrap() {
            SessionEvent::Updated(seen) => {
                assert_eq!(seen.status, SessionStatus::MainRoomActive)
            }
            other => panic!("unexpected event: {other:?}"),
        }

        store.remove(&SessionId::new("AAAA")).await.unwrap();
        match events.recv().await.unwrap() {
            SessionEvent::Removed(id) => assert_eq!(id.as_str(), "AAAA"),
            other => panic!("unexpected event: {other:?}"),
        }

        watcher.cancellation_token().cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_record_is_not_rebroadcast() {
        let store = Arc::new(MemoryStore::new());
        store.save(&record(SessionStatus::Waiting)).await.unwrap();

        let watcher = RegistryWatcher::new(
            store.clone(),
            SessionId::new("AAAA"),
            Duration::from_secs(2),
        );
        let mut events = watcher.subscribe();
        let handle = watcher.spawn();

        events.recv().await.unwrap();

        // Several quiet ticks later, nothing further was sent.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));

        watcher.cancellation_token().cancel();
        handle.await.unwrap();
    }

    #[test]
    fn test_interval_clamped() {
        let store = Arc::new(MemoryStore::new());
        let watcher = RegistryWatcher::new(
            store,
            SessionId::new("AAAA"),
            Duration::from_millis(100),
        );
        assert_eq!(watcher.interval, MIN_POLL_INTERVAL);
    }
}
