//! Session change notifications.
//!
//! Every mutation of the shared record is announced on a broadcast channel
//! carrying the full updated record. Within one process this is the only
//! propagation mechanism; across processes the [`RegistryWatcher`]
//! (`crate::services::watcher`) re-publishes changes it observes by polling
//! the store.

use convene_domain::{SessionId, SessionRecord};
use tokio::sync::broadcast;

/// Default buffer for session event channels. Slow subscribers that fall
/// further behind than this lose the oldest events, which is acceptable:
/// every event carries the full record, so the latest one supersedes
/// everything before it.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change to a session's shared record.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The record was written; the payload is the complete new state.
    Updated(SessionRecord),
    /// The session ended and its record was removed.
    Removed(SessionId),
}

impl SessionEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::Updated(record) => &record.session_id,
            SessionEvent::Removed(id) => id,
        }
    }
}

/// Create a session event channel with the default capacity.
pub fn session_events() -> (
    broadcast::Sender<SessionEvent>,
    broadcast::Receiver<SessionEvent>,
) {
    broadcast::channel(EVENT_CHANNEL_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_session_id() {
        let event = SessionEvent::Removed(SessionId::new("CODE"));
        assert_eq!(event.session_id().as_str(), "CODE");
    }
}
