use crate::models::UserProfile;
use crate::websocket::message_types::WsOutboundEvent;
use std::sync::Arc;
use tokio::sync::{mpsc::UnboundedSender, RwLock};
use uuid::Uuid;

/// Unique identifier for a WebSocket session
///
/// Each connection gets one when its actor starts, so cleanup on close
/// removes exactly the entries that connection created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Session entry: the authenticated binding between a live connection and a
/// user identity, plus the channel that reaches its socket.
struct SessionEntry {
    id: SessionId,
    profile: UserProfile,
    sender: UnboundedSender<String>,
}

/// Registry of authenticated sessions
///
/// Entries mirror the set of currently-open, authenticated connections:
/// added on successful authentication, removed when the connection closes.
/// The same user authenticating over several connections yields several
/// entries; nothing de-duplicates.
#[derive(Default, Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Vec<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        id: SessionId,
        profile: UserProfile,
        sender: UnboundedSender<String>,
    ) {
        let mut guard = self.inner.write().await;
        guard.push(SessionEntry {
            id,
            profile,
            sender,
        });
        tracing::debug!("registered session {:?}, total: {}", id, guard.len());
    }

    /// Remove every entry belonging to this session.
    pub async fn deregister(&self, id: SessionId) {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|entry| entry.id != id);
        if guard.len() != before {
            tracing::debug!("deregistered session {:?}, remaining: {}", id, guard.len());
        }
    }

    /// Channel of the first entry whose profile id matches, in registration
    /// order. A user connected twice is reached on the older connection.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Option<UnboundedSender<String>> {
        let guard = self.inner.read().await;
        guard
            .iter()
            .find(|entry| entry.profile.id == user_id)
            .map(|entry| entry.sender.clone())
    }

    /// Profiles of all registered sessions, in registration order.
    pub async fn snapshot(&self) -> Vec<UserProfile> {
        let guard = self.inner.read().await;
        guard.iter().map(|entry| entry.profile.clone()).collect()
    }

    /// Push the current user list to every registered session.
    ///
    /// Sessions whose channel is already gone are skipped; no buffering, no
    /// retry. Entry removal stays the close handler's job.
    pub async fn broadcast_presence(&self) {
        let guard = self.inner.read().await;
        let users: Vec<UserProfile> = guard.iter().map(|entry| entry.profile.clone()).collect();
        let payload = match (WsOutboundEvent::ConnectedUsers { users }).to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize presence payload");
                return;
            }
        };

        for entry in guard.iter() {
            if entry.sender.send(payload.clone()).is_err() {
                tracing::debug!("skipped closed session {:?} during presence broadcast", entry.id);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
