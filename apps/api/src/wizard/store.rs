use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::language::Language;
use crate::wizard::session::WizardSession;

/// Idle time after which a session may be dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// In-memory wizard sessions. Nothing is persisted; a restart forgets them.
///
/// Sessions idle for longer than the TTL (measured from `updated_at`) are
/// evicted whenever a new session is created.
///
/// Closures passed to `update` run under the write lock, so keep them
/// synchronous and short: model calls happen outside, between a `get` and
/// an `update`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, session: &WizardSession) -> bool {
        // A clock step backwards gives a negative age; keep such sessions.
        (Utc::now() - session.updated_at)
            .to_std()
            .is_ok_and(|idle| idle >= self.ttl)
    }

    pub async fn create(&self, language: Language) -> WizardSession {
        let session = WizardSession::new(language);
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, existing| !self.is_expired(existing));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle wizard sessions");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<WizardSession> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Runs `f` on the session, or returns `None` if it does not exist.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> T,
    ) -> Option<T> {
        self.inner.write().await.get_mut(&id).map(f)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
