use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

struct Session {
    user_id: Uuid,
    expires_at: Option<OffsetDateTime>,
}

/// In-memory token-to-user map. Tokens are opaque 32-byte random values;
/// a terminated or expired token never becomes valid again, a new login
/// always mints a fresh one. Nothing here survives a restart.
#[derive(Clone)]
pub struct SessionManager {
    ttl: Option<Duration>,
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind a fresh unpredictable token to `user_id`.
    pub fn start(&self, user_id: Uuid) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let expires_at = self.ttl.map(|ttl| OffsetDateTime::now_utc() + ttl);
        self.inner
            .write()
            .expect("session lock poisoned")
            .insert(token.clone(), Session { user_id, expires_at });
        debug!(user_id = %user_id, "session started");
        token
    }

    /// Missing, ended, tampered and expired tokens all come back `None`.
    /// Read-only; expired entries are dropped on the next `end`.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        let sessions = self.inner.read().expect("session lock poisoned");
        let session = sessions.get(token)?;
        if let Some(deadline) = session.expires_at {
            if OffsetDateTime::now_utc() >= deadline {
                return None;
            }
        }
        Some(session.user_id)
    }

    /// Terminate a session. Safe to call with an unknown token.
    pub fn end(&self, token: &str) {
        let removed = self
            .inner
            .write()
            .expect("session lock poisoned")
            .remove(token);
        if let Some(session) = removed {
            debug!(user_id = %session.user_id, "session ended");
        }
    }
}
