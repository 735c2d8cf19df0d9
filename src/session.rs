use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant, SystemTime};
use uuid::Uuid;

use crate::navigation::NavigationStack;

/// Default lifetime of a session without activity
pub const SESSION_DURATION: u64 = 24 * 60 * 60; // 24 hours in seconds

/// Longest time between two sweeps of expired sessions
pub const PURGE_INTERVAL: u64 = 5 * 60; // 5 minutes in seconds

/// Server-side state of one visitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Navigation history of the visitor
    pub navigation: NavigationStack,

    /// Time when the session expires
    pub expires_at: SystemTime,
}

/// Serializable copy of all sessions of a [`SessionStore`]
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub sessions: HashMap<String, Session>,
}

/// Session id -> navigation stack.
///
/// Requests load a copy of their stack, work on it and save it back. The
/// last save for a session wins.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    duration: Duration,
    last_purge: Mutex<Instant>,
}

impl SessionStore {
    pub fn new(duration: Duration) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            duration,
            last_purge: Mutex::new(Instant::now()),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Interval between sweeps: the session lifetime, capped at
    /// [`PURGE_INTERVAL`]
    pub fn purge_interval(&self) -> Duration {
        self.duration.min(Duration::from_secs(PURGE_INTERVAL))
    }

    /// Create a new session with an empty navigation stack
    ///
    /// Expired sessions are swept first once the purge interval has passed,
    /// so cookieless clients cannot grow the store without bound.
    ///
    /// # Returns
    /// * `String` - A unique session ID
    pub fn create_session(&self) -> String {
        self.purge_if_due();

        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            navigation: NavigationStack::new(),
            expires_at: SystemTime::now() + self.duration,
        };

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), session);
        info!("session {} created", session_id);

        session_id
    }

    /// Navigation stack of a live session.
    ///
    /// Returns `None` for unknown ids. An expired session is dropped and
    /// also yields `None`.
    pub fn load(&self, session_id: &str) -> Option<NavigationStack> {
        {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(session_id) {
                Some(session) if session.expires_at > SystemTime::now() => {
                    return Some(session.navigation.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired; take the write lock to drop it
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(session_id);
        debug!("session {} expired", session_id);
        None
    }

    /// Store the stack of a session and push its expiry forward.
    pub fn save(&self, session_id: &str, navigation: NavigationStack) {
        let expires_at = SystemTime::now() + self.duration;
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(
            session_id.to_string(),
            Session {
                navigation,
                expires_at,
            },
        );
    }

    pub fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(session_id).is_some()
    }

    fn purge_if_due(&self) {
        let due = {
            let last_purge = self.last_purge.lock().unwrap();
            last_purge.elapsed() >= self.purge_interval()
        };
        if due {
            self.purge_expired();
        }
    }

    /// Drop every expired session and return how many were removed
    pub fn purge_expired(&self) -> usize {
        *self.last_purge.lock().unwrap() = Instant::now();
        let now = SystemTime::now();
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let removed = before - sessions.len();
        if removed > 0 {
            info!("purged {} expired sessions", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all sessions that have not expired yet
    pub fn snapshot(&self) -> StoreSnapshot {
        let now = SystemTime::now();
        let sessions = self.sessions.read().unwrap();
        StoreSnapshot {
            sessions: sessions
                .iter()
                .filter(|(_, session)| session.expires_at > now)
                .map(|(id, session)| (id.clone(), session.clone()))
                .collect(),
        }
    }

    /// Replace the content of the store with a snapshot, skipping sessions
    /// that expired in the meantime
    pub fn restore(&self, snapshot: StoreSnapshot) {
        let now = SystemTime::now();
        let mut sessions = self.sessions.write().unwrap();
        *sessions = snapshot
            .sessions
            .into_iter()
            .filter(|(_, session)| session.expires_at > now)
            .collect();
        info!("restored {} sessions", sessions.len());
    }

    #[cfg(test)]
    pub(crate) fn expire_now(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(session) = sessions.get_mut(session_id) {
            session.expires_at = SystemTime::now() - Duration::from_secs(1);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new(Duration::from_secs(SESSION_DURATION))
    }
}
