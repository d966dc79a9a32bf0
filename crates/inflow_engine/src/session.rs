use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

/// One actor session. Implementations must make `get` and `set` atomic per
/// key; that is the only synchronization the mailbox protocol relies on.
pub trait Session: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// Resolves a session handle by id. Returns `None` when the session has
/// expired or never existed; callers must tolerate that.
pub trait SessionStore: Send + Sync {
    fn open(&self, session_id: &str) -> Option<Arc<dyn Session>>;
}

/// In-memory reference implementation, also the test double. Each session
/// guards its map with a mutex, which gives per-key read/write atomicity.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Arc<MemorySession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the session if absent and returns a handle to it.
    pub fn create(&self, session_id: &str) -> Arc<dyn Session> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(MemorySession::default()))
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn open(&self, session_id: &str) -> Option<Arc<dyn Session>> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(session_id)
            .map(|session| session.clone() as Arc<dyn Session>)
    }
}

#[derive(Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, Value>>,
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
    }
}
