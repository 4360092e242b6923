// src/session.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::ClientError;
use crate::models::User;
use crate::services::users::{UserResource, assembler};

/// Storage key for the bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Storage key for the serialized current-user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String-keyed store backing the session. Reads are synchronous snapshots and
/// must not block on I/O: `get` runs on the request path of every call.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-process store, last-writer-wins. Each operation takes the lock once, so
/// reads and writes are individually atomic; there is no cross-request
/// transaction.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.lock().unwrap().insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Typed view over the session entries. Cheap to clone; every clone shares the
/// same underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a freshly authenticated session. The user record is stored
    /// serialized, exactly as the backend sent it.
    pub fn store_login(&self, token: &str, user: &UserResource) -> Result<(), ClientError> {
        let serialized = serde_json::to_string(user)?;
        self.store.set(AUTH_TOKEN_KEY, token.to_owned());
        self.store.set(CURRENT_USER_KEY, serialized);
        Ok(())
    }

    /// Current user parsed from the stored record. A malformed record is
    /// logged and treated as absent.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(CURRENT_USER_KEY)?;
        match serde_json::from_str::<UserResource>(&raw) {
            Ok(resource) => Some(assembler::to_entity(resource)),
            Err(e) => {
                tracing::error!(
                    target: "livria_client::session",
                    error = %e,
                    "Failed to parse stored user record"
                );
                None
            }
        }
    }

    pub fn clear(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(CURRENT_USER_KEY);
    }
}
