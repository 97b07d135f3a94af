//! Credential persistence.
//!
//! Tokens live in two slot stores keyed identically: a durable one that
//! survives restarts and a session-scoped one. Reads prefer the durable store;
//! writes and removals always touch both.

use tracing::{debug, warn};

use crate::auth::Credentials;

mod file;
mod memory;

pub use self::{file::FileStore, memory::MemoryStore};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key/value slot store.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub struct TokenStorage {
    durable: Box<dyn Store>,
    session: Box<dyn Store>,
}

impl TokenStorage {
    pub fn new(durable: impl Store + 'static, session: impl Store + 'static) -> Self {
        Self {
            durable: Box::new(durable),
            session: Box::new(session),
        }
    }

    /// Both slots in memory; nothing outlives the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default(), MemoryStore::default())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        let access_token = self.access_token()?;
        Some(Credentials {
            access_token,
            refresh_token: self.refresh_token(),
        })
    }

    pub fn save(&self, credentials: &Credentials) {
        self.write(ACCESS_TOKEN_KEY, &credentials.access_token);
        match &credentials.refresh_token {
            Some(refresh_token) => self.write(REFRESH_TOKEN_KEY, refresh_token),
            None => self.erase(REFRESH_TOKEN_KEY),
        }
    }

    pub fn save_access_token(&self, access_token: &str) {
        self.write(ACCESS_TOKEN_KEY, access_token);
    }

    pub fn save_refresh_token(&self, refresh_token: &str) {
        self.write(REFRESH_TOKEN_KEY, refresh_token);
    }

    pub fn clear(&self) {
        self.erase(ACCESS_TOKEN_KEY);
        self.erase(REFRESH_TOKEN_KEY);
        debug!(message = "Cleared stored credentials");
    }

    fn read(&self, key: &str) -> Option<String> {
        self.durable
            .get(key)
            .filter(|value| !value.is_empty())
            .or_else(|| self.session.get(key).filter(|value| !value.is_empty()))
    }

    fn write(&self, key: &str, value: &str) {
        for (slot, store) in self.slots() {
            if let Err(err) = store.set(key, value) {
                warn!(message = "Unable to persist token, dropping the slot", slot, key, error = %err);
                // A slot that cannot take the new value must not keep the old one.
                if let Err(err) = store.remove(key) {
                    warn!(message = "Unable to drop stale token", slot, key, error = %err);
                }
            }
        }
    }

    fn erase(&self, key: &str) {
        for (slot, store) in self.slots() {
            if let Err(err) = store.remove(key) {
                warn!(message = "Unable to remove token", slot, key, error = %err);
            }
        }
    }

    fn slots(&self) -> [(&'static str, &dyn Store); 2] {
        [
            ("durable", self.durable.as_ref()),
            ("session", self.session.as_ref()),
        ]
    }
}
