//! Authorization logic.

use std::sync::{PoisonError, RwLock};

pub mod refresh;
pub mod token_manager;

#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Token: Token;

    /// Exchange `refresh_token` for a fresh access token.
    async fn renew(&self, refresh_token: &str) -> Result<Self::Token, crate::Error>;
}

pub trait Token: Send {
    fn access_token(&self) -> &str;

    /// A rotated refresh token, if the backend issued one.
    fn refresh_token(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

/// Client-wide default bearer, used when storage has no access token.
#[derive(Debug, Default)]
pub struct DefaultBearer(RwLock<Option<String>>);

impl DefaultBearer {
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: &str) {
        let mut slot = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_owned());
    }

    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(PoisonError::into_inner);
        slot.take();
    }
}
