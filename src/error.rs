use std::{sync::Arc, time::Duration};

/// Every failure the client can surface.
///
/// Cloneable so a single refresh outcome can be handed to every request
/// queued behind it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("backend unreachable: {0}")]
    NetworkUnreachable(#[source] Arc<reqwest::Error>),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{status} status code")]
    Http { status: u16, body: String },
    #[error("no refresh token available")]
    NoRefreshToken,
    #[error("token refresh failed: {0}")]
    Refresh(#[source] Box<Error>),
    #[error("invalid request: {0}")]
    Request(#[source] Arc<reqwest::Error>),
    #[error("decode: {0}")]
    Decode(#[source] Arc<serde_json::Error>),
    #[error("{0} is temporarily disabled")]
    Disabled(&'static str),
}

impl Error {
    /// Map a transport failure raised while waiting on `deadline`.
    pub(crate) fn from_transport(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(deadline)
        } else if err.is_builder() {
            Self::Request(Arc::new(err))
        } else {
            Self::NetworkUnreachable(Arc::new(err))
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the stored credentials are gone and the user has to sign in
    /// again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NoRefreshToken | Self::Refresh(_)) || self.is_unauthorized()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}
