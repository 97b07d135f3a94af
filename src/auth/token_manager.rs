use std::{
    collections::VecDeque,
    mem,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{DefaultBearer, Token, TokenProvider};
use crate::{storage::TokenStorage, Error};

type Outcome = Result<String, Error>;
type Waiter = oneshot::Sender<Outcome>;

/// Serializes access token refreshes.
///
/// Only one refresh runs at a time. Callers arriving while it is in flight are
/// queued and settled, in arrival order, with the same outcome once it ends.
pub struct TokenManager<Provider>
where
    Provider: TokenProvider,
{
    provider: Provider,
    storage: Arc<TokenStorage>,
    bearer: Arc<DefaultBearer>,
    state: Mutex<RefreshState>,
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    queue: VecDeque<Waiter>,
}

enum Role {
    Leader,
    Follower(oneshot::Receiver<Outcome>),
}

impl<Provider> TokenManager<Provider>
where
    Provider: TokenProvider,
{
    pub fn new(provider: Provider, storage: Arc<TokenStorage>, bearer: Arc<DefaultBearer>) -> Self {
        Self {
            provider,
            storage,
            bearer,
            state: Mutex::new(RefreshState::default()),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock_state().refreshing
    }

    pub fn pending(&self) -> usize {
        self.lock_state().queue.len()
    }

    /// Obtain a new access token, joining the in-flight refresh if there is one.
    ///
    /// If the leading caller goes away before its refresh completes, the queued
    /// callers contend again and one of them takes over.
    pub async fn refresh(&self) -> Result<String, Error> {
        loop {
            let rx = match self.join() {
                Role::Leader => return self.lead().await,
                Role::Follower(rx) => rx,
            };

            debug!(message = "Refresh in flight, queued behind it");
            match rx.await {
                Ok(outcome) => return outcome,
                Err(_) => debug!(message = "Leading refresh dropped, contending again"),
            }
        }
    }

    fn join(&self) -> Role {
        let mut state = self.lock_state();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.queue.push_back(tx);
            Role::Follower(rx)
        } else {
            state.refreshing = true;
            Role::Leader
        }
    }

    async fn lead(&self) -> Result<String, Error> {
        let guard = LeaderGuard {
            state: &self.state,
            armed: true,
        };

        info!(message = "Access token rejected, refreshing");
        let outcome = self.fetch_new_token().await;

        match &outcome {
            Ok(_) => debug!(message = "Got new access token"),
            Err(err) => {
                warn!(message = "Token refresh failed, clearing credentials", error = %err);
                self.storage.clear();
                self.bearer.clear();
            }
        }

        let waiters = guard.finish();
        debug!(message = "Settling queued requests", queued = waiters.len());
        for waiter in waiters {
            // A waiter whose request was dropped has nobody left to notify.
            let _ = waiter.send(outcome.clone());
        }

        outcome
    }

    async fn fetch_new_token(&self) -> Result<String, Error> {
        let refresh_token = self.storage.refresh_token().ok_or(Error::NoRefreshToken)?;
        let token = self
            .provider
            .renew(&refresh_token)
            .await
            .map_err(|err| Error::Refresh(Box::new(err)))?;

        let access_token = token.access_token().to_owned();
        self.storage.save_access_token(&access_token);
        if let Some(rotated) = token.refresh_token() {
            self.storage.save_refresh_token(rotated);
        }
        self.bearer.set(&access_token);
        Ok(access_token)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the manager to idle even if the leading future is dropped mid-refresh.
struct LeaderGuard<'a> {
    state: &'a Mutex<RefreshState>,
    armed: bool,
}

impl LeaderGuard<'_> {
    fn finish(mut self) -> VecDeque<Waiter> {
        self.armed = false;
        self.release()
    }

    fn release(&self) -> VecDeque<Waiter> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refreshing = false;
        mem::take(&mut state.queue)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Dropping the senders wakes every waiter so it can take over.
        let waiters = self.release();
        warn!(message = "Refresh dropped before completion", queued = waiters.len());
    }
}
