//! Authenticated HTTP client for the rewards backend.
//!
//! Every request carries the stored access token. A `401` hands control to
//! the [`TokenManager`], which refreshes the token once for all concurrent
//! callers; the rejected request is then replayed a single time.

use std::{sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use self::utils::check_status;
use crate::{
    auth::{refresh::RefreshEndpoint, token_manager::TokenManager, DefaultBearer, TokenProvider},
    config::Config,
    storage::TokenStorage,
    Error,
};

pub mod request;
pub(crate) mod utils;

pub use self::request::{Body, FilePart, RequestDescriptor};

pub struct Client<Renewer = RefreshEndpoint>
where
    Renewer: TokenProvider,
{
    http: reqwest::Client,
    api_base: String,
    request_timeout: Duration,
    upload_timeout: Duration,
    pub(crate) disable_game_and_redeem: bool,
    storage: Arc<TokenStorage>,
    bearer: Arc<DefaultBearer>,
    token_manager: TokenManager<Renewer>,
}

impl Client {
    /// Client wired to the backend's own refresh endpoint.
    pub fn new(config: &Config, storage: TokenStorage) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| Error::Request(Arc::new(err)))?;
        let renewer = RefreshEndpoint::new(http.clone(), &config.api_base(), config.refresh_timeout);
        Ok(Self::with_renewer(http, config, storage, renewer))
    }
}

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    pub fn with_renewer(
        http: reqwest::Client,
        config: &Config,
        storage: TokenStorage,
        renewer: Renewer,
    ) -> Self {
        let storage = Arc::new(storage);
        let bearer = Arc::new(DefaultBearer::default());
        if let Some(token) = storage.access_token() {
            bearer.set(&token);
        }
        let token_manager = TokenManager::new(renewer, Arc::clone(&storage), Arc::clone(&bearer));
        Self {
            http,
            api_base: config.api_base(),
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
            disable_game_and_redeem: config.disable_game_and_redeem,
            storage,
            bearer,
            token_manager,
        }
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    pub fn default_bearer(&self) -> &DefaultBearer {
        &self.bearer
    }

    pub fn token_manager(&self) -> &TokenManager<Renewer> {
        &self.token_manager
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Send `descriptor`, refreshing the access token and replaying once on `401`.
    pub async fn request(&self, mut descriptor: RequestDescriptor) -> Result<reqwest::Response, Error> {
        loop {
            let sent = self.current_bearer(&descriptor);
            let err = match self.dispatch(&descriptor).await {
                Ok(res) => return Ok(res),
                Err(err) => err,
            };

            let should_refresh = match &err {
                Error::NetworkUnreachable(_) => {
                    warn!(message = "Backend unreachable", method = %descriptor.method, path = %descriptor.path);
                    false
                }
                Error::Timeout(deadline) => {
                    warn!(message = "Request timed out", method = %descriptor.method, path = %descriptor.path, deadline = ?deadline);
                    false
                }
                _ if !err.is_unauthorized() => false,
                _ if descriptor.retried => {
                    warn!(message = "Request still unauthorized after refresh", method = %descriptor.method, path = %descriptor.path);
                    false
                }
                _ => true,
            };
            if !should_refresh {
                return Err(err);
            }

            descriptor.retried = true;
            let token = match self.renewed_since(sent.as_deref()) {
                Some(token) => {
                    debug!(message = "Token already renewed while in flight", method = %descriptor.method, path = %descriptor.path);
                    token
                }
                None => self.token_manager.refresh().await?,
            };
            debug!(message = "Replaying request with refreshed token", method = %descriptor.method, path = %descriptor.path);
            descriptor.bearer = Some(token);
        }
    }

    pub async fn request_json<T>(&self, descriptor: RequestDescriptor) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let deadline = self.deadline(&descriptor);
        let res = self.request(descriptor).await?;
        let bytes = res
            .bytes()
            .await
            .map_err(|err| Error::from_transport(err, deadline))?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request_json(RequestDescriptor::get(path)).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        self.request_json(RequestDescriptor::post(path).json(body)?)
            .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        self.request_json(RequestDescriptor::put(path).json(body)?)
            .await
    }

    fn deadline(&self, descriptor: &RequestDescriptor) -> Duration {
        descriptor.timeout.unwrap_or(if descriptor.is_upload() {
            self.upload_timeout
        } else {
            self.request_timeout
        })
    }

    /// The stored access token, if it replaced `sent` and no refresh is running.
    fn renewed_since(&self, sent: Option<&str>) -> Option<String> {
        if self.token_manager.is_refreshing() {
            return None;
        }
        self.storage
            .access_token()
            .filter(|current| Some(current.as_str()) != sent)
    }

    fn current_bearer(&self, descriptor: &RequestDescriptor) -> Option<String> {
        descriptor
            .bearer
            .clone()
            .or_else(|| self.storage.access_token())
            .or_else(|| self.bearer.get())
    }

    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request, Error> {
        let deadline = self.deadline(descriptor);
        let builder = self
            .http
            .request(descriptor.method.clone(), descriptor.url(&self.api_base))
            .headers(descriptor.headers.clone())
            .timeout(deadline);

        let builder = match self.current_bearer(descriptor) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let builder = match &descriptor.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(part) => {
                let form = part.to_form().map_err(|err| Error::Request(Arc::new(err)))?;
                builder.multipart(form)
            }
        };

        builder.build().map_err(|err| Error::from_transport(err, deadline))
    }

    async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Response, Error> {
        let deadline = self.deadline(descriptor);
        let req = self.build_request(descriptor)?;
        let res = self
            .http
            .execute(req)
            .await
            .map_err(|err| Error::from_transport(err, deadline))?;
        check_status(res).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::AUTHORIZATION;

    use super::*;
    use crate::auth::Credentials;

    fn client() -> Client {
        Client::new(&Config::default(), TokenStorage::in_memory()).unwrap()
    }

    fn authorization(req: &reqwest::Request) -> Option<&str> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn stored_token_is_attached() {
        let client = client();
        client
            .storage()
            .save(&Credentials::new("a1", Some("r1".into())));

        let req = client
            .build_request(&RequestDescriptor::get("/wallet/balance"))
            .unwrap();

        assert_eq!(authorization(&req), Some("Bearer a1"));
        assert_eq!(
            req.url().as_str(),
            "http://localhost:5000/api/v1/wallet/balance"
        );
        assert_eq!(req.timeout(), Some(&Duration::from_secs(15)));
    }

    #[test]
    fn no_token_means_no_header() {
        let client = client();
        let req = client
            .build_request(&RequestDescriptor::get("/auth/ping"))
            .unwrap();
        assert_eq!(authorization(&req), None);
    }

    #[test]
    fn replay_bearer_overrides_storage() {
        let client = client();
        client.storage().save_access_token("a1");
        let mut descriptor = RequestDescriptor::get("/auth/me");
        descriptor.bearer = Some("a2".into());

        let req = client.build_request(&descriptor).unwrap();
        assert_eq!(authorization(&req), Some("Bearer a2"));
    }

    #[test]
    fn default_bearer_is_the_fallback() {
        let client = client();
        client.default_bearer().set("a-default");
        let req = client
            .build_request(&RequestDescriptor::get("/auth/me"))
            .unwrap();
        assert_eq!(authorization(&req), Some("Bearer a-default"));
    }

    #[test]
    fn uploads_get_the_longer_deadline() {
        let client = client();
        let descriptor = RequestDescriptor::put("/user/update-avatar").multipart(FilePart {
            field: "avatar".into(),
            file_name: "me.png".into(),
            mime: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        });
        let req = client.build_request(&descriptor).unwrap();
        assert_eq!(req.timeout(), Some(&Duration::from_secs(30)));
    }
}
