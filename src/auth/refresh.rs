//! Renew the access token through the backend refresh endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{client::utils::check_status, Error};

pub const REFRESH_PATH: &str = "/auth/refresh";

/// Talks to the refresh endpoint directly, outside the intercepted client, so
/// a failing refresh can never trigger another refresh.
pub struct RefreshEndpoint {
    pub client: reqwest::Client,
    pub url: String,
    pub timeout: Duration,
}

impl RefreshEndpoint {
    pub fn new(client: reqwest::Client, api_base: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: format!("{}{}", api_base.trim_end_matches('/'), REFRESH_PATH),
            timeout,
        }
    }

    /// Perform the refresh call.
    pub async fn perform(&self, refresh_token: &str) -> Result<RefreshResponse, Error> {
        let req = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&RefreshRequest { refresh_token })
            .build()
            .map_err(|err| Error::from_transport(err, self.timeout))?;

        let res = self
            .client
            .execute(req)
            .await
            .map_err(|err| Error::from_transport(err, self.timeout))?;
        let res = check_status(res).await?;
        let bytes = res
            .bytes()
            .await
            .map_err(|err| Error::from_transport(err, self.timeout))?;
        let refresh_response = serde_json::from_slice(&bytes)?;
        Ok(refresh_response)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// The new short-lived bearer credential.
    pub access_token: String,
    /// Present only when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[async_trait::async_trait]
impl super::TokenProvider for RefreshEndpoint {
    type Token = RefreshResponse;

    async fn renew(&self, refresh_token: &str) -> Result<Self::Token, Error> {
        self.perform(refresh_token).await
    }
}

impl super::Token for RefreshResponse {
    fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_api_base() {
        let endpoint = RefreshEndpoint::new(
            reqwest::Client::new(),
            "http://localhost:5000/api/v1/",
            Duration::from_secs(10),
        );
        assert_eq!(endpoint.url, "http://localhost:5000/api/v1/auth/refresh");
    }

    #[test]
    fn request_body_uses_camel_case() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "r1" }).unwrap();
        assert_eq!(body, serde_json::json!({ "refreshToken": "r1" }));
    }

    #[test]
    fn rotated_refresh_token_is_optional() {
        let res: RefreshResponse = serde_json::from_str(r#"{"accessToken":"a2"}"#).unwrap();
        assert_eq!(res.access_token, "a2");
        assert_eq!(res.refresh_token, None);
    }
}
