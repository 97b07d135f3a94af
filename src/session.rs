//! Sign-in state on top of the client.

use serde_json::Value;
use tracing::info;

use crate::{
    api::model::{AuthResponse, LoginRequest, MeResponse},
    auth::{Credentials, TokenProvider},
    client::{Client, RequestDescriptor},
    Error,
};

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        let descriptor = RequestDescriptor::post("/auth/login")
            .json(&LoginRequest { email, password })?
            .without_refresh();
        let res: AuthResponse = self.request_json(descriptor).await?;
        self.sign_in(&res);
        Ok(res)
    }

    pub async fn register(&self, payload: &Value) -> Result<AuthResponse, Error> {
        let res: AuthResponse = self
            .request_json(
                RequestDescriptor::post("/auth/register")
                    .json(payload)?
                    .without_refresh(),
            )
            .await?;
        self.sign_in(&res);
        Ok(res)
    }

    pub async fn me(&self) -> Result<MeResponse, Error> {
        self.get("/auth/me").await
    }

    pub fn logout(&self) {
        self.storage().clear();
        self.default_bearer().clear();
        info!(message = "Signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.storage().access_token().is_some()
    }

    fn sign_in(&self, res: &AuthResponse) {
        let credentials = Credentials::new(res.token.clone(), res.refresh_token.clone());
        self.storage().save(&credentials);
        self.default_bearer().set(&credentials.access_token);
        info!(
            message = "Signed in",
            has_refresh_token = credentials.refresh_token.is_some(),
        );
    }
}
