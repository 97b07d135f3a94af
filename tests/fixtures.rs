//! Shared setup for integration tests against a mock backend.

#![allow(dead_code)]

use std::time::Duration;

use rewards_client::{auth::Credentials, storage::TokenStorage, Client, Config};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

pub fn config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        ..Config::default()
    }
}

/// Client whose storage already holds `a1` / `r1`.
pub fn signed_in_client(server: &MockServer) -> Client {
    client_with(config(server), Some(Credentials::new("a1", Some("r1".into()))))
}

pub fn client_with(config: Config, credentials: Option<Credentials>) -> Client {
    let storage = TokenStorage::in_memory();
    if let Some(credentials) = credentials {
        storage.save(&credentials);
    }
    Client::new(&config, storage).unwrap()
}

pub fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({ "msg": "token expired" }))
}

/// Mount a refresh endpoint that accepts `r1` and hands out `access_token`.
pub async fn mount_refresh(
    server: &MockServer,
    access_token: &str,
    delay: Duration,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": access_token }))
                .set_delay(delay),
        )
        .expect(expected_calls)
        .named("refresh")
        .mount(server)
        .await;
}
