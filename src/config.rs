use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::info;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, thiserror::Error)]
#[error("invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without the `/api/v1` prefix.
    pub base_url: String,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    pub refresh_timeout: Duration,
    /// Kill switch for redeem, withdraw and reward claims.
    pub disable_game_and_redeem: bool,
    /// Durable token store; `None` keeps both slots in memory.
    pub token_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            request_timeout: Duration::from_secs(15),
            upload_timeout: Duration::from_secs(30),
            refresh_timeout: Duration::from_secs(10),
            disable_game_and_redeem: false,
            token_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: try_load("REWARDS_BASE_URL", defaults.base_url)?,
            request_timeout: load_secs("REWARDS_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            upload_timeout: load_secs("REWARDS_UPLOAD_TIMEOUT_SECS", defaults.upload_timeout)?,
            refresh_timeout: load_secs("REWARDS_REFRESH_TIMEOUT_SECS", defaults.refresh_timeout)?,
            disable_game_and_redeem: try_load(
                "REWARDS_DISABLE_GAME_AND_REDEEM",
                defaults.disable_game_and_redeem,
            )?,
            token_file: env::var_os("REWARDS_TOKEN_FILE").map(PathBuf::from),
        })
    }

    /// `base_url` with the API prefix appended.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), API_PREFIX)
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|err| ConfigError {
                key,
                value,
                reason: err.to_string(),
            })
        }
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn load_secs(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    try_load(key, default.as_secs()).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_appends_prefix_once() {
        let config = Config {
            base_url: "https://rewards.example.com/".into(),
            ..Config::default()
        };
        assert_eq!(config.api_base(), "https://rewards.example.com/api/v1");
    }

    #[test]
    fn defaults_match_backend_deadlines() {
        let config = Config::default();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.upload_timeout, Duration::from_secs(30));
        assert_eq!(config.refresh_timeout, Duration::from_secs(10));
    }
}
