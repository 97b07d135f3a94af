use serde::{Deserialize, Serialize};

/// Upper bound shown on the notification badge.
pub const NOTIFICATION_BADGE_MAX: u32 = 9;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The access token.
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: serde_json::Value,
    /// Unread notification count.
    #[serde(default)]
    pub notifications: u32,
}

impl MeResponse {
    pub fn notification_badge(&self) -> u32 {
        self.notifications.min(NOTIFICATION_BADGE_MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Daily,
    Monthly,
}

impl DrawKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }
}

/// Responses of the product endpoints that report success in-band.
pub fn reports_success(body: &serde_json::Value) -> bool {
    body.get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn badge_is_capped() {
        let me: MeResponse = serde_json::from_value(json!({ "user": {}, "notifications": 14 })).unwrap();
        assert_eq!(me.notification_badge(), 9);

        let me: MeResponse = serde_json::from_value(json!({ "user": {} })).unwrap();
        assert_eq!(me.notification_badge(), 0);
    }

    #[test]
    fn auth_response_without_refresh_token() {
        let res: AuthResponse =
            serde_json::from_value(json!({ "token": "a1", "user": { "id": 7 } })).unwrap();
        assert_eq!(res.token, "a1");
        assert_eq!(res.refresh_token, None);
        assert_eq!(res.user["id"], 7);
    }

    #[test]
    fn success_flag_defaults_to_false() {
        assert!(reports_success(&json!({ "success": true })));
        assert!(!reports_success(&json!({ "msg": "nope" })));
    }
}
