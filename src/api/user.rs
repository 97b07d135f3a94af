use serde_json::Value;

use crate::{
    auth::TokenProvider,
    client::{Client, FilePart, RequestDescriptor},
    Error,
};

/// An avatar image ready for upload.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    pub async fn update_profile(&self, payload: &Value) -> Result<Value, Error> {
        self.put("/user/update-profile", payload).await
    }

    /// Multipart upload; runs under the upload deadline.
    pub async fn update_avatar(&self, avatar: AvatarUpload) -> Result<Value, Error> {
        let AvatarUpload {
            file_name,
            mime,
            bytes,
        } = avatar;
        let descriptor = RequestDescriptor::put("/user/update-avatar").multipart(FilePart {
            field: "avatar".to_owned(),
            file_name,
            mime,
            bytes,
        });
        self.request_json(descriptor).await
    }

    pub async fn notifications(&self) -> Result<Value, Error> {
        self.get("/user/notifications").await
    }

    pub async fn mark_notifications_read(&self) -> Result<Value, Error> {
        self.request_json(RequestDescriptor::post("/user/notifications/read"))
            .await
    }

    pub async fn referral_stats(&self) -> Result<Value, Error> {
        self.get("/user/referrals").await
    }

    pub async fn generate_referral_link(&self) -> Result<Value, Error> {
        self.request_json(RequestDescriptor::post("/user/referrals/generate"))
            .await
    }
}
