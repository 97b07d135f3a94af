//! Bindings for the backend's product endpoints.
//!
//! Payloads are product-level details, so most calls hand back the raw JSON.

use tracing::warn;

use crate::{
    auth::TokenProvider,
    client::{Client, RequestDescriptor},
    Error,
};

mod data;
mod game;
pub mod model;
mod user;
mod wallet;

pub use self::user::AvatarUpload;

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    /// Whether the backend answers at all.
    pub async fn ping(&self) -> bool {
        match self.request(RequestDescriptor::get("/auth/ping")).await {
            Ok(_) => true,
            Err(err) => {
                warn!(message = "Backend ping failed", error = %err);
                false
            }
        }
    }

    pub(crate) fn ensure_enabled(&self, feature: &'static str) -> Result<(), Error> {
        if self.disable_game_and_redeem {
            return Err(Error::Disabled(feature));
        }
        Ok(())
    }

    /// Record a purchase towards the monthly draw. Failures only get logged,
    /// the purchase itself already went through.
    pub(crate) async fn record_monthly_purchase(&self) {
        if let Err(err) = self.update_monthly_purchase().await {
            warn!(message = "Monthly purchase update failed", error = %err);
        }
    }
}
