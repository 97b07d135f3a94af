use serde_json::{json, Value};
use tracing::warn;

use super::model::reports_success;
use crate::{auth::TokenProvider, client::Client, Error};

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    /// Buy a data bundle; a successful purchase also counts towards the
    /// monthly draw.
    pub async fn buy_data(&self, payload: &Value) -> Result<Value, Error> {
        let res: Value = self.post("/data/buy", payload).await?;
        if reports_success(&res) {
            self.record_monthly_purchase().await;
        }
        Ok(res)
    }

    pub async fn bulk_purchase_data(&self, bundles: &Value) -> Result<Value, Error> {
        let res: Value = self
            .post("/data/bulk-purchase", &json!({ "bundles": bundles }))
            .await?;
        if reports_success(&res) {
            self.record_monthly_purchase().await;
        }
        Ok(res)
    }

    pub async fn data_purchase_history(&self) -> Result<Value, Error> {
        self.get("/data/history").await
    }

    pub async fn available_bundles(&self) -> Result<Value, Error> {
        self.get("/data/bundles").await
    }

    pub async fn bundle_categories(&self) -> Result<Value, Error> {
        self.get("/data/categories").await
    }

    /// Leaderboard entries; empty when they cannot be loaded.
    pub async fn leaderboard(&self) -> Vec<Value> {
        let res: Result<Value, Error> = self.get("/data/leaderboard").await;
        match res {
            Ok(mut body) => match body.get_mut("leaderboard").map(Value::take) {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            },
            Err(err) => {
                warn!(message = "Failed to load leaderboard", error = %err);
                Vec::new()
            }
        }
    }
}
