use serde_json::{json, Value};

use crate::{
    auth::TokenProvider,
    client::{Client, RequestDescriptor},
    Error,
};

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    pub async fn wallet_balance(&self) -> Result<Value, Error> {
        self.get("/wallet/balance").await
    }

    pub async fn deposit_history(&self) -> Result<Value, Error> {
        self.get("/wallet/deposit-history").await
    }

    pub async fn deposit_status(&self, tx_ref: &str) -> Result<Value, Error> {
        self.get(&format!("/wallet/deposit-status/{tx_ref}")).await
    }

    pub async fn verify_flutterwave_payment(&self, tx_ref: &str) -> Result<Value, Error> {
        self.post("/wallet/verify-flutterwave", &json!({ "tx_ref": tx_ref }))
            .await
    }

    pub async fn reconcile_payment(&self, tx_ref: &str) -> Result<Value, Error> {
        self.post("/wallet/reconcile-payment", &json!({ "tx_ref": tx_ref }))
            .await
    }

    pub async fn redeem_rewards(&self) -> Result<Value, Error> {
        self.ensure_enabled("redeem")?;
        self.request_json(RequestDescriptor::post("/wallet/redeem"))
            .await
    }

    pub async fn withdraw_funds(&self, payload: &Value) -> Result<Value, Error> {
        self.ensure_enabled("withdrawal")?;
        self.post("/wallet/withdraw", payload).await
    }

    pub async fn withdrawal_history(&self) -> Result<Value, Error> {
        self.get("/wallet/withdraw-history").await
    }
}
