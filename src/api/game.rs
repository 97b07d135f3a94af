use serde_json::{json, Value};

use super::model::DrawKind;
use crate::{
    auth::TokenProvider,
    client::{Client, RequestDescriptor},
    Error,
};

impl<Renewer> Client<Renewer>
where
    Renewer: TokenProvider,
{
    pub async fn play_daily_game(&self, numbers: &[u32]) -> Result<Value, Error> {
        self.post("/game/daily/play", &json!({ "numbers": numbers }))
            .await
    }

    pub async fn daily_result(&self) -> Result<Value, Error> {
        self.get("/game/daily/result").await
    }

    pub async fn daily_game_history(&self) -> Result<Value, Error> {
        self.get("/game/daily/history").await
    }

    pub async fn claim_daily_reward(&self, game_id: &str) -> Result<Value, Error> {
        self.ensure_enabled("reward claiming")?;
        self.post("/game/daily/claim", &json!({ "gameId": game_id }))
            .await
    }

    pub async fn monthly_eligibility(&self) -> Result<Value, Error> {
        self.get("/game/monthly/eligibility").await
    }

    pub async fn monthly_winners(&self, month: Option<&str>) -> Result<Value, Error> {
        let descriptor = RequestDescriptor::get("/game/monthly/winners");
        let descriptor = match month {
            Some(month) => descriptor.query("month", month),
            None => descriptor,
        };
        self.request_json(descriptor).await
    }

    pub async fn update_monthly_purchase(&self) -> Result<Value, Error> {
        self.request_json(RequestDescriptor::post("/game/monthly/purchase"))
            .await
    }

    pub async fn claim_monthly_reward(&self, month: &str) -> Result<Value, Error> {
        self.ensure_enabled("monthly reward claiming")?;
        self.post("/game/monthly/claim", &json!({ "month": month }))
            .await
    }

    pub async fn game_tickets(&self) -> Result<Value, Error> {
        self.get("/game/tickets").await
    }

    pub async fn ticket_history(&self) -> Result<Value, Error> {
        self.get("/game/tickets/history").await
    }

    pub async fn purchase_tickets(&self, quantity: u32) -> Result<Value, Error> {
        self.post("/game/tickets/purchase", &json!({ "quantity": quantity }))
            .await
    }

    pub async fn game_stats(&self) -> Result<Value, Error> {
        self.get("/game/stats").await
    }

    pub async fn draw_schedules(&self) -> Result<Value, Error> {
        self.get("/game/schedules").await
    }

    pub async fn prize_distribution(&self, kind: DrawKind) -> Result<Value, Error> {
        self.get(&format!("/game/prizes/{}", kind.as_str())).await
    }

    pub async fn game_rules(&self, kind: DrawKind) -> Result<Value, Error> {
        self.get(&format!("/game/rules/{}", kind.as_str())).await
    }

    /// `period` is e.g. `monthly` or `weekly`.
    pub async fn game_analytics(&self, period: &str) -> Result<Value, Error> {
        self.get(&format!("/game/analytics/{period}")).await
    }

    pub async fn verify_winner_status(&self, kind: DrawKind, draw_date: &str) -> Result<Value, Error> {
        self.post(
            "/game/verify-winner",
            &json!({ "drawType": kind.as_str(), "drawDate": draw_date }),
        )
        .await
    }
}
