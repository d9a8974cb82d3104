use super::webhook_registry::{WebhookHandler, WebhookRegistry, WebhookReply};
use crate::core::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

pub const BALANCE_CREDIT: &str = "balances#credit";

/// Money arrived on one of our balances.
///
/// Acknowledged only; bank payments are reconciled from statements, not from
/// this event.
pub struct BalanceCreditHandler;

#[async_trait]
impl WebhookHandler for BalanceCreditHandler {
    async fn handle(&self, event_type: &str, event: &Value) -> Result<WebhookReply> {
        let data = event.get("data").unwrap_or(&Value::Null);
        let balance_id = data.pointer("/resource/id").and_then(|v| v.as_i64());
        let profile_id = data.pointer("/resource/profile_id").and_then(|v| v.as_i64());
        let amount = data.get("amount").and_then(|v| v.as_f64());
        let currency = data.get("currency").and_then(|v| v.as_str());

        info!(
            event_type = event_type,
            balance_id,
            profile_id,
            amount,
            currency,
            "TransferWise balance credited"
        );

        Ok(WebhookReply::no_content())
    }
}

/// Registry used by the server
pub fn transferwise_registry() -> WebhookRegistry {
    WebhookRegistry::new().register(BALANCE_CREDIT, BalanceCreditHandler)
}
