use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One entry in a payment's append-only state history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PaymentChange {
    pub id: Option<i64>,

    /// Owning payment; unset until the payment itself is stored
    pub payment_id: Option<i64>,

    pub timestamp: DateTime<Utc>,

    pub state: String,
}

impl PaymentChange {
    pub fn new(payment_id: Option<i64>, state: impl Into<String>) -> Self {
        Self {
            id: None,
            payment_id,
            timestamp: Utc::now(),
            state: state.into(),
        }
    }
}
