use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bank account incoming transfers can be paid into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BankAccount {
    pub sort_code: Option<String>,
    pub acct_id: Option<String>,
    pub currency: String,
    pub active: bool,
    pub institution: String,
    pub address: String,
    pub swift: Option<String>,
    pub iban: Option<String>,
    /// Provider balance this account was synced from
    pub borderless_account_id: Option<i64>,
}
