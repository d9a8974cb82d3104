// Provider API payloads
//
// Only the fields this service reads are modeled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,

    /// "personal" or "business"
    #[serde(rename = "type")]
    pub profile_type: String,
}

impl Profile {
    pub fn is_business(&self) -> bool {
        self.profile_type.eq_ignore_ascii_case("business")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Multi-currency account holding one balance per currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderlessAccount {
    pub id: i64,
    #[serde(default)]
    pub profile_id: Option<i64>,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub id: i64,
    pub currency: String,
    /// Deposit details; absent for currencies without local account details
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub id: Option<i64>,
    pub currency: String,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub swift: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub bank_address: BankAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAddress {
    #[serde(default)]
    pub address_first_line: String,
    #[serde(default)]
    pub post_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state_code: Option<String>,
}

impl BankAddress {
    /// Single display line: first line, city, post code, country
    pub fn display_line(&self) -> String {
        [
            self.address_first_line.as_str(),
            self.city.as_str(),
            self.post_code.as_str(),
            self.country.as_str(),
        ]
        .join(", ")
    }
}

/// Webhook event subscription registered for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger_on: Option<String>,
}
