// Payment model
//
// A payment is money owed or paid by a user. It is polymorphic on the
// provider tag: bank transfers carry a human-readable reference, provider
// billed payments carry the provider's object id. The amount is stored as
// integer pence and exposed as a Decimal.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::payment_change::PaymentChange;
use crate::core::{from_minor_units, to_minor_units, AppError, Result};
use crate::modules::payments::services::BillUrlSigner;

/// Characters used for bank references; excludes lookalikes such as 0/O and 1/I
pub const SAFECHARS: &str = "2346789BCDFGHJKMPQRTVWXY";

pub const BANKREF_LENGTH: usize = 8;

/// State given to newly created payments
pub const DEFAULT_STATE: &str = "new";

const MAX_STATE_LENGTH: usize = 64;

/// Provider discriminator stored in `payment.provider`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentProvider {
    #[serde(rename = "banktransfer")]
    BankTransfer,

    #[serde(rename = "gocardless")]
    GoCardless,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::BankTransfer => "banktransfer",
            PaymentProvider::GoCardless => "gocardless",
        }
    }

    /// Human readable name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentProvider::BankTransfer => "Bank transfer",
            PaymentProvider::GoCardless => "GoCardless payment",
        }
    }
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "banktransfer" => Ok(PaymentProvider::BankTransfer),
            "gocardless" => Ok(PaymentProvider::GoCardless),
            _ => Err(format!("Unknown payment provider: {}", s)),
        }
    }
}

/// Bank transfer payment, matched to incoming transfers by `bankref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankPayment {
    pub bankref: String,
}

impl BankPayment {
    pub fn new() -> Self {
        Self {
            bankref: generate_bankref(),
        }
    }
}

impl Default for BankPayment {
    fn default() -> Self {
        Self::new()
    }
}

/// Payment billed through the provider's hosted pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderPayment {
    /// Provider-assigned id, known once the bill has been created
    pub object_id: Option<String>,
}

/// Subtype payload, selected by the provider discriminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentKind {
    Bank(BankPayment),
    Provider(ProviderPayment),
}

impl PaymentKind {
    pub fn provider(&self) -> PaymentProvider {
        match self {
            PaymentKind::Bank(_) => PaymentProvider::BankTransfer,
            PaymentKind::Provider(_) => PaymentProvider::GoCardless,
        }
    }
}

/// Row shape of the `payment` table
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub amount_pence: i64,
    pub state: String,
    pub bankref: Option<String>,
    pub object_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// Database id, unset until stored
    pub id: Option<i64>,
    pub user_id: i64,
    amount_pence: i64,
    pub state: String,
    pub kind: PaymentKind,
    /// State history, oldest first
    pub changes: Vec<PaymentChange>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Create a payment of the given provider type.
    ///
    /// Bank transfers get a fresh `bankref`; provider payments start without
    /// an object id.
    pub fn new(user_id: i64, provider: PaymentProvider, amount: Decimal) -> Result<Self> {
        let kind = match provider {
            PaymentProvider::BankTransfer => PaymentKind::Bank(BankPayment::new()),
            PaymentProvider::GoCardless => PaymentKind::Provider(ProviderPayment::default()),
        };

        Ok(Self {
            id: None,
            user_id,
            amount_pence: to_minor_units(amount)?,
            state: DEFAULT_STATE.to_string(),
            kind,
            changes: Vec::new(),
            created_at: None,
        })
    }

    pub fn bank_transfer(user_id: i64, amount: Decimal) -> Result<Self> {
        Self::new(user_id, PaymentProvider::BankTransfer, amount)
    }

    pub fn gocardless(user_id: i64, amount: Decimal) -> Result<Self> {
        Self::new(user_id, PaymentProvider::GoCardless, amount)
    }

    /// Rebuild a payment from its row, resolving the subtype from the discriminator
    pub fn from_row(row: PaymentRow, changes: Vec<PaymentChange>) -> Result<Self> {
        let provider: PaymentProvider = row
            .provider
            .parse()
            .map_err(|e: String| AppError::internal(format!("Payment {}: {}", row.id, e)))?;

        let kind = match provider {
            PaymentProvider::BankTransfer => {
                let bankref = row.bankref.ok_or_else(|| {
                    AppError::internal(format!("Bank payment {} has no bankref", row.id))
                })?;
                PaymentKind::Bank(BankPayment { bankref })
            }
            PaymentProvider::GoCardless => PaymentKind::Provider(ProviderPayment {
                object_id: row.object_id,
            }),
        };

        Ok(Self {
            id: Some(row.id),
            user_id: row.user_id,
            amount_pence: row.amount_pence,
            state: row.state,
            kind,
            changes,
            created_at: Some(row.created_at),
        })
    }

    pub fn provider(&self) -> PaymentProvider {
        self.kind.provider()
    }

    pub fn amount(&self) -> Decimal {
        from_minor_units(self.amount_pence)
    }

    pub fn set_amount(&mut self, amount: Decimal) -> Result<()> {
        self.amount_pence = to_minor_units(amount)?;
        Ok(())
    }

    pub fn amount_pence(&self) -> i64 {
        self.amount_pence
    }

    pub fn bankref(&self) -> Option<&str> {
        match &self.kind {
            PaymentKind::Bank(bank) => Some(bank.bankref.as_str()),
            PaymentKind::Provider(_) => None,
        }
    }

    pub fn object_id(&self) -> Option<&str> {
        match &self.kind {
            PaymentKind::Provider(provider) => provider.object_id.as_deref(),
            PaymentKind::Bank(_) => None,
        }
    }

    /// Replace the bank reference after a storage-level collision
    pub fn regenerate_bankref(&mut self) {
        if let PaymentKind::Bank(bank) = &mut self.kind {
            bank.bankref = generate_bankref();
        }
    }

    /// Move the payment to `state` and append the transition to its history
    pub fn record_state(&mut self, state: impl Into<String>) -> Result<PaymentChange> {
        let state = validate_state(state.into())?;
        let change = PaymentChange::new(self.id, state.clone());

        self.state = state;
        self.changes.push(change.clone());

        Ok(change)
    }

    /// Hosted payment page URL for a provider-billed payment
    pub fn bill_url(&self, name: &str, signer: &BillUrlSigner) -> Result<String> {
        if !matches!(self.kind, PaymentKind::Provider(_)) {
            return Err(AppError::validation(format!(
                "{} payments have no hosted bill page",
                self.provider().display_name()
            )));
        }

        let id = self
            .id
            .ok_or_else(|| AppError::validation("Payment must be stored before billing"))?;

        signer.bill_url(self.amount(), name, &id.to_string())
    }
}

/// Payment as returned by the admin API
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: Option<i64>,
    pub user_id: i64,
    pub provider: PaymentProvider,
    pub name: &'static str,
    pub amount: Decimal,
    pub state: String,
    pub bankref: Option<String>,
    pub object_id: Option<String>,
    pub changes: Vec<PaymentChange>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            provider: payment.provider(),
            name: payment.provider().display_name(),
            amount: payment.amount(),
            state: payment.state.clone(),
            bankref: payment.bankref().map(String::from),
            object_id: payment.object_id().map(String::from),
            changes: payment.changes.clone(),
            created_at: payment.created_at,
        }
    }
}

/// Request body for creating a payment
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub user_id: i64,
    pub provider: PaymentProvider,
    pub amount: Decimal,
}

impl CreatePaymentRequest {
    /// A new payment is money owed, so it cannot start below zero
    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(AppError::validation("Payment amount cannot be negative"));
        }
        Ok(())
    }
}

/// Request body for recording a state transition
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStateRequest {
    pub state: String,
}

/// Generate a bank reference: distinct characters sampled from `SAFECHARS`.
///
/// Not cryptographic; uniqueness is enforced by the `payment.bankref` index.
pub fn generate_bankref() -> String {
    let mut rng = rand::thread_rng();
    SAFECHARS
        .as_bytes()
        .choose_multiple(&mut rng, BANKREF_LENGTH)
        .map(|&c| c as char)
        .collect()
}

fn validate_state(state: String) -> Result<String> {
    let state = state.trim().to_string();
    if state.is_empty() {
        return Err(AppError::validation("Payment state cannot be empty"));
    }
    if state.len() > MAX_STATE_LENGTH {
        return Err(AppError::validation(format!(
            "Payment state must be at most {} characters",
            MAX_STATE_LENGTH
        )));
    }
    Ok(state)
}
