pub mod client;
pub mod signature;
pub mod transferwise_service;
pub mod validation;
pub mod webhook_handlers;
pub mod webhook_registry;

pub use client::{TransferwiseApi, TransferwiseClient};
pub use signature::{RejectAll, RsaSignatureVerifier, SignatureVerifier};
pub use transferwise_service::{collect_bank_accounts, TransferwiseService};
pub use webhook_handlers::{transferwise_registry, BalanceCreditHandler, BALANCE_CREDIT};
pub use webhook_registry::{WebhookHandler, WebhookRegistry, WebhookReply};
