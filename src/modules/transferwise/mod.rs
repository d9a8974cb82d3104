// TransferWise module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BankAccount, Diagnostic};
pub use repositories::BankAccountRepository;
pub use services::{TransferwiseClient, TransferwiseService, WebhookRegistry};
