pub mod api;
mod bank_account;
mod diagnostic;

pub use api::{BankAddress, BankDetails, Balance, BorderlessAccount, Profile, Subscription, User};
pub use bank_account::BankAccount;
pub use diagnostic::Diagnostic;
