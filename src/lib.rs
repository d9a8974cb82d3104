//! TransferWise and GoCardless payment integration
//!
//! Payment records with bank references and state history, TransferWise
//! bank account sync, integration health checks and signed webhook intake.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::payments;
pub use modules::transferwise;
