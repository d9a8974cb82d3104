// Shared fixtures for the integration tests.
//
// The TransferWise API is replaced by an in-memory fake and webhooks are
// signed with a throwaway RSA key. Repository tests use a real MySQL
// database through `create_test_pool`.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod test_database;

pub use fake_transferwise::*;
pub use test_database::*;
pub use webhook_signing::*;
