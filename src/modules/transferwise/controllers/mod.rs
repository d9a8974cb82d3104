pub mod admin_controller;
pub mod webhook_controller;

pub use webhook_controller::{WebhookController, SIGNATURE_HEADER};
