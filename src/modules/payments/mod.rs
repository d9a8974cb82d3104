// Payments module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payment, PaymentChange, PaymentProvider};
pub use repositories::PaymentRepository;
pub use services::{BillUrlSigner, PaymentService};
