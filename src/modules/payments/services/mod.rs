pub mod bill_url;
pub mod payment_service;

pub use bill_url::BillUrlSigner;
pub use payment_service::{BillUrlQuery, PaymentService};
