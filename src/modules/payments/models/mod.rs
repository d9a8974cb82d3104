mod payment;
mod payment_change;

pub use payment::{
    generate_bankref, BankPayment, CreatePaymentRequest, Payment, PaymentKind, PaymentProvider,
    PaymentResponse, PaymentRow, ProviderPayment, RecordStateRequest, BANKREF_LENGTH,
    DEFAULT_STATE, SAFECHARS,
};
pub use payment_change::PaymentChange;
