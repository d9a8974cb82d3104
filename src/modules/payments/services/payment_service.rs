use crate::core::error::AppError;
use crate::modules::payments::models::{CreatePaymentRequest, Payment, PaymentResponse};
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::payments::services::BillUrlSigner;

/// Query parameters for building a hosted bill URL
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BillUrlQuery {
    #[serde(default = "default_bill_name")]
    pub name: String,
}

fn default_bill_name() -> String {
    "Ticket payment".to_string()
}

/// Service for payment business logic
#[derive(Clone)]
pub struct PaymentService {
    repository: PaymentRepository,
    signer: Option<BillUrlSigner>,
}

impl PaymentService {
    /// `signer` is `None` when GoCardless credentials are not configured
    pub fn new(repository: PaymentRepository, signer: Option<BillUrlSigner>) -> Self {
        Self { repository, signer }
    }

    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentResponse, AppError> {
        request.validate()?;
        let payment = Payment::new(request.user_id, request.provider, request.amount)?;
        let payment = self.repository.create(&payment).await?;

        tracing::info!(
            payment_id = payment.id,
            user_id = payment.user_id,
            provider = %payment.provider(),
            bankref = payment.bankref(),
            "Payment created"
        );

        Ok(PaymentResponse::from(&payment))
    }

    pub async fn get_payment(&self, id: i64) -> Result<PaymentResponse, AppError> {
        let payment = self.load(id).await?;
        Ok(PaymentResponse::from(&payment))
    }

    /// Look up the bank payment an incoming transfer reference belongs to
    pub async fn get_by_bankref(&self, bankref: &str) -> Result<PaymentResponse, AppError> {
        let payment = self
            .repository
            .find_by_bankref(bankref)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No payment with reference {}", bankref)))?;

        Ok(PaymentResponse::from(&payment))
    }

    pub async fn record_change(&self, id: i64, state: &str) -> Result<PaymentResponse, AppError> {
        let payment = self.repository.record_state(id, state).await?;
        Ok(PaymentResponse::from(&payment))
    }

    /// Signed hosted-page URL for a GoCardless payment
    pub async fn bill_url(&self, id: i64, name: &str) -> Result<String, AppError> {
        let payment = self.load(id).await?;

        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| AppError::Configuration("GoCardless is not configured".to_string()))?;

        payment.bill_url(name, signer)
    }

    pub async fn delete_payment(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        tracing::info!(payment_id = id, "Payment deleted");
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Payment, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", id)))
    }
}
