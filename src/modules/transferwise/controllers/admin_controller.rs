use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::transferwise::models::Diagnostic;
use crate::modules::transferwise::repositories::BankAccountRepository;
use crate::modules::transferwise::services::TransferwiseService;

/// Check TransferWise configuration and connectivity
/// GET /transferwise/validate
///
/// Always 200: failures are reported as diagnostic lines.
pub async fn validate(service: web::Data<Arc<TransferwiseService>>) -> HttpResponse {
    let checks: Vec<Diagnostic> = service.validate().await;
    HttpResponse::Ok().json(checks)
}

/// Pull bank accounts from TransferWise and store them locally
/// POST /transferwise/accounts/sync
pub async fn sync_accounts(
    service: web::Data<Arc<TransferwiseService>>,
    repository: web::Data<BankAccountRepository>,
) -> Result<HttpResponse, AppError> {
    let accounts = service.retrieve_accounts().await?;
    let synced = repository.upsert_all(&accounts).await?;

    tracing::info!(synced, "TransferWise bank accounts synced");

    Ok(HttpResponse::Ok().json(accounts))
}

/// Stored bank accounts
/// GET /transferwise/accounts
pub async fn list_accounts(
    repository: web::Data<BankAccountRepository>,
) -> Result<HttpResponse, AppError> {
    let accounts = repository.list().await?;
    Ok(HttpResponse::Ok().json(accounts))
}

/// Configure TransferWise admin routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transferwise")
            .route("/validate", web::get().to(validate))
            .route("/accounts", web::get().to(list_accounts))
            .route("/accounts/sync", web::post().to(sync_accounts)),
    );
}
