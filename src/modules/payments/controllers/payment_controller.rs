use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::core::error::AppError;
use crate::modules::payments::models::{CreatePaymentRequest, RecordStateRequest};
use crate::modules::payments::services::{BillUrlQuery, PaymentService};

#[derive(Debug, Serialize)]
pub struct BillUrlResponse {
    pub url: String,
}

/// Create a payment
/// POST /payments
///
/// Bank transfer payments get a fresh bank reference.
pub async fn create_payment(
    service: web::Data<Arc<PaymentService>>,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service.create_payment(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(payment))
}

/// Get payment by ID, with its state history
/// GET /payments/{id}
pub async fn get_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payment = service.get_payment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// GET /payments/by-bankref/{bankref}
pub async fn get_payment_by_bankref(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payment = service.get_by_bankref(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Record a state transition
/// POST /payments/{id}/changes
pub async fn record_change(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
    request: web::Json<RecordStateRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .record_change(path.into_inner(), &request.state)
        .await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Signed GoCardless hosted-page URL
/// GET /payments/{id}/bill-url?name=
pub async fn bill_url(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
    query: web::Query<BillUrlQuery>,
) -> Result<HttpResponse, AppError> {
    let url = service.bill_url(path.into_inner(), &query.name).await?;
    Ok(HttpResponse::Ok().json(BillUrlResponse { url }))
}

/// DELETE /payments/{id}
pub async fn delete_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete_payment(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(create_payment))
            .route("/by-bankref/{bankref}", web::get().to(get_payment_by_bankref))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}", web::delete().to(delete_payment))
            .route("/{id}/changes", web::post().to(record_change))
            .route("/{id}/bill-url", web::get().to(bill_url)),
    );
}
