use super::super::services::{SignatureVerifier, WebhookRegistry};
use crate::core::{AppError, Result};
use crate::middleware::request_id::RequestIdValue;
use actix_web::{post, web, HttpMessage, HttpRequest, HttpResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Receives TransferWise webhook deliveries
///
/// Server-to-server endpoint: authenticated by the body signature only, no
/// session or CSRF handling applies.
pub struct WebhookController {
    registry: WebhookRegistry,
    verifier: Arc<dyn SignatureVerifier>,
}

impl WebhookController {
    pub fn new(registry: WebhookRegistry, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { registry, verifier }
    }

    /// Configure webhook routes
    pub fn configure(cfg: &mut web::ServiceConfig, controller: web::Data<WebhookController>) {
        cfg.app_data(controller).service(transferwise_webhook);
    }
}

/// POST /transferwise-webhook
///
/// # Headers
/// * `X-Signature` - base64 signature of the raw body
///
/// # Returns
/// * Handler reply (normally `204 No Content`)
/// * `400 Bad Request` - missing or invalid signature, or a body that is not JSON
/// * `500 Internal Server Error` - no handler, or the handler failed; the provider retries
#[post("/transferwise-webhook")]
async fn transferwise_webhook(
    req: HttpRequest,
    body: web::Bytes,
    controller: web::Data<WebhookController>,
) -> Result<HttpResponse> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("TransferWise webhook without X-Signature header");
            AppError::signature("Missing X-Signature header")
        })?;

    if !controller.verifier.verify(&body, signature) {
        warn!(
            body_len = body.len(),
            "Error verifying TransferWise webhook signature"
        );
        return Err(AppError::signature("Invalid X-Signature"));
    }

    let event: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Webhook body is not JSON: {}", e)))?;

    match controller.registry.dispatch(&event).await {
        Ok(reply) => {
            let event_type = event.get("event_type").and_then(|v| v.as_str());
            info!(
                event_type,
                status = reply.status.as_u16(),
                "TransferWise webhook handled"
            );
            Ok(reply.into_response())
        }
        Err(e) => {
            let request_id = req.extensions().get::<RequestIdValue>().map(|id| id.0.clone());
            error!(
                error = %e,
                request_id = request_id.as_deref(),
                "Unhandled exception during TransferWise webhook"
            );
            info!(
                request_id = request_id.as_deref(),
                data = %String::from_utf8_lossy(&body),
                "Webhook data"
            );
            Err(AppError::internal("Webhook processing failed"))
        }
    }
}
