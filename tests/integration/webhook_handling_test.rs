// Webhook intake: signature check, dispatch and failure mapping
//
// Runs the real controller in-process with a registry built per test and a
// verifier holding a freshly generated public key.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use helpers::*;
use serde_json::{json, Value};
use transferwise_payments::core::Result;
use transferwise_payments::modules::transferwise::controllers::{
    WebhookController, SIGNATURE_HEADER,
};
use transferwise_payments::modules::transferwise::services::{
    transferwise_registry, RsaSignatureVerifier, SignatureVerifier, WebhookHandler,
    WebhookRegistry, WebhookReply,
};

/// Counts invocations and answers with a fixed reply
#[derive(Clone)]
struct Recording {
    calls: Arc<AtomicUsize>,
    reply: WebhookReply,
}

impl Recording {
    fn new(reply: WebhookReply) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebhookHandler for Recording {
    async fn handle(&self, _event_type: &str, _event: &Value) -> Result<WebhookReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

struct Failing;

#[async_trait]
impl WebhookHandler for Failing {
    async fn handle(&self, _event_type: &str, _event: &Value) -> Result<WebhookReply> {
        Err(transferwise_payments::core::AppError::internal(
            "downstream unavailable",
        ))
    }
}

struct Panicking;

#[async_trait]
impl WebhookHandler for Panicking {
    async fn handle(&self, _event_type: &str, event: &Value) -> Result<WebhookReply> {
        let amount = event["data"]["amount"].as_f64();
        panic!("unexpected payload, amount = {:?}", amount);
    }
}

fn verifier(signer: &TestSigner) -> Arc<dyn SignatureVerifier> {
    Arc::new(RsaSignatureVerifier::from_pem(&signer.public_pem).unwrap())
}

async fn post_signed(
    registry: WebhookRegistry,
    signer: &TestSigner,
    body: &str,
    signature: Option<String>,
) -> (StatusCode, web::Bytes) {
    let controller = web::Data::new(WebhookController::new(registry, verifier(signer)));
    let app = test::init_service(
        App::new().configure(|cfg| WebhookController::configure(cfg, controller)),
    )
    .await;

    let mut req = test::TestRequest::post()
        .uri("/transferwise-webhook")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((SIGNATURE_HEADER, signature));
    }

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    (status, test::read_body(resp).await)
}

fn event(event_type: &str) -> String {
    json!({
        "data": {
            "resource": { "type": "balance-account", "id": 111, "profile_id": 222 },
            "amount": 12.5,
            "currency": "GBP",
            "occurred_at": "2020-01-01T12:34:56Z"
        },
        "subscription_id": "01234567-89ab-cdef-0123-456789abcdef",
        "event_type": event_type,
        "schema_version": "2.0.0",
        "sent_at": "2020-01-01T12:34:56Z"
    })
    .to_string()
}

#[actix_web::test]
async fn test_balance_credit_is_acknowledged() {
    let signer = TestSigner::generate();
    let body = event("balances#credit");

    let (status, bytes) = post_signed(
        transferwise_registry(),
        &signer,
        &body,
        Some(signer.sign(body.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());
}

#[actix_web::test]
async fn test_unknown_event_goes_to_fallback() {
    let signer = TestSigner::generate();
    let fallback = Recording::new(WebhookReply::json(
        StatusCode::ACCEPTED,
        json!({ "queued": true }),
    ));
    let registry = transferwise_registry().with_fallback(fallback.clone());
    let body = event("transfers#state-change");

    let (status, bytes) =
        post_signed(registry, &signer, &body, Some(signer.sign(body.as_bytes()))).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    let reply: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reply, json!({ "queued": true }));
    assert_eq!(fallback.calls(), 1);
}

#[actix_web::test]
async fn test_unknown_event_without_fallback_is_500() {
    let signer = TestSigner::generate();
    let body = event("transfers#state-change");

    let (status, _) = post_signed(
        transferwise_registry(),
        &signer,
        &body,
        Some(signer.sign(body.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_event_without_type_uses_fallback() {
    let signer = TestSigner::generate();
    let fallback = Recording::new(WebhookReply::no_content());
    let registry = WebhookRegistry::new().with_fallback(fallback.clone());
    let body = json!({ "data": {} }).to_string();

    let (status, _) =
        post_signed(registry, &signer, &body, Some(signer.sign(body.as_bytes()))).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(fallback.calls(), 1);
}

#[actix_web::test]
async fn test_bad_signature_never_reaches_handler() {
    let signer = TestSigner::generate();
    let other = TestSigner::generate();
    let handler = Recording::new(WebhookReply::no_content());
    let body = event("balances#credit");

    let cases = vec![
        // Signed by a different key
        Some(other.sign(body.as_bytes())),
        // Signature over a different body
        Some(signer.sign(b"{}")),
        Some("not-base64!!".to_string()),
        None,
    ];

    for signature in cases {
        let registry = WebhookRegistry::new()
            .register("balances#credit", handler.clone())
            .with_fallback(handler.clone());

        let (status, _) = post_signed(registry, &signer, &body, signature).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert_eq!(handler.calls(), 0);
}

#[actix_web::test]
async fn test_handler_error_is_500() {
    let signer = TestSigner::generate();
    let registry = WebhookRegistry::new().register("balances#credit", Failing);
    let body = event("balances#credit");

    let (status, bytes) =
        post_signed(registry, &signer, &body, Some(signer.sign(body.as_bytes()))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Internal details stay in the logs
    let reply: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(!reply.to_string().contains("downstream unavailable"));
}

#[actix_web::test]
async fn test_handler_panic_is_500() {
    let signer = TestSigner::generate();
    let registry = WebhookRegistry::new().register("balances#credit", Panicking);
    let body = event("balances#credit");

    let (status, _) =
        post_signed(registry, &signer, &body, Some(signer.sign(body.as_bytes()))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_signed_non_json_body_is_400() {
    let signer = TestSigner::generate();
    let body = "event_type=balances%23credit";

    let (status, _) = post_signed(
        transferwise_registry(),
        &signer,
        body,
        Some(signer.sign(body.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
