use crate::core::{AppError, Result};
use actix_web::{http::StatusCode, HttpResponse};
use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

/// What a webhook handler wants sent back to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl WebhookReply {
    /// Empty 204, the normal acknowledgement
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        match self.body {
            Some(body) => HttpResponse::build(self.status).json(body),
            None => HttpResponse::build(self.status).finish(),
        }
    }
}

/// Handles one kind of webhook event
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    async fn handle(&self, event_type: &str, event: &Value) -> Result<WebhookReply>;
}

/// Event-type to handler table, built once at startup and shared by workers.
///
/// Events without a registered handler go to the fallback when one is set;
/// otherwise dispatch fails with `AppError::UnhandledEvent`.
#[derive(Clone, Default)]
pub struct WebhookRegistry {
    handlers: HashMap<String, Arc<dyn WebhookHandler>>,
    fallback: Option<Arc<dyn WebhookHandler>>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(mut self, event_type: impl Into<String>, handler: H) -> Self
    where
        H: WebhookHandler + 'static,
    {
        self.handlers.insert(event_type.into(), Arc::new(handler));
        self
    }

    pub fn with_fallback<H>(mut self, handler: H) -> Self
    where
        H: WebhookHandler + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Registered event types, sorted
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Handler for `event_type`, or the fallback
    pub fn handler_for(&self, event_type: Option<&str>) -> Result<Arc<dyn WebhookHandler>> {
        event_type
            .and_then(|t| self.handlers.get(t))
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| {
                AppError::UnhandledEvent(event_type.unwrap_or("<missing>").to_string())
            })
    }

    /// Route an event to its handler.
    ///
    /// A panicking handler is reported as an internal error.
    pub async fn dispatch(&self, event: &Value) -> Result<WebhookReply> {
        let event_type = event.get("event_type").and_then(Value::as_str);
        let handler = self.handler_for(event_type)?;

        debug!(event_type = event_type.unwrap_or("<missing>"), "Dispatching webhook");

        AssertUnwindSafe(handler.handle(event_type.unwrap_or_default(), event))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(AppError::internal("Webhook handler panicked")))
    }
}
