use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transferwise_payments::config::{Config, DatabaseConfig};
use transferwise_payments::middleware::{AdminAuth, RequestId};
use transferwise_payments::modules::health;
use transferwise_payments::modules::payments::controllers::payment_controller;
use transferwise_payments::modules::payments::{BillUrlSigner, PaymentRepository, PaymentService};
use transferwise_payments::modules::transferwise::controllers::{admin_controller, WebhookController};
use transferwise_payments::modules::transferwise::services::{
    transferwise_registry, RejectAll, RsaSignatureVerifier, SignatureVerifier,
};
use transferwise_payments::modules::transferwise::{
    BankAccountRepository, TransferwiseClient, TransferwiseService,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration (reads .env first)
    let config = Config::from_env().map_err(io::Error::other)?;

    init_tracing(&config);

    config.validate().map_err(io::Error::other)?;

    tracing::info!("Starting TransferWise payments service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .map_err(io::Error::other)?;

    DatabaseConfig::migrate(&db_pool)
        .await
        .map_err(io::Error::other)?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let verifier: Arc<dyn SignatureVerifier> = match &config.transferwise.webhook_public_key {
        Some(pem) => Arc::new(RsaSignatureVerifier::from_pem(pem).map_err(io::Error::other)?),
        None => {
            tracing::warn!(
                "TRANSFERWISE_WEBHOOK_PUBLIC_KEY not set, all webhook deliveries will be rejected"
            );
            Arc::new(RejectAll)
        }
    };

    let transferwise_client = TransferwiseClient::from_config(&config.transferwise);
    let transferwise_service = Arc::new(TransferwiseService::new(
        Arc::new(transferwise_client),
        config.transferwise.clone(),
    ));

    let bill_signer = match BillUrlSigner::from_config(&config.gocardless) {
        Ok(signer) => Some(signer),
        Err(e) => {
            tracing::warn!(error = %e, "GoCardless bill URLs disabled");
            None
        }
    };
    let payment_service = Arc::new(PaymentService::new(
        PaymentRepository::new(db_pool.clone()),
        bill_signer,
    ));

    let bank_accounts = BankAccountRepository::new(db_pool.clone());

    let registry = transferwise_registry();
    tracing::info!(event_types = ?registry.event_types(), "Webhook handlers registered");
    let webhook_controller = web::Data::new(WebhookController::new(registry, verifier));

    let admin_api_key = config.security.admin_api_key.clone();
    if admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set, admin endpoints will refuse all requests");
    }

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let webhook_controller = webhook_controller.clone();

        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(transferwise_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(bank_accounts.clone()))
            .configure(health::controllers::configure)
            .configure(|cfg| WebhookController::configure(cfg, webhook_controller))
            .service(
                web::scope("/admin")
                    .wrap(AdminAuth::new(admin_api_key.clone()))
                    .configure(admin_controller::configure)
                    .configure(payment_controller::configure),
            )
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides `LOG_LEVEL`.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "transferwise_payments={},actix_web=info",
            config.app.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.app.env == "production" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
