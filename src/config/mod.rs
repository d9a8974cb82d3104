use crate::core::{AppError, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Expected length of a TransferWise API token
pub const TRANSFERWISE_TOKEN_LENGTH: usize = 36;

const TRANSFERWISE_SANDBOX_URL: &str = "https://api.sandbox.transferwise.tech";
const TRANSFERWISE_LIVE_URL: &str = "https://api.transferwise.com";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub transferwise: TransferwiseConfig,
    pub gocardless: GoCardlessConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// TransferWise environment selected by `TRANSFERWISE_ENVIRONMENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferwiseEnvironment {
    Sandbox,
    Live,
}

impl std::str::FromStr for TransferwiseEnvironment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(TransferwiseEnvironment::Sandbox),
            "live" => Ok(TransferwiseEnvironment::Live),
            _ => Err(format!("Invalid TransferWise environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferwiseConfig {
    /// Raw `TRANSFERWISE_ENVIRONMENT` value, unset when absent
    pub environment: Option<String>,
    pub api_token: String,
    /// PEM public key used to verify webhook signatures
    pub webhook_public_key: Option<String>,
    pub api_url: Option<String>,
}

impl TransferwiseConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("TRANSFERWISE_ENVIRONMENT").ok(),
            api_token: env::var("TRANSFERWISE_API_TOKEN").unwrap_or_default(),
            webhook_public_key: env::var("TRANSFERWISE_WEBHOOK_PUBLIC_KEY").ok(),
            api_url: env::var("TRANSFERWISE_API_URL").ok(),
        }
    }

    /// Parsed environment; unknown values count as not configured
    pub fn environment(&self) -> Option<TransferwiseEnvironment> {
        self.environment.as_deref().and_then(|e| e.parse().ok())
    }

    pub fn api_base_url(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_string();
        }

        match self.environment() {
            Some(TransferwiseEnvironment::Live) => TRANSFERWISE_LIVE_URL.to_string(),
            _ => TRANSFERWISE_SANDBOX_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoCardlessConfig {
    pub environment: Option<String>,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub merchant_id: Option<String>,
}

impl GoCardlessConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("GOCARDLESS_ENVIRONMENT").ok(),
            app_id: env::var("GOCARDLESS_APP_ID").ok(),
            app_secret: env::var("GOCARDLESS_APP_SECRET").ok(),
            merchant_id: env::var("GOCARDLESS_MERCHANT_ID").ok(),
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self.environment.as_deref() {
            Some("production") | Some("live") => "https://gocardless.com",
            _ => "https://sandbox.gocardless.com",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Bearer token for the admin endpoints; admin access is refused when unset
    pub admin_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            transferwise: TransferwiseConfig::from_env(),
            gocardless: GoCardlessConfig::from_env(),
            security: SecurityConfig {
                admin_api_key: env::var("ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE must not exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if let Some(env) = &self.transferwise.environment {
            if self.transferwise.environment().is_none() {
                tracing::warn!(
                    environment = %env,
                    "Unknown TRANSFERWISE_ENVIRONMENT, falling back to sandbox API"
                );
            }
        }

        Ok(())
    }
}
