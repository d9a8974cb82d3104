use super::super::models::{BorderlessAccount, Profile, Subscription, User};
use crate::config::TransferwiseConfig;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Read-only operations this service needs from the TransferWise API
#[async_trait]
pub trait TransferwiseApi: Send + Sync {
    /// Profiles visible to the token, filtered by type ("business", "personal")
    async fn list_profiles(&self, profile_type: &str) -> Result<Vec<Profile>>;

    async fn list_borderless_accounts(&self, profile_id: i64) -> Result<Vec<BorderlessAccount>>;

    /// The user owning the API token
    async fn me(&self) -> Result<User>;

    async fn list_subscriptions(&self, profile_id: i64) -> Result<Vec<Subscription>>;
}

/// reqwest-backed TransferWise client
///
/// API Documentation: https://api-docs.transferwise.com
#[derive(Clone)]
pub struct TransferwiseClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl TransferwiseClient {
    pub fn new(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &TransferwiseConfig) -> Self {
        Self::new(config.api_token.clone(), config.api_base_url())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::provider(format!(
                        "TransferWise API unavailable: {} ({})",
                        if e.is_timeout() {
                            "timeout"
                        } else {
                            "connection failed"
                        },
                        e
                    ))
                } else {
                    AppError::provider(format!("TransferWise API request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                path = path,
                status = status.as_u16(),
                "TransferWise API returned an error"
            );
            return Err(AppError::provider(format!(
                "TransferWise API error {} on {}: {}",
                status, path, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::provider(format!("Failed to parse TransferWise response: {}", e))
        })
    }
}

#[async_trait]
impl TransferwiseApi for TransferwiseClient {
    async fn list_profiles(&self, profile_type: &str) -> Result<Vec<Profile>> {
        let profiles: Vec<Profile> = self.get_json("/v1/profiles", &[]).await?;

        Ok(profiles
            .into_iter()
            .filter(|p| p.profile_type.eq_ignore_ascii_case(profile_type))
            .collect())
    }

    async fn list_borderless_accounts(&self, profile_id: i64) -> Result<Vec<BorderlessAccount>> {
        self.get_json(
            "/v1/borderless-accounts",
            &[("profileId", profile_id.to_string())],
        )
        .await
    }

    async fn me(&self) -> Result<User> {
        self.get_json("/v1/me", &[]).await
    }

    async fn list_subscriptions(&self, profile_id: i64) -> Result<Vec<Subscription>> {
        self.get_json(&format!("/v3/profiles/{}/subscriptions", profile_id), &[])
            .await
    }
}
