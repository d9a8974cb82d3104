use super::super::models::Diagnostic;
use super::transferwise_service::TransferwiseService;
use crate::config::{TransferwiseEnvironment, TRANSFERWISE_TOKEN_LENGTH};

impl TransferwiseService {
    /// Check that TransferWise is configured and reachable.
    ///
    /// Failures become diagnostic lines rather than errors. Order: environment,
    /// token, connectivity, business profile, webhook subscriptions.
    pub async fn validate(&self) -> Vec<Diagnostic> {
        let mut result = Vec::new();

        result.push(match self.config.environment() {
            Some(TransferwiseEnvironment::Sandbox) => {
                Diagnostic::pass("Sandbox environment being used")
            }
            Some(TransferwiseEnvironment::Live) => Diagnostic::pass("Live environment being used"),
            None => Diagnostic::fail("No environment configured"),
        });

        if self.config.api_token.len() == TRANSFERWISE_TOKEN_LENGTH {
            result.push(Diagnostic::pass("Access token set"));
        } else {
            result.push(Diagnostic::fail("Access token not set"));
        }

        match self.api.me().await {
            Ok(_) => result.push(Diagnostic::pass("Connection to TransferWise API succeeded")),
            Err(e) => result.push(Diagnostic::fail(format!(
                "Unable to connect to TransferWise: {}",
                e
            ))),
        }

        let profile = match self.business_profile().await {
            Ok(Some(profile)) => {
                result.push(Diagnostic::pass("TransferWise business profile exists"));
                profile
            }
            Ok(None) => {
                result.push(Diagnostic::fail("TransferWise business profile does not exist"));
                result.push(no_profile_for_subscriptions());
                return result;
            }
            Err(e) => {
                result.push(Diagnostic::fail(format!(
                    "Unable to look up TransferWise business profile: {}",
                    e
                )));
                result.push(no_profile_for_subscriptions());
                return result;
            }
        };

        match self.api.list_subscriptions(profile.id).await {
            Ok(subscriptions) if !subscriptions.is_empty() => {
                result.push(Diagnostic::pass("Webhook event subscriptions are present"))
            }
            Ok(_) => result.push(Diagnostic::fail(
                "Webhook event subscriptions are not present",
            )),
            Err(e) => result.push(Diagnostic::fail(format!(
                "Unable to list webhook event subscriptions: {}",
                e
            ))),
        }

        let failed = result.iter().filter(|d| !d.ok).count();
        tracing::info!(checks = result.len(), failed, "TransferWise validation complete");

        result
    }
}

fn no_profile_for_subscriptions() -> Diagnostic {
    Diagnostic::fail("Webhook event subscriptions cannot be checked without a business profile")
}
