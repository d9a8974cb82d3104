use super::super::models::{BankAccount, BorderlessAccount, Profile};
use super::client::TransferwiseApi;
use crate::config::TransferwiseConfig;
use crate::core::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Account sync and health checks against TransferWise
#[derive(Clone)]
pub struct TransferwiseService {
    pub(super) api: Arc<dyn TransferwiseApi>,
    pub(super) config: TransferwiseConfig,
}

impl TransferwiseService {
    pub fn new(api: Arc<dyn TransferwiseApi>, config: TransferwiseConfig) -> Self {
        Self { api, config }
    }

    /// The account's business profile: the first business one listed, if any
    pub async fn business_profile(&self) -> Result<Option<Profile>> {
        let profiles = self.api.list_profiles("business").await?;
        Ok(profiles.into_iter().find(Profile::is_business))
    }

    /// Bank accounts for every balance that has deposit details.
    ///
    /// Nothing is stored here; callers persist the result.
    pub async fn retrieve_accounts(&self) -> Result<Vec<BankAccount>> {
        let Some(profile) = self.business_profile().await? else {
            info!("No TransferWise business profile, nothing to sync");
            return Ok(Vec::new());
        };

        let borderless_accounts = self.api.list_borderless_accounts(profile.id).await?;

        let accounts: Vec<BankAccount> = borderless_accounts
            .iter()
            .flat_map(collect_bank_accounts)
            .collect();

        info!(
            profile_id = profile.id,
            borderless_accounts = borderless_accounts.len(),
            bank_accounts = accounts.len(),
            "Retrieved TransferWise bank accounts"
        );

        Ok(accounts)
    }
}

/// One `BankAccount` per balance carrying bank details; other balances are skipped
pub fn collect_bank_accounts(account: &BorderlessAccount) -> Vec<BankAccount> {
    account
        .balances
        .iter()
        .filter_map(|balance| {
            let Some(details) = &balance.bank_details else {
                debug!(
                    balance_id = balance.id,
                    currency = %balance.currency,
                    "Skipping balance without bank details"
                );
                return None;
            };

            Some(BankAccount {
                sort_code: None,
                acct_id: None,
                currency: details.currency.clone(),
                active: false,
                institution: details.bank_name.clone(),
                address: details.bank_address.display_line(),
                swift: details.swift.clone(),
                iban: details.iban.clone(),
                borderless_account_id: Some(balance.id),
            })
        })
        .collect()
}
