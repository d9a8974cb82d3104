// Bank account sync from TransferWise balances
//
// Only the retrieval step is exercised here; persistence is a plain upsert.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use transferwise_payments::config::TransferwiseConfig;
use transferwise_payments::modules::transferwise::TransferwiseService;

fn service(api: Arc<FakeTransferwise>) -> TransferwiseService {
    TransferwiseService::new(api, TransferwiseConfig::default())
}

#[tokio::test]
async fn test_balance_without_details_is_skipped() {
    let api = Arc::new(
        FakeTransferwise::online()
            .with_profile(business_profile(42))
            .with_borderless_account(borderless_account(
                7,
                42,
                vec![
                    balance_with_details(100, "EUR"),
                    balance_without_details(101, "PLN"),
                ],
            )),
    );

    let accounts = service(api).retrieve_accounts().await.unwrap();

    assert_eq!(accounts.len(), 1);
    let account = &accounts[0];
    assert_eq!(account.currency, "EUR");
    assert_eq!(account.institution, "TransferWise Europe SA");
    assert_eq!(
        account.address,
        "Avenue Louise 54, Room S52, Brussels, 1050, Belgium"
    );
    assert_eq!(account.swift.as_deref(), Some("TRWIBEB1XXX"));
    assert_eq!(account.borderless_account_id, Some(100));
    assert!(!account.active);
    assert!(account.sort_code.is_none());
    assert!(account.acct_id.is_none());
}

#[tokio::test]
async fn test_accounts_collected_across_borderless_accounts() {
    let api = Arc::new(
        FakeTransferwise::online()
            .with_profile(business_profile(42))
            .with_borderless_account(borderless_account(
                7,
                42,
                vec![balance_with_details(100, "EUR")],
            ))
            .with_borderless_account(borderless_account(
                8,
                42,
                vec![
                    balance_with_details(200, "USD"),
                    balance_with_details(201, "GBP"),
                ],
            )),
    );

    let accounts = service(api).retrieve_accounts().await.unwrap();

    let currencies: Vec<&str> = accounts.iter().map(|a| a.currency.as_str()).collect();
    assert_eq!(currencies, vec!["EUR", "USD", "GBP"]);
}

#[tokio::test]
async fn test_no_business_profile_yields_nothing() {
    let api = Arc::new(FakeTransferwise::online().with_profile(personal_profile(5)));

    let accounts = service(api.clone()).retrieve_accounts().await.unwrap();

    assert!(accounts.is_empty());
    assert_eq!(api.borderless_calls(), 0);
}

#[tokio::test]
async fn test_unreachable_api_is_an_error() {
    let api = Arc::new(FakeTransferwise::offline());

    let result = service(api).retrieve_accounts().await;

    assert!(result.is_err());
}
