// Bank account upserts against MySQL
//
// Run with: TEST_DATABASE_URL=mysql://... cargo test --test bank_account_repository_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use sqlx::MySqlPool;
use transferwise_payments::modules::transferwise::{BankAccount, BankAccountRepository};

fn account(borderless_account_id: i64, institution: &str) -> BankAccount {
    BankAccount {
        sort_code: Some("231470".to_string()),
        acct_id: Some("12345678".to_string()),
        currency: "GBP".to_string(),
        active: false,
        institution: institution.to_string(),
        address: "56 Shoreditch High Street, London".to_string(),
        swift: None,
        iban: Some("GB33BUKB20201555555555".to_string()),
        borderless_account_id: Some(borderless_account_id),
    }
}

async fn stored(repository: &BankAccountRepository, borderless_account_id: i64) -> Vec<BankAccount> {
    repository
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.borderless_account_id == Some(borderless_account_id))
        .collect()
}

async fn activate(pool: &MySqlPool, borderless_account_id: i64) {
    sqlx::query("UPDATE bank_account SET active = TRUE WHERE borderless_account_id = ?")
        .bind(borderless_account_id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_upsert_inserts_new_accounts_inactive() {
    let repository = BankAccountRepository::new(create_test_pool().await);
    let id = unique_borderless_id();

    let count = repository.upsert_all(&[account(id, "TransferWise")]).await.unwrap();

    assert_eq!(count, 1);
    let accounts = stored(&repository, id).await;
    assert_eq!(accounts, vec![account(id, "TransferWise")]);
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_resync_keeps_manual_activation() {
    let pool = create_test_pool().await;
    let repository = BankAccountRepository::new(pool.clone());
    let id = unique_borderless_id();

    repository.upsert_all(&[account(id, "TransferWise")]).await.unwrap();
    activate(&pool, id).await;

    repository
        .upsert_all(&[account(id, "Wise Payments Limited")])
        .await
        .unwrap();

    let accounts = stored(&repository, id).await;
    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].active);
    assert_eq!(accounts[0].institution, "Wise Payments Limited");
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_upsert_of_same_balance_does_not_duplicate() {
    let repository = BankAccountRepository::new(create_test_pool().await);
    let id = unique_borderless_id();

    repository.upsert_all(&[account(id, "TransferWise")]).await.unwrap();
    repository.upsert_all(&[account(id, "TransferWise")]).await.unwrap();

    assert_eq!(stored(&repository, id).await.len(), 1);
}
