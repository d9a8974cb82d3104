// Payment persistence against MySQL
//
// Run with: TEST_DATABASE_URL=mysql://... cargo test --test payment_repository_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rust_decimal_macros::dec;
use transferwise_payments::core::AppError;
use transferwise_payments::modules::payments::models::{BankPayment, PaymentKind};
use transferwise_payments::modules::payments::{Payment, PaymentRepository};

#[tokio::test]
#[ignore] // Requires test database
async fn test_create_assigns_id_and_keeps_bankref() {
    let repository = PaymentRepository::new(create_test_pool().await);
    let payment = Payment::bank_transfer(unique_user_id(), dec!(12.34)).unwrap();

    let stored = repository.create(&payment).await.unwrap();

    assert!(stored.id.is_some());
    assert_eq!(stored.bankref(), payment.bankref());
    assert_eq!(stored.amount(), dec!(12.34));
    assert_eq!(stored.state, "new");
    assert!(stored.created_at.is_some());

    let found = repository
        .find_by_bankref(&payment.bankref().unwrap().to_lowercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, stored.id);
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_bankref_collision_is_regenerated() {
    let repository = PaymentRepository::new(create_test_pool().await);
    let first = repository
        .create(&Payment::bank_transfer(unique_user_id(), dec!(5.00)).unwrap())
        .await
        .unwrap();
    let taken = first.bankref().unwrap().to_string();

    let mut second = Payment::bank_transfer(unique_user_id(), dec!(6.00)).unwrap();
    second.kind = PaymentKind::Bank(BankPayment {
        bankref: taken.clone(),
    });

    let stored = repository.create(&second).await.unwrap();

    assert_ne!(stored.bankref().unwrap(), taken);
    assert_ne!(stored.id, first.id);
    assert_eq!(stored.amount(), dec!(6.00));
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_gocardless_payment_has_no_bankref() {
    let repository = PaymentRepository::new(create_test_pool().await);

    let stored = repository
        .create(&Payment::gocardless(unique_user_id(), dec!(20.00)).unwrap())
        .await
        .unwrap();

    assert_eq!(stored.bankref(), None);
    assert_eq!(stored.object_id(), None);
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_record_state_appends_history_in_order() {
    let repository = PaymentRepository::new(create_test_pool().await);
    let payment = repository
        .create(&Payment::bank_transfer(unique_user_id(), dec!(1.00)).unwrap())
        .await
        .unwrap();
    let id = payment.id.unwrap();

    repository.record_state(id, "inprogress").await.unwrap();
    let updated = repository.record_state(id, "paid").await.unwrap();

    assert_eq!(updated.state, "paid");

    let changes = repository.find_changes(id).await.unwrap();
    let states: Vec<&str> = changes.iter().map(|c| c.state.as_str()).collect();
    assert_eq!(states, vec!["inprogress", "paid"]);
    assert!(changes[0].timestamp <= changes[1].timestamp);
    assert!(changes.iter().all(|c| c.payment_id == Some(id)));
    assert_eq!(updated.changes, changes);
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_record_state_on_missing_payment_is_not_found() {
    let repository = PaymentRepository::new(create_test_pool().await);

    let result = repository.record_state(i64::MAX, "paid").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_delete_removes_payment_and_history() {
    let repository = PaymentRepository::new(create_test_pool().await);
    let payment = repository
        .create(&Payment::bank_transfer(unique_user_id(), dec!(3.50)).unwrap())
        .await
        .unwrap();
    let id = payment.id.unwrap();
    repository.record_state(id, "cancelled").await.unwrap();

    repository.delete(id).await.unwrap();

    assert!(repository.find_by_id(id).await.unwrap().is_none());
    assert!(repository.find_changes(id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_delete_missing_payment_is_not_found() {
    let pool = create_test_pool().await;
    let repository = PaymentRepository::new(pool.clone());

    let result = repository.delete(i64::MAX).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The failed delete must not leave a transaction holding locks
    let result: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(result, 1);
}
