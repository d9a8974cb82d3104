use super::super::models::{Payment, PaymentChange, PaymentKind, PaymentRow};
use crate::core::{AppError, Result};
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::warn;

/// Attempts at inserting a bank payment before giving up on bankref collisions
const BANKREF_ATTEMPTS: usize = 5;

/// Repository for payments and their state history
///
/// The `payment` table is polymorphic: `provider` selects the subtype and the
/// subtype columns (`bankref`, `object_id`) are nullable.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a new payment, returning it with its id set.
    ///
    /// A bankref that collides with an existing one is regenerated and the
    /// insert retried.
    pub async fn create(&self, payment: &Payment) -> Result<Payment> {
        let mut payment = payment.clone();

        for attempt in 1..=BANKREF_ATTEMPTS {
            match self.insert(&payment).await {
                Ok(id) => {
                    return self.find_by_id(id).await?.ok_or_else(|| {
                        AppError::internal("Payment was created but not found")
                    });
                }
                Err(e)
                    if e.is_unique_violation() && matches!(payment.kind, PaymentKind::Bank(_)) =>
                {
                    warn!(attempt, "Bank reference collision, regenerating");
                    payment.regenerate_bankref();
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal("Unable to allocate a unique bank reference"))
    }

    async fn insert(&self, payment: &Payment) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO payment (user_id, provider, amount_pence, state, bankref, object_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.provider().as_str())
        .bind(payment.amount_pence())
        .bind(&payment.state)
        .bind(payment.bankref())
        .bind(payment.object_id())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id() as i64;

        for change in &payment.changes {
            insert_change(&mut tx, id, change).await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Find a payment with its ordered state history
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, user_id, provider, amount_pence, state, bankref, object_id, created_at
            FROM payment
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let changes = self.find_changes(row.id).await?;
                Payment::from_row(row, changes).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Find the bank payment matching an incoming transfer reference
    pub async fn find_by_bankref(&self, bankref: &str) -> Result<Option<Payment>> {
        let id: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM payment
            WHERE provider = 'banktransfer' AND bankref = ?
            "#,
        )
        .bind(bankref.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        match id {
            Some((id,)) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// State history of a payment, oldest first
    pub async fn find_changes(&self, payment_id: i64) -> Result<Vec<PaymentChange>> {
        let changes = sqlx::query_as::<_, PaymentChange>(
            r#"
            SELECT id, payment_id, timestamp, state
            FROM payment_change
            WHERE payment_id = ?
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(payment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(changes)
    }

    /// Record a state transition: update the current state and append the change
    pub async fn record_state(&self, payment_id: i64, state: &str) -> Result<Payment> {
        let mut payment = self
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", payment_id)))?;

        let change = payment.record_state(state)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE payment SET state = ? WHERE id = ?")
            .bind(&payment.state)
            .bind(payment_id)
            .execute(&mut *tx)
            .await?;

        insert_change(&mut tx, payment_id, &change).await?;

        tx.commit().await?;

        tracing::info!(
            payment_id,
            state = %payment.state,
            "Payment state recorded"
        );

        self.find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", payment_id)))
    }

    /// Delete a payment and its history, e.g. when its ticket is cancelled
    pub async fn delete(&self, payment_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM payment_change WHERE payment_id = ?")
            .bind(payment_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM payment WHERE id = ?")
            .bind(payment_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment {} not found",
                payment_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn insert_change(
    tx: &mut Transaction<'_, MySql>,
    payment_id: i64,
    change: &PaymentChange,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO payment_change (payment_id, timestamp, state)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(payment_id)
    .bind(change.timestamp)
    .bind(&change.state)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
