use super::super::models::BankAccount;
use crate::core::Result;
use sqlx::MySqlPool;

/// Local copies of the bank accounts customers can pay into
#[derive(Clone)]
pub struct BankAccountRepository {
    pool: MySqlPool,
}

impl BankAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh accounts keyed on their provider balance, in one transaction.
    ///
    /// The `active` flag is only set on insert so manual activation survives
    /// later syncs.
    pub async fn upsert_all(&self, accounts: &[BankAccount]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for account in accounts {
            sqlx::query(
                r#"
                INSERT INTO bank_account (
                    sort_code, acct_id, currency, active, institution,
                    address, swift, iban, borderless_account_id
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE
                    currency = VALUES(currency),
                    institution = VALUES(institution),
                    address = VALUES(address),
                    swift = VALUES(swift),
                    iban = VALUES(iban)
                "#,
            )
            .bind(&account.sort_code)
            .bind(&account.acct_id)
            .bind(&account.currency)
            .bind(account.active)
            .bind(&account.institution)
            .bind(&account.address)
            .bind(&account.swift)
            .bind(&account.iban)
            .bind(account.borderless_account_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(accounts.len())
    }

    pub async fn list(&self) -> Result<Vec<BankAccount>> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT sort_code, acct_id, currency, active, institution,
                   address, swift, iban, borderless_account_id
            FROM bank_account
            ORDER BY currency, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}
