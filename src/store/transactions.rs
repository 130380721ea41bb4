//! Transaction Repository
//!
//! CRUD, filtered listing and per-day aggregation over the
//! `transactions` table. Amounts are stored as integer hundredths;
//! timestamps as RFC 3339 text in UTC, so `date(occurred_at)` is the
//! calendar day of a transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::domain::{
    Amount, DailyTotal, DateRange, NewTransaction, OrderBy, OrderField, Transaction,
    TransactionChanges, TransactionFilter, TransactionKind,
};

use super::StoreError;

type TransactionRow = (i64, i64, i64, DateTime<Utc>);

const SELECT_COLUMNS: &str = "SELECT id, user_id, amount, occurred_at FROM transactions";

fn into_transaction((id, user_id, amount, occurred_at): TransactionRow) -> Transaction {
    Transaction {
        id,
        amount: Amount::from_minor_units(amount),
        date: occurred_at,
        user_id,
    }
}

fn order_clause(order: &OrderBy) -> &'static str {
    match (order.field, order.descending) {
        (OrderField::Amount, false) => "amount ASC",
        (OrderField::Amount, true) => "amount DESC",
        (OrderField::Date, false) => "occurred_at ASC",
        (OrderField::Date, true) => "occurred_at DESC",
    }
}

/// Repository for transactions
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Create a new TransactionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Transactions matching every filter that is set, in the requested
    /// order. Ties, and the unordered case, fall back to id order.
    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, StoreError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        query.push(" WHERE 1 = 1");

        if let Some(user_id) = filter.user {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(date) = filter.date {
            query.push(" AND date(occurred_at) = ").push_bind(date);
        }
        match filter.kind {
            Some(TransactionKind::Income) => {
                query.push(" AND amount > 0");
            }
            Some(TransactionKind::Outcome) => {
                query.push(" AND amount < 0");
            }
            None => {}
        }

        query.push(" ORDER BY ");
        for order in &filter.ordering {
            query.push(order_clause(order)).push(", ");
        }
        query.push("id ASC");

        let rows: Vec<TransactionRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(into_transaction).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let row: Option<TransactionRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(into_transaction))
    }

    /// Insert a transaction dated now.
    /// The owner must exist, else `StoreError::UnknownUser`.
    pub async fn create(&self, new: &NewTransaction) -> Result<Transaction, StoreError> {
        let mut tx = self.pool.begin().await?;

        ensure_user(&mut tx, new.user_id).await?;

        let row: TransactionRow = sqlx::query_as(
            r#"
            INSERT INTO transactions (user_id, amount, occurred_at)
            VALUES (?, ?, ?)
            RETURNING id, user_id, amount, occurred_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.amount.minor_units())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(transaction_id = row.0, user_id = row.1, "Inserted transaction");
        Ok(into_transaction(row))
    }

    /// Apply changes; the date is never touched.
    /// `Ok(None)` when the transaction does not exist.
    pub async fn update(
        &self,
        id: i64,
        changes: &TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(user_id) = changes.user_id {
            ensure_user(&mut tx, user_id).await?;
        }

        let row: Option<TransactionRow> = sqlx::query_as(
            r#"
            UPDATE transactions
            SET user_id = COALESCE(?, user_id),
                amount = COALESCE(?, amount)
            WHERE id = ?
            RETURNING id, user_id, amount, occurred_at
            "#,
        )
        .bind(changes.user_id)
        .bind(changes.amount.map(|a| a.minor_units()))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.map(into_transaction))
    }

    /// Returns false when no such transaction exists.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sum of a user's amounts per calendar day, oldest day first.
    /// With a range, only days within `[start, end]` are included.
    pub async fn daily_totals(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<DailyTotal>, StoreError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT date(occurred_at) AS rdate, SUM(amount) AS total FROM transactions WHERE user_id = ",
        );
        query.push_bind(user_id);

        if let Some(range) = range {
            query
                .push(" AND date(occurred_at) BETWEEN ")
                .push_bind(range.start)
                .push(" AND ")
                .push_bind(range.end);
        }
        query.push(" GROUP BY rdate ORDER BY rdate");

        let rows: Vec<(NaiveDate, i64)> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(rdate, total)| DailyTotal {
                rdate,
                sum: Decimal::new(total, 2),
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn ensure_user(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    user_id: i64,
) -> Result<(), StoreError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::UnknownUser(user_id)),
    }
}
