//! Transaction endpoints

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use crate::domain::{
    DailyTotal, DateRange, Transaction, TransactionChanges, TransactionFilter, TransactionPayload,
};
use crate::error::{AppError, AppResult};
use crate::store::{TransactionRepository, UserRepository};

use super::extract::{Json, Path, Query};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Transaction {}", id))
}

/// Query parameters of the transaction list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    /// Owning user id
    pub user: Option<String>,
    /// Calendar date in format YYYY-MM-DD
    pub date: Option<String>,
    /// Type of transaction: income/outcome
    pub type_ta: Option<String>,
    /// Comma-separated `amount`, `date`; prefix `-` for descending
    pub ordering: Option<String>,
}

/// Query parameters of the per-day aggregation
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// Start date in format YYYY-MM-DD
    pub start: Option<String>,
    /// End date in format YYYY-MM-DD
    pub end: Option<String>,
}

/// Create a transaction dated now
#[utoipa::path(
    post,
    path = "/transaction/create/",
    tag = "transactions",
    request_body = TransactionPayload,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Invalid payload or unknown user", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_transaction(
    State(pool): State<SqlitePool>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let new = payload.into_new_transaction()?;
    let transaction = TransactionRepository::new(pool).create(&new).await?;

    tracing::info!(
        transaction_id = transaction.id,
        user_id = transaction.user_id,
        amount = %transaction.amount,
        "Transaction created"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Get a transaction by id
#[utoipa::path(
    get,
    path = "/transaction/detail/{id}/",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = Transaction),
        (status = 404, description = "No such transaction", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<Transaction>> {
    TransactionRepository::new(pool)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Replace the owner and amount of a transaction
#[utoipa::path(
    put,
    path = "/transaction/detail/{id}/",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction id")),
    request_body = TransactionPayload,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Invalid payload or unknown user", body = crate::error::ErrorResponse),
        (status = 404, description = "No such transaction", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<Json<Transaction>> {
    let repo = TransactionRepository::new(pool);
    if repo.get(id).await?.is_none() {
        return Err(not_found(id));
    }

    let changes: TransactionChanges = payload.into_new_transaction()?.into();
    let transaction = repo.update(id, &changes).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(transaction_id = id, "Transaction replaced");
    Ok(Json(transaction))
}

/// Update the owner and/or amount of a transaction
#[utoipa::path(
    patch,
    path = "/transaction/detail/{id}/",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction id")),
    request_body = TransactionPayload,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Invalid payload or unknown user", body = crate::error::ErrorResponse),
        (status = 404, description = "No such transaction", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<Json<Transaction>> {
    let repo = TransactionRepository::new(pool);
    if repo.get(id).await?.is_none() {
        return Err(not_found(id));
    }

    let changes = payload.into_changes()?;
    let transaction = repo.update(id, &changes).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(transaction_id = id, "Transaction updated");
    Ok(Json(transaction))
}

/// Delete a transaction
#[utoipa::path(
    delete,
    path = "/transaction/detail/{id}/",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "No such transaction", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !TransactionRepository::new(pool).delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(transaction_id = id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List transactions with optional filters and ordering
#[utoipa::path(
    get,
    path = "/transaction/list/",
    tag = "transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Matching transactions", body = [Transaction]),
        (status = 400, description = "Malformed date or unknown user", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_transactions(
    State(pool): State<SqlitePool>,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    let filter = TransactionFilter::from_params(
        query.user.as_deref(),
        query.date.as_deref(),
        query.type_ta.as_deref(),
        query.ordering.as_deref(),
    )?;

    if let Some(user_id) = filter.user {
        if !UserRepository::new(pool.clone()).exists(user_id).await? {
            return Err(AppError::unknown_user_choice());
        }
    }

    let transactions = TransactionRepository::new(pool).list(&filter).await?;
    tracing::debug!(?filter, "Listed {} transactions", transactions.len());
    Ok(Json(transactions))
}

/// All transactions of one user; empty when the user does not exist
#[utoipa::path(
    get,
    path = "/transaction/{id}/list/",
    tag = "transactions",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "The user's transactions", body = [Transaction]))
)]
pub async fn list_user_transactions(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = TransactionRepository::new(pool)
        .list(&TransactionFilter::for_user(user_id))
        .await?;
    Ok(Json(transactions))
}

/// Sum of a user's transactions per calendar day.
///
/// Pass both `start` and `end` to restrict the days, or neither.
#[utoipa::path(
    get,
    path = "/transaction/{id}/list-by-date/",
    tag = "transactions",
    params(("id" = i64, Path, description = "User id"), DateRangeQuery),
    responses(
        (status = 200, description = "Per-day totals", body = [DailyTotal]),
        (status = 400, description = "Incomplete or malformed date range", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_totals_by_date(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<DailyTotal>>> {
    if !UserRepository::new(pool.clone()).exists(user_id).await? {
        return Err(AppError::NotFound(format!("User {}", user_id)));
    }

    let range = DateRange::from_params(query.start.as_deref(), query.end.as_deref())?;
    let totals = TransactionRepository::new(pool).daily_totals(user_id, range).await?;

    tracing::debug!(user_id, ?range, "Aggregated {} days", totals.len());
    Ok(Json(totals))
}
