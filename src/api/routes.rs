//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use super::docs::docs_router;
use super::transactions::{
    create_transaction, delete_transaction, get_transaction, list_transactions,
    list_user_totals_by_date, list_user_transactions, replace_transaction, update_transaction,
};
use super::users::{create_user, delete_user, get_user, list_users, replace_user, update_user};

/// Create the API router
pub fn create_router() -> Router<SqlitePool> {
    Router::new()
        // Users
        .route("/users/create/", post(create_user))
        .route("/users/list/", get(list_users))
        .route(
            "/users/detail/:id/",
            get(get_user)
                .put(replace_user)
                .patch(update_user)
                .delete(delete_user),
        )
        // Transactions
        .route("/transaction/create/", post(create_transaction))
        .route(
            "/transaction/detail/:id/",
            get(get_transaction)
                .put(replace_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route("/transaction/list/", get(list_transactions))
        .route("/transaction/:id/list/", get(list_user_transactions))
        .route("/transaction/:id/list-by-date/", get(list_user_totals_by_date))
        // Documentation
        .merge(docs_router())
}
