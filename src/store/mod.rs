//! Entity store
//!
//! SQLite-backed repositories for users and transactions.

pub mod transactions;
pub mod users;

pub use transactions::TransactionRepository;
pub use users::UserRepository;

/// Store Error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("User does not exist: {0}")]
    UnknownUser(i64),
}

/// Map a UNIQUE violation on `users.email` to `DuplicateEmail`.
pub(crate) fn map_unique_email(err: sqlx::Error) -> StoreError {
    let is_unique = matches!(
        &err,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.message().contains("UNIQUE constraint failed")
    );
    if is_unique {
        StoreError::DuplicateEmail
    } else {
        StoreError::Database(err)
    }
}
