//! user_ledger Library
//!
//! Re-exports modules for the server binary and integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod store;

mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse};
