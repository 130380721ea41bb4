//! Domain module
//!
//! Entities, value types and input validation.

pub mod amount;
pub mod error;
pub mod nullable;
pub mod params;
pub mod transaction;
pub mod user;

pub use amount::{Amount, AmountError};
pub use error::{DomainError, FieldErrors};
pub use params::{DateRange, OrderBy, OrderField, TransactionFilter, TransactionKind};
pub use transaction::{DailyTotal, NewTransaction, Transaction, TransactionChanges, TransactionPayload};
pub use user::{NewUser, UserChanges, UserEntity, UserPayload};
