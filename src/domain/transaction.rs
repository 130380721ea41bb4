//! Transaction entity
//!
//! Income/outcome records owned by a user, plus the per-day totals
//! returned by the aggregation endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::amount::Amount;
use super::error::{DomainError, FieldErrors, NULL, REQUIRED};

/// A persisted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Transaction {
    pub id: i64,
    #[schema(value_type = String, example = "-10.00")]
    pub amount: Amount,
    /// Creation time; never changed afterwards
    pub date: DateTime<Utc>,
    /// Owning user id
    #[serde(rename = "user")]
    pub user_id: i64,
}

/// Validated transaction to insert, or to fully replace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: Amount,
}

/// Validated partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionChanges {
    pub user_id: Option<i64>,
    pub amount: Option<Amount>,
}

impl From<NewTransaction> for TransactionChanges {
    fn from(tx: NewTransaction) -> Self {
        Self {
            user_id: Some(tx.user_id),
            amount: Some(tx.amount),
        }
    }
}

/// Sum of one user's transactions for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyTotal {
    #[schema(value_type = String, format = Date, example = "2021-05-01")]
    pub rdate: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.0)]
    pub sum: Decimal,
}

/// Request body for creating or updating a transaction.
///
/// Any `date` sent by the client is ignored; it is set on creation.
/// An explicit `null` is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TransactionPayload {
    /// Owning user id
    #[serde(default, deserialize_with = "crate::domain::nullable::present")]
    #[schema(value_type = Option<i64>, example = 1)]
    pub user: Option<Value>,
    #[serde(default, deserialize_with = "crate::domain::nullable::present")]
    #[schema(value_type = Option<String>, example = "9.99")]
    pub amount: Option<Value>,
}

impl TransactionPayload {
    /// Validate a payload where every field is required (create, PUT).
    pub fn into_new_transaction(self) -> Result<NewTransaction, DomainError> {
        let mut errors = FieldErrors::new();

        let user_id = match self.user {
            Some(value) => clean_user(&mut errors, &value),
            None => {
                errors.add("user", REQUIRED);
                None
            }
        };
        let amount = match self.amount {
            Some(value) => clean_amount(&mut errors, &value),
            None => {
                errors.add("amount", REQUIRED);
                None
            }
        };

        match (user_id, amount) {
            (Some(user_id), Some(amount)) if errors.is_empty() => {
                Ok(NewTransaction { user_id, amount })
            }
            _ => Err(DomainError::Validation(errors)),
        }
    }

    /// Validate a partial payload (PATCH).
    pub fn into_changes(self) -> Result<TransactionChanges, DomainError> {
        let mut errors = FieldErrors::new();
        let changes = TransactionChanges {
            user_id: self.user.and_then(|v| clean_user(&mut errors, &v)),
            amount: self.amount.and_then(|v| clean_amount(&mut errors, &v)),
        };
        errors.check()?;
        Ok(changes)
    }
}

/// Accept an integer or a numeric string as a primary key.
fn clean_user(errors: &mut FieldErrors, value: &Value) -> Option<i64> {
    if value.is_null() {
        errors.add("user", NULL);
        return None;
    }
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.add(
            "user",
            format!("Incorrect type. Expected pk value, received {}.", json_kind(value)),
        );
    }
    parsed
}

fn clean_amount(errors: &mut FieldErrors, value: &Value) -> Option<Amount> {
    if value.is_null() {
        errors.add("amount", NULL);
        return None;
    }
    match Amount::try_from(value) {
        Ok(amount) => Some(amount),
        Err(e) => {
            errors.add("amount", e.to_string());
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
