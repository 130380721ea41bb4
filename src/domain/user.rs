//! User entity
//!
//! The persisted user record and the validation of user payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use super::error::{DomainError, FieldErrors, BLANK, NULL, REQUIRED};

/// Maximum length of `first_name`
pub const FIRST_NAME_MAX_LEN: usize = 50;

/// Maximum length of `last_name`
pub const LAST_NAME_MAX_LEN: usize = 100;

/// Maximum length of `email`
pub const EMAIL_MAX_LEN: usize = 254;

const INVALID_EMAIL: &str = "Enter a valid email address.";

/// A persisted user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserEntity {
    pub id: i64,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Validated fields of a user to insert, or to fully replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Validated partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<NewUser> for UserChanges {
    fn from(user: NewUser) -> Self {
        Self {
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            email: Some(user.email),
        }
    }
}

/// Request body for creating or updating a user.
///
/// An absent key is `None`; an explicit `null` is `Some(None)`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "crate::domain::nullable::present")]
    #[schema(value_type = Option<String>, example = "Ada")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::domain::nullable::present")]
    #[schema(value_type = Option<String>, example = "Lovelace")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::domain::nullable::present")]
    #[schema(value_type = Option<String>, example = "ada@example.com")]
    pub email: Option<Option<String>>,
}

impl UserPayload {
    /// Validate a payload where every field is required (create, PUT).
    pub fn into_new_user(self) -> Result<NewUser, DomainError> {
        let mut errors = FieldErrors::new();

        let first_name = required(&mut errors, "first_name", self.first_name)
            .and_then(|v| clean_text(&mut errors, "first_name", v, FIRST_NAME_MAX_LEN));
        let last_name = required(&mut errors, "last_name", self.last_name)
            .and_then(|v| clean_text(&mut errors, "last_name", v, LAST_NAME_MAX_LEN));
        let email = required(&mut errors, "email", self.email)
            .and_then(|v| clean_email(&mut errors, v));

        match (first_name, last_name, email) {
            (Some(first_name), Some(last_name), Some(email)) if errors.is_empty() => Ok(NewUser {
                first_name,
                last_name,
                email,
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }

    /// Validate a partial payload (PATCH); absent fields stay unchanged.
    pub fn into_changes(self) -> Result<UserChanges, DomainError> {
        let mut errors = FieldErrors::new();

        let first_name = not_null(&mut errors, "first_name", self.first_name)
            .and_then(|v| clean_text(&mut errors, "first_name", v, FIRST_NAME_MAX_LEN));
        let last_name = not_null(&mut errors, "last_name", self.last_name)
            .and_then(|v| clean_text(&mut errors, "last_name", v, LAST_NAME_MAX_LEN));
        let email = not_null(&mut errors, "email", self.email)
            .and_then(|v| clean_email(&mut errors, v));

        errors.check()?;
        Ok(UserChanges {
            first_name,
            last_name,
            email,
        })
    }
}

fn required(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<Option<String>>,
) -> Option<String> {
    if value.is_none() {
        errors.add(field, REQUIRED);
        return None;
    }
    not_null(errors, field, value)
}

fn not_null(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<Option<String>>,
) -> Option<String> {
    match value {
        Some(None) => {
            errors.add(field, NULL);
            None
        }
        Some(value) => value,
        None => None,
    }
}

/// Trim surrounding whitespace, then enforce non-blank and the length limit.
fn clean_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: String,
    max_len: usize,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
        return None;
    }
    Some(value.to_string())
}

fn clean_email(errors: &mut FieldErrors, value: String) -> Option<String> {
    let value = clean_text(errors, "email", value, EMAIL_MAX_LEN)?;
    if !is_valid_email(&value) {
        errors.add("email", INVALID_EMAIL);
        return None;
    }
    Some(value)
}

/// E-mail address check with the `validator` crate's rules.
pub fn is_valid_email(value: &str) -> bool {
    value.validate_email()
}
