//! User Repository
//!
//! CRUD access to the `users` table.

use sqlx::SqlitePool;

use crate::domain::{NewUser, UserChanges, UserEntity};

use super::{map_unique_email, StoreError};

type UserRow = (i64, String, String, String);

fn into_entity((id, first_name, last_name, email): UserRow) -> UserEntity {
    UserEntity {
        id,
        first_name,
        last_name,
        email,
    }
}

/// Repository for user entities
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All users in id order
    pub async fn list(&self) -> Result<Vec<UserEntity>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_entity).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Option<UserEntity>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_entity))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Insert a user; a taken email yields `StoreError::DuplicateEmail`
    pub async fn create(&self, user: &NewUser) -> Result<UserEntity, StoreError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (first_name, last_name, email)
            VALUES (?, ?, ?)
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_email)?;

        tracing::debug!(user_id = row.0, "Inserted user");
        Ok(into_entity(row))
    }

    /// Apply changes; `Ok(None)` when the user does not exist
    pub async fn update(
        &self,
        id: i64,
        changes: &UserChanges,
    ) -> Result<Option<UserEntity>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                email = COALESCE(?, email)
            WHERE id = ?
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(row.map(into_entity))
    }

    /// Delete a user and, by cascade, its transactions.
    /// Returns false when no such user exists.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
