//! Common test utilities

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use user_ledger::{api, db};

/// Application wired to a fresh in-memory database
pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
}

pub async fn setup_app() -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");

    TestApp {
        router: api::build_app(pool.clone()),
        pool,
    }
}

impl TestApp {
    /// Send a request and return status plus raw body
    pub async fn send_raw(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    /// Create a user through the API and return its id
    pub async fn create_user(&self, first_name: &str, last_name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/users/create/",
                json!({"first_name": first_name, "last_name": last_name, "email": email}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "User creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Create a transaction through the API and return its id
    pub async fn create_transaction(&self, user_id: i64, amount: &str) -> i64 {
        let (status, body) = self
            .post(
                "/transaction/create/",
                json!({"user": user_id, "amount": amount}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "Transaction creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Insert a transaction with an explicit timestamp, bypassing the API
    pub async fn insert_transaction_at(&self, user_id: i64, minor_units: i64, at: DateTime<Utc>) {
        sqlx::query("INSERT INTO transactions (user_id, amount, occurred_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(minor_units)
            .bind(at)
            .execute(&self.pool)
            .await
            .expect("Failed to insert transaction");
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
