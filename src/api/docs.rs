//! API documentation
//!
//! OpenAPI document plus the Swagger UI and ReDoc pages rendering it.

use axum::{response::Html, routing::get, Router};
use sqlx::SqlitePool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{DailyTotal, Transaction, TransactionPayload, UserEntity, UserPayload};
use crate::error::ErrorResponse;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        super::users::create_user,
        super::users::list_users,
        super::users::get_user,
        super::users::replace_user,
        super::users::update_user,
        super::users::delete_user,
        super::transactions::create_transaction,
        super::transactions::get_transaction,
        super::transactions::replace_transaction,
        super::transactions::update_transaction,
        super::transactions::delete_transaction,
        super::transactions::list_transactions,
        super::transactions::list_user_transactions,
        super::transactions::list_user_totals_by_date,
    ),
    components(schemas(
        UserEntity,
        UserPayload,
        Transaction,
        TransactionPayload,
        DailyTotal,
        ErrorResponse,
    )),
    tags(
        (name = "users", description = "User entities"),
        (name = "transactions", description = "Income and outcome transactions"),
    ),
    info(
        title = "User Ledger API",
        description = "Users and their income/outcome transactions",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;

const REDOC_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>User Ledger API</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
  </head>
  <body>
    <redoc spec-url="/api-docs/openapi.json"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

async fn redoc() -> Html<&'static str> {
    Html(REDOC_PAGE)
}

/// Swagger UI at `/swagger/`, ReDoc at `/redoc/`, raw document at `/api-docs/openapi.json`
pub fn docs_router() -> Router<SqlitePool> {
    Router::new()
        .merge(SwaggerUi::new("/swagger").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .route("/redoc", get(redoc))
        .route("/redoc/", get(redoc))
}
