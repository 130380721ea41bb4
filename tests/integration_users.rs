//! User API Integration Tests

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_create_user_increments_count() {
    let app = common::setup_app().await;

    let (status, body) = app
        .post(
            "/users/create/",
            json!({"first_name": "test", "last_name": "test", "email": "test@test.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["first_name"], "test");
    assert_eq!(body["last_name"], "test");
    assert_eq!(body["email"], "test@test.com");
    assert!(body["id"].as_i64().is_some());
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = common::setup_app().await;
    app.create_user("test", "test", "test@test.com").await;

    let (status, body) = app
        .post(
            "/users/create/",
            json!({"first_name": "other", "last_name": "other", "email": "test@test.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "validation_error");
    assert_eq!(
        body["fields"]["email"][0],
        "user entity with this email already exists."
    );
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = common::setup_app().await;

    let (status, body) = app
        .post(
            "/users/create/",
            json!({"first_name": "", "email": "not-an-email"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["first_name"][0], "This field may not be blank.");
    assert_eq!(body["fields"]["last_name"][0], "This field is required.");
    assert_eq!(body["fields"]["email"][0], "Enter a valid email address.");
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_create_user_rejects_too_long_name() {
    let app = common::setup_app().await;
    let long_name = "a".repeat(51);

    let (status, body) = app
        .post(
            "/users/create/",
            json!({"first_name": long_name, "last_name": "x", "email": "x@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["first_name"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = common::setup_app().await;

    let (status, body) = app
        .send_raw("POST", "/users/create/", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", String::from_utf8_lossy(&body));
}

#[tokio::test]
async fn test_list_users_in_id_order() {
    let app = common::setup_app().await;
    let first = app.create_user("a", "a", "a@example.com").await;
    let second = app.create_user("b", "b", "b@example.com").await;

    let (status, body) = app.get("/users/list/").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_user_detail() {
    let app = common::setup_app().await;
    let id = app.create_user("Ada", "Lovelace", "ada@example.com").await;

    let (status, body) = app.get(&format!("/users/detail/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": id, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"})
    );

    let (status, body) = app.get(&format!("/users/detail/{}/", id + 1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "not_found");

    let (status, _) = app.get("/users/detail/abc/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_requires_every_field() {
    let app = common::setup_app().await;
    let id = app.create_user("Ada", "Lovelace", "ada@example.com").await;
    let uri = format!("/users/detail/{}/", id);

    let (status, body) = app
        .send("PUT", &uri, Some(json!({"first_name": "Augusta"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["last_name"][0], "This field is required.");

    let (status, body) = app
        .send(
            "PUT",
            &uri,
            Some(json!({"first_name": "Augusta", "last_name": "King", "email": "augusta@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Augusta");
    assert_eq!(body["email"], "augusta@example.com");
}

#[tokio::test]
async fn test_put_unknown_user_is_not_found() {
    let app = common::setup_app().await;

    let (status, _) = app
        .send(
            "PUT",
            "/users/detail/42/",
            Some(json!({"first_name": "a", "last_name": "b", "email": "c@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_updates_given_fields_only() {
    let app = common::setup_app().await;
    let id = app.create_user("Ada", "Lovelace", "ada@example.com").await;
    let other = app.create_user("Bob", "Smith", "bob@example.com").await;

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/users/detail/{}/", id),
            Some(json!({"last_name": "King"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["last_name"], "King");

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/users/detail/{}/", other),
            Some(json!({"email": "ada@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());
}

#[tokio::test]
async fn test_delete_user_cascades_to_transactions() {
    let app = common::setup_app().await;
    let id = app.create_user("test", "test", "test@test.com").await;
    let keep = app.create_user("keep", "keep", "keep@test.com").await;
    app.create_transaction(id, "10.00").await;
    app.create_transaction(id, "-5.00").await;
    app.create_transaction(keep, "1.00").await;

    let (status, body) = app.send("DELETE", &format!("/users/detail/{}/", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    assert_eq!(app.count("users").await, 1);
    assert_eq!(app.count("transactions").await, 1);

    let (status, _) = app.send("DELETE", &format!("/users/detail/{}/", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_accepts_local_and_literal_domains() {
    let app = common::setup_app().await;

    for email in ["user@localhost", "user@[127.0.0.1]"] {
        let (status, body) = app
            .post(
                "/users/create/",
                json!({"first_name": "a", "last_name": "b", "email": email}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{} -> {}", email, body);
        assert_eq!(body["email"], email);
    }
    assert_eq!(app.count("users").await, 2);
}

#[tokio::test]
async fn test_patch_null_field_is_rejected() {
    let app = common::setup_app().await;
    let id = app.create_user("Ada", "Lovelace", "ada@example.com").await;
    let uri = format!("/users/detail/{}/", id);

    let (status, body) = app
        .send("PATCH", &uri, Some(json!({"first_name": null})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["first_name"][0], "This field may not be null.");

    let (_, body) = app.get(&uri).await;
    assert_eq!(body["first_name"], "Ada");
}
