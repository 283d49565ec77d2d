//! End-to-end account flows over the in-memory store

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_login_update_delete_scenario() {
    let app = common::TestApp::new().await;

    // Register
    let response = app
        .post(
            "/api/v1/users",
            json!({ "name": "Ana", "email": "ana@x.com", "password": "12345678" }),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["status"], "User created successfully");

    // Login
    let token = app.login("ana@x.com", "12345678").await;
    let ana_id = app
        .state
        .tokens()
        .decode(&token)
        .expect("issued token decodes")
        .user_id;

    // Rename
    let response = app
        .put(
            &format!("/api/v1/users/{}", ana_id),
            json!({ "user": { "name": "Nova" } }),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Usuário Atualizado");

    let response = app.get(&format!("/api/v1/users/{}", ana_id), Some(&token)).await;
    assert_eq!(response.json()["name"], "Nova");

    // Delete an id that does not exist
    let response = app.delete("/api/v1/users/-1", Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!response.json()["errors"].as_array().unwrap().is_empty());

    // Blank name
    let response = app
        .put(
            &format!("/api/v1/users/{}", ana_id),
            json!({ "user": { "name": "" } }),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = response.json()["errors"].clone();
    assert!(errors
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "Name can't be blank"));
}

#[tokio::test]
async fn test_create_is_public() {
    let app = common::TestApp::new().await;

    app.register("Ana", "ana@x.com", "12345678").await;
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_create_with_invalid_fields() {
    let app = common::TestApp::new().await;

    let response = app
        .post(
            "/api/v1/users",
            json!({ "user": { "name": "", "email": "not-an-email", "password": "123" } }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["errors"].as_array().unwrap().len(), 3);
    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn test_create_duplicate_email_ignoring_case() {
    let app = common::TestApp::new().await;
    app.register("Ana", "ana@x.com", "12345678").await;

    let response = app
        .post(
            "/api/v1/users",
            json!({ "name": "Other", "email": "ANA@X.COM", "password": "12345678" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["errors"][0], "Email has already been taken");
}

#[tokio::test]
async fn test_list_requires_login() {
    let app = common::TestApp::new().await;

    let response = app.get("/api/v1/users", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.json()["aviso"].is_string());
}

#[tokio::test]
async fn test_list_first_page() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;
    for i in 0..4 {
        app.register("User", &format!("user{}@x.com", i), "12345678")
            .await;
    }

    let response = app.get("/api/v1/users?per_page=2", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["total"], 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert!(body["data"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_list_page_past_the_end_returns_last_page() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;
    for i in 0..4 {
        app.register("User", &format!("user{}@x.com", i), "12345678")
            .await;
    }

    let response = app.get("/api/v1/users?page=6&per_page=2", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["page"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_unknown_user() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;

    let response = app.get("/api/v1/users/9999", Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["errors"][0], "Usuário inexistente");
}

#[tokio::test]
async fn test_update_unknown_user() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;

    let response = app
        .put("/api/v1/users/-1", json!({ "user": { "titulo": "Novo" } }), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!response.json()["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_password_then_login_with_it() {
    let app = common::TestApp::new().await;
    let id = app.register("Ana", "ana@x.com", "12345678").await;
    let token = app.login("ana@x.com", "12345678").await;

    let response = app
        .put(
            &format!("/api/v1/users/{}", id),
            json!({ "password": "a-new-password" }),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let old = app
        .post(
            "/api/v1/login",
            json!({ "email": "ana@x.com", "password": "12345678" }),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    app.login("ana@x.com", "a-new-password").await;
}

#[tokio::test]
async fn test_delete_user() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;
    let other = app.register("Bia", "bia@x.com", "12345678").await;

    let response = app
        .delete(&format!("/api/v1/users/{}", other), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_delete_requires_login_and_keeps_data() {
    let app = common::TestApp::new().await;
    let id = app.register("Ana", "ana@x.com", "12345678").await;

    let response = app.delete(&format!("/api/v1/users/{}", id), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_deleting_yourself_invalidates_your_token() {
    let app = common::TestApp::new().await;
    let (id, token) = app.logged_in_user().await;

    let response = app.delete(&format!("/api/v1/users/{}", id), Some(&token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.get("/api/v1/users", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = common::TestApp::new().await;

    let response = app
        .request("POST", "/api/v1/users", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.json()["errors"][0].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_with_mistyped_wrapped_body_changes_nothing() {
    let app = common::TestApp::new().await;
    let (id, token) = app.logged_in_user().await;

    for body in [json!({ "user": { "name": 123 } }), json!({ "user": null })] {
        let response = app
            .put(&format!("/api/v1/users/{}", id), body, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.body);
        assert!(response.json()["errors"][0].is_string());
    }

    let response = app.get(&format!("/api/v1/users/{}", id), Some(&token)).await;
    assert_eq!(response.json()["name"], "Test User");
}

#[tokio::test]
async fn test_create_with_mistyped_password_is_bad_request() {
    let app = common::TestApp::new().await;

    let response = app
        .post(
            "/api/v1/users",
            json!({ "user": { "name": "Ana", "email": "ana@x.com", "password": 12345678 } }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn test_multibyte_password_length_counts_characters() {
    let app = common::TestApp::new().await;

    let response = app
        .post(
            "/api/v1/users",
            json!({ "name": "Ana", "email": "ana@x.com", "password": "é".repeat(40) }),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

    app.login("ana@x.com", &"é".repeat(40)).await;
}

#[tokio::test]
async fn test_unparseable_id_and_query_answer_json_errors() {
    let app = common::TestApp::new().await;
    let (_, token) = app.logged_in_user().await;

    for path in ["/api/v1/users/abc", "/api/v1/users?page=-1", "/api/v1/users?per_page=x"] {
        let response = app.get(path, Some(&token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", path);
        assert!(response.json()["errors"][0].is_string(), "{}: {}", path, response.body);
    }
}

#[tokio::test]
async fn test_unparseable_id_still_requires_login() {
    let app = common::TestApp::new().await;

    let response = app.delete("/api/v1/users/abc", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
