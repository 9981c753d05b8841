mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{expect_error, TestServer, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn login_returns_bearer_token() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 86400);
    assert!(body["data"]["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<()> {
    let server = TestServer::start().await?;

    let mut messages = Vec::new();
    for (email, password) in [(ADMIN_EMAIL, "not-the-password"), ("ghost@example.com", ADMIN_PASSWORD)] {
        let res = server
            .client
            .post(server.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body = expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;
        messages.push(body["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);
    assert_eq!(messages[0], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn login_with_malformed_body_is_bad_request() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await?;
    expect_error(res, StatusCode::BAD_REQUEST, "INVALID_JSON").await?;
    Ok(())
}

#[tokio::test]
async fn register_creates_user_role_without_hash() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({ "name": "Jane", "email": "Jane@Example.com", "password": "jane-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    let user = &body["data"];
    assert_eq!(user["role"], "USER");
    assert_eq!(user["email"], "jane@example.com");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn register_duplicate_email_conflicts() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({ "name": "Copy", "email": ADMIN_EMAIL, "password": "whatever-password" }))
        .send()
        .await?;
    expect_error(res, StatusCode::CONFLICT, "CONFLICT").await?;
    Ok(())
}

#[tokio::test]
async fn register_validates_fields() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({ "name": "", "email": "not-an-email", "password": "short" }))
        .send()
        .await?;
    let body = expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
    for field in ["name", "email", "password"] {
        assert!(body["field_errors"][field].is_string(), "missing {} in {}", field, body);
    }
    Ok(())
}

#[tokio::test]
async fn register_rejects_malformed_emails() -> Result<()> {
    let server = TestServer::start().await?;

    for email in [
        "jane@example..com",
        "jane@-example.com",
        "jane.@example.com",
        ".jane@example.com",
        "ja\"ne@example.com",
    ] {
        let res = server
            .client
            .post(server.url("/api/v1/auth/register"))
            .json(&json!({ "name": "Jane", "email": email, "password": "jane-password" }))
            .send()
            .await?;
        let body = expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
        assert!(body["field_errors"]["email"].is_string(), "{} -> {}", email, body);
    }
    Ok(())
}

#[tokio::test]
async fn login_with_malformed_email_is_validation_error() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": "not-an-email", "password": "" }))
        .send()
        .await?;
    let body = expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user_token("lower@example.com").await?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .header("authorization", format!("bearer {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn me_returns_current_user() -> Result<()> {
    let server = TestServer::start().await?;
    let (id, token) = server.user_token("me@example.com").await?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["email"], "me@example.com");
    Ok(())
}

#[tokio::test]
async fn me_rejects_missing_and_garbage_tokens() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.client.get(server.url("/api/v1/auth/me")).send().await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .bearer_auth("definitely.not.valid")
        .send()
        .await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .header("authorization", "Basic YWRtaW46YWRtaW4=")
        .send()
        .await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let mut other = common::test_config().security;
    other.jwt_secret = "some-other-secret".to_string();
    let foreign = catalog_api::auth::TokenService::new(&other)?;
    let principal = catalog_api::auth::Principal {
        id: 1,
        email: ADMIN_EMAIL.to_string(),
        role: catalog_api::auth::Role::Admin,
    };
    let token = foreign.issue(&principal)?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .bearer_auth(&token.access_token)
        .send()
        .await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;
    Ok(())
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (id, token) = server.user_token("leaving@example.com").await?;

    let res = server
        .client
        .delete(server.url(&format!("/api/v1/users/{}", id)))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;
    Ok(())
}

#[tokio::test]
async fn role_comes_from_store_not_token() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (id, token) = server.user_token("promoted@example.com").await?;

    // Promote after the token was issued; the USER token now acts as ADMIN.
    let res = server
        .client
        .patch(server.url(&format!("/api/v1/users/{}", id)))
        .bearer_auth(&admin)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let product = json!({ "name": "Lamp", "description": "Desk lamp", "price": 20.0, "category": "Home" });
    server.create_product(&token, product).await?;
    Ok(())
}
