#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use catalog_api::app::{default_policy, router};
use catalog_api::auth::Role;
use catalog_api::config::AppConfig;
use catalog_api::services::CreateUser;
use catalog_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// In-process server on a free port, backed by in-memory storage.
///
/// Each test gets its own server so state never leaks between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = "integration-test-secret".to_string();
    // Cheap hashing keeps the suite fast.
    config.security.password_hash_memory_kib = 8;
    config.security.password_hash_iterations = 1;
    config
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // RUST_LOG=debug cargo test shows server logs under the failing test.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::in_memory(test_config(), default_policy())?;
        state
            .users
            .create(CreateUser {
                name: "Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: Role::Admin,
                password: ADMIN_PASSWORD.to_string(),
            })
            .await?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            state,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["data"]["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response missing access_token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register a USER account and return its id and token.
    pub async fn user_token(&self, email: &str) -> Result<(i64, String)> {
        let res = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "name": "Regular", "email": email, "password": "user-password" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let body = res.json::<Value>().await?;
        let id = body["data"]["id"].as_i64().context("register response missing id")?;
        Ok((id, self.login(email, "user-password").await?))
    }

    pub async fn create_product(&self, token: &str, product: Value) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/v1/products"))
            .bearer_auth(token)
            .json(&product)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }
}

/// Assert the error envelope shape and return it.
pub async fn expect_error(res: reqwest::Response, status: StatusCode, code: &str) -> Result<Value> {
    assert_eq!(res.status(), status);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false, "body: {}", body);
    assert_eq!(body["code"], code, "body: {}", body);
    assert!(body["message"].is_string(), "body: {}", body);
    Ok(body)
}
