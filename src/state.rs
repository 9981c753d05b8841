use std::sync::Arc;

use anyhow::Context;

use crate::auth::{PasswordHasher, RoutePolicy, TokenService};
use crate::config::AppConfig;
use crate::database::{
    DatabaseManager, MemoryProductRepository, MemoryUserRepository, PgProductRepository, PgUserRepository,
    ProductRepository, UserRepository,
};
use crate::services::{AuthService, ProductService, UserService};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub policy: Arc<RoutePolicy>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    /// `None` when running on the in-memory store.
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        policy: RoutePolicy,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        database: Option<DatabaseManager>,
    ) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::from_config(&config.security).context("invalid password hashing parameters")?;
        let tokens = Arc::new(TokenService::new(&config.security).context("cannot sign tokens")?);

        Ok(Self {
            auth: Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens)),
            users: Arc::new(UserService::new(users, hasher)),
            products: Arc::new(ProductService::new(products)),
            policy: Arc::new(policy),
            config: Arc::new(config),
            database,
        })
    }

    /// State backed by PostgreSQL. Creates missing tables.
    pub async fn connect(config: AppConfig, policy: RoutePolicy) -> anyhow::Result<Self> {
        let database = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        database.ensure_schema().await.context("failed to prepare schema")?;

        let users = Arc::new(PgUserRepository::new(database.pool().clone()));
        let products = Arc::new(PgProductRepository::new(database.pool().clone()));
        Self::new(config, policy, users, products, Some(database))
    }

    /// State backed by process-local storage; nothing survives a restart.
    pub fn in_memory(config: AppConfig, policy: RoutePolicy) -> anyhow::Result<Self> {
        Self::new(
            config,
            policy,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryProductRepository::new()),
            None,
        )
    }
}
