use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::admin::create_admin;
use crate::app::{default_policy, serve};
use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Listen port (overrides APP_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep all data in process memory instead of PostgreSQL")]
    pub memory: bool,

    #[arg(long, env = "ADMIN_EMAIL", requires = "admin_password", help = "Seed an ADMIN account on startup")]
    pub admin_email: Option<String>,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, requires = "admin_email")]
    pub admin_password: Option<String>,
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let port = args.port.unwrap_or(config.server.port);

    let state = if args.memory {
        warn!("Using in-memory storage; data is lost on exit");
        AppState::in_memory(config, default_policy())?
    } else {
        AppState::connect(config, default_policy()).await?
    };

    if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) {
        match create_admin(&state, "Administrator", email, password).await? {
            Some(admin) => info!("Seeded admin account {}", admin.id),
            None => info!("Admin account {} already exists", email),
        }
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    serve(listener, state).await
}
