pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Catalog API - product catalog service with role-based access control")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create missing database tables and exit")]
    Migrate,

    #[command(about = "Create an ADMIN account")]
    CreateAdmin(commands::admin::CreateAdminArgs),

    #[command(about = "Print the Argon2id hash of a password")]
    HashPassword(commands::password::HashPasswordArgs),
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env()?;
    tracing::info!("Loaded {:?} configuration", config.environment);

    match cli.command {
        Commands::Serve(args) => commands::serve::handle(args, config).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::CreateAdmin(args) => commands::admin::handle(args, config, output_format).await,
        Commands::HashPassword(args) => commands::password::handle(args, config, output_format).await,
    }
}
