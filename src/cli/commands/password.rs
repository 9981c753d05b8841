use std::io::BufRead;

use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::PasswordHasher;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    #[arg(help = "Password to hash; read from stdin when omitted")]
    pub password: Option<String>,
}

pub async fn handle(args: HashPasswordArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).context("failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let hasher = PasswordHasher::from_config(&config.security)?;
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    output_success(output_format, "Password hashed", Some(json!({ "hash": hash })))
}
