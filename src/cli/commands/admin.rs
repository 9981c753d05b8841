use anyhow::bail;
use validator::Validate;
use clap::Args;
use serde_json::json;
use tracing::info;

use crate::app::default_policy;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::UserProfile;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::users::CreateUserRequest;
use crate::handlers::validate::Normalize;
use crate::services::ServiceError;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    #[arg(long, default_value = "Administrator", help = "Display name")]
    pub name: String,

    #[arg(long, env = "ADMIN_EMAIL", help = "Login email")]
    pub email: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, help = "Login password")]
    pub password: String,
}

pub async fn handle(args: CreateAdminArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = AppState::connect(config, default_policy()).await?;

    let Some(user) = create_admin(&state, &args.name, &args.email, &args.password).await? else {
        bail!("an account with email {} already exists", args.email.trim().to_lowercase());
    };

    output_success(
        output_format,
        "Admin account created",
        Some(json!({ "id": user.id, "email": user.email, "role": user.role })),
    )
}

/// Create an ADMIN account. `Ok(None)` when the email is already taken.
pub async fn create_admin(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<UserProfile>> {
    let mut request = CreateUserRequest {
        role: "ADMIN".to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    request.normalize();
    if let Err(errors) = request.validate() {
        let mut problems: Vec<String> = match ApiError::from(errors) {
            ApiError::ValidationError {
                field_errors: Some(errors),
                ..
            } => errors.into_iter().map(|(field, problem)| format!("{} {}", field, problem)).collect(),
            other => vec![other.to_string()],
        };
        problems.sort();
        bail!("invalid admin account: {}", problems.join(", "));
    }
    let input = request.into_input()?;

    match state.users.create(input).await {
        Ok(user) => {
            info!("Created admin account {}", user.id);
            Ok(Some(user.into()))
        }
        Err(ServiceError::Database(DatabaseError::Conflict(_))) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
