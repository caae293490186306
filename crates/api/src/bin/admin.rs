//! Administrative command-line tool.
//!
//! **Usage:**
//! ```bash
//! yamdb-admin create-superuser --username root --email root@example.com
//! yamdb-admin issue-code --username reader
//! ```
//!
//! Both commands apply pending migrations first and print a fresh
//! confirmation code, which the user exchanges at `POST /v1/auth/token`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use validator::Validate;
use yamdb_api::config::ConfirmationConfig;
use yamdb_core::roles::Role;
use yamdb_db::models::user::{NewUser, SignupRequest, User};
use yamdb_db::repositories::UserRepo;
use yamdb_db::DbPool;

/// YaMDb administration
#[derive(Parser, Debug)]
#[command(name = "yamdb-admin")]
#[command(about = "Administrative tasks for the YaMDb API")]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an admin superuser, or promote an existing user
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Print a new confirmation code for an existing user
    IssueCode {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();
    let confirmation = ConfirmationConfig::from_env(&jwt_secret);
    if confirmation.secret.is_empty() {
        bail!("CONFIRMATION_SECRET or JWT_SECRET must be set");
    }

    let pool = yamdb_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    yamdb_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let user = match cli.command {
        Command::CreateSuperuser { username, email } => {
            create_superuser(&pool, username, email).await?
        }
        Command::IssueCode { username } => UserRepo::find_by_username(&pool, &username)
            .await?
            .with_context(|| format!("No user named '{username}'"))?,
    };

    let code = confirmation
        .signer()
        .make_code(&user.code_subject(), chrono::Utc::now().timestamp());

    println!("username:          {}", user.username);
    println!("role:              {}", user.role);
    println!("confirmation_code: {code}");
    Ok(())
}

async fn create_superuser(pool: &DbPool, username: String, email: String) -> anyhow::Result<User> {
    let request = SignupRequest { username, email };
    if let Err(errors) = request.validate() {
        bail!("Invalid input: {errors}");
    }

    if let Some(existing) = UserRepo::find_by_username(pool, &request.username).await? {
        if existing.email != request.email {
            bail!(
                "User '{}' exists with a different email ({})",
                existing.username,
                existing.email
            );
        }
        let promoted = UserRepo::promote_to_superuser(pool, existing.id)
            .await?
            .context("User disappeared during promotion")?;
        tracing::info!(user_id = promoted.id, "Existing user promoted to superuser");
        return Ok(promoted);
    }

    let new_user = NewUser {
        role: Role::Admin,
        is_superuser: true,
        ..NewUser::signup(&request.username, &request.email)
    };
    let user = UserRepo::create(pool, &new_user)
        .await
        .context("Failed to create superuser")?;
    tracing::info!(user_id = user.id, "Superuser created");
    Ok(user)
}
