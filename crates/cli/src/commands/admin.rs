//! Admin user management commands.

use std::io::{BufRead, Write};

use sqlx::PgPool;
use thiserror::Error;

use seedling_admin::db::AdminUserRepository;
use seedling_admin::services::auth::{AdminAuthError, hash_password};
use seedling_core::{Email, EmailError};

/// Errors from admin management commands.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] AdminAuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] seedling_admin::db::RepositoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create an admin user, reading the password from stdin.
///
/// # Errors
///
/// Returns an error for invalid input or database failures.
pub async fn create_user(email: &str, name: &str) -> Result<(), AdminCommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| AdminCommandError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    let email = Email::parse(email)?;
    let password = prompt_password()?;
    let password_hash = hash_password(&password)?;

    let pool = PgPool::connect(&database_url).await?;
    let admin = AdminUserRepository::new(&pool)
        .create(&email, name, &password_hash)
        .await?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, "admin user created");
    Ok(())
}

/// Read the password from stdin (piped or typed).
#[allow(clippy::print_stderr)]
fn prompt_password() -> Result<String, std::io::Error> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_owned())
}
