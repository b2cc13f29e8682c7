//! Admin user repository (admin database).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use seedling_core::{AdminUserId, Email};

use super::RepositoryError;
use crate::models::admin_user::AdminUser;

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_admin(self) -> Result<AdminUser, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(AdminUser {
            id: AdminUserId::new(self.id),
            email,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an admin user with a pre-hashed password (CLI path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row: AdminUserRow = sqlx::query_as(
            r"
            INSERT INTO admin_users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, created_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_admin()
    }

    /// Get an admin user and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            email: String,
            name: String,
            password_hash: String,
            created_at: DateTime<Utc>,
        }

        let row: Option<Row> = sqlx::query_as(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM admin_users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let hash = row.password_hash.clone();
                let admin = AdminUserRow {
                    id: row.id,
                    email: row.email,
                    name: row.name,
                    created_at: row.created_at,
                }
                .into_admin()?;
                Ok(Some((admin, hash)))
            }
            None => Ok(None),
        }
    }
}
