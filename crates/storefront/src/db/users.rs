//! User and address repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use seedling_core::{AddressId, Email, UserId};

use super::RepositoryError;
use crate::models::user::{Address, User};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(User {
            id: UserId::new(self.id),
            email,
            display_name: self.display_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    name: String,
    street: String,
    postal_code: String,
    city: String,
    country: String,
    created_at: DateTime<Utc>,
}

impl AddressRow {
    fn into_address(self) -> Address {
        Address {
            id: AddressId::new(self.id),
            user_id: UserId::new(self.user_id),
            name: self.name,
            street: self.street,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
            created_at: self.created_at,
        }
    }
}

/// Fields for creating or updating an address.
pub struct NewAddress<'a> {
    pub name: &'a str,
    pub street: &'a str,
    pub postal_code: &'a str,
    pub city: &'a str,
    pub country: &'a str,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, display_name, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, display_name, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with email and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, display_name, created_at, updated_at
            ",
        )
        .bind(email.as_str())
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

        row.into_user()
    }

    /// Get a user and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            email: String,
            display_name: Option<String>,
            password_hash: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let row: Option<Row> = sqlx::query_as(
            r"
            SELECT id, email, display_name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let hash = row.password_hash.clone();
                let user = UserRow {
                    id: row.id,
                    email: row.email,
                    display_name: row.display_name,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }
                .into_user()?;
                Ok(Some((user, hash)))
            }
            None => Ok(None),
        }
    }

    /// Update the display name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_display_name(
        &self,
        id: UserId,
        display_name: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            UPDATE users
            SET display_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, display_name, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(display_name)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// List a user's addresses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_addresses(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            r"
            SELECT id, user_id, name, street, postal_code, city, country, created_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AddressRow::into_address).collect())
    }

    /// Create an address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_address(
        &self,
        user_id: UserId,
        address: &NewAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let row: AddressRow = sqlx::query_as(
            r"
            INSERT INTO addresses (user_id, name, street, postal_code, city, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, street, postal_code, city, country, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(address.name)
        .bind(address.street)
        .bind(address.postal_code)
        .bind(address.city)
        .bind(address.country)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_address())
    }

    /// Update an address. The `user_id` guard keeps one user from editing
    /// another's address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to the user.
    pub async fn update_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
        address: &NewAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let row: Option<AddressRow> = sqlx::query_as(
            r"
            UPDATE addresses
            SET name = $3, street = $4, postal_code = $5, city = $6, country = $7
            WHERE id = $2 AND user_id = $1
            RETURNING id, user_id, name, street, postal_code, city, country, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(address_id.as_i32())
        .bind(address.name)
        .bind(address.street)
        .bind(address.postal_code)
        .bind(address.city)
        .bind(address.country)
        .fetch_optional(self.pool)
        .await?;

        row.map(AddressRow::into_address)
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an address belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to the user.
    pub async fn delete_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $2 AND user_id = $1")
            .bind(user_id.as_i32())
            .bind(address_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
