/// User model and database operations
///
/// Users are the principals of TaskHub. A user is referenced from project
/// rosters and task assignments by username, so usernames are unique and
/// renames cascade through the foreign keys on those tables.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{User, CreateUser};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Global role of a user
///
/// Roles are assigned at registration and cannot be changed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user; access is decided by project rosters and assignments
    #[default]
    User,

    /// Administrator; passes every authorization check
    Admin,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes. The hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique login name, also used in project rosters and task assignments
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Global role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// New users always get the `user` role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Creates a new user with the default `user` role
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username or email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, role, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Creates a user with an explicit role
    ///
    /// Not reachable from the HTTP API; used for seeding administrators.
    pub async fn create_with_role(
        pool: &PgPool,
        data: CreateUser,
        role: UserRole,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact, case-sensitive match)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Returns the usernames from `usernames` that have no account
    ///
    /// Used to reject roster updates that reference unknown users before
    /// touching the roster.
    pub async fn missing_usernames(
        pool: &PgPool,
        usernames: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let existing: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT username FROM users
            WHERE username = ANY($1)
            "#,
        )
        .bind(usernames)
        .fetch_all(pool)
        .await?;

        Ok(usernames
            .iter()
            .filter(|name| !existing.contains(name))
            .cloned()
            .collect())
    }

    /// Lists users with pagination, oldest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            ORDER BY created_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Deletes a user by ID
    ///
    /// Roster entries disappear with the user and assigned tasks become
    /// unassigned (foreign key actions).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
