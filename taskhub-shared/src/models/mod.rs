/// Database models for TaskHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and global roles
/// - `project`: Projects
/// - `membership`: Project rosters (owners and members)
/// - `task`: Tasks, optionally attached to a project
/// - `comment`: Comments on tasks
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
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod comment;
pub mod membership;
pub mod project;
pub mod task;
pub mod user;

/// Deserializes a present field (including `null`) as `Some`
///
/// Combined with `#[serde(default)]` on an `Option<Option<T>>` field this
/// tells a missing field (`None`) apart from an explicit `null`
/// (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
