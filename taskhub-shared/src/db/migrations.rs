/// Embedded database migrations
///
/// The SQL files under `migrations/` are compiled into the binary. Each
/// migration is reversible: `{version}_{name}.up.sql` creates and
/// `{version}_{name}.down.sql` drops.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::migrations::{get_migration_status, run_migrations};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
///
/// let status = get_migration_status(&pool).await?;
/// assert!(status.is_up_to_date);
/// # Ok(())
/// # }
/// ```

use sqlx::{
    migrate::{MigrateDatabase, MigrateError, Migrator},
    postgres::PgPool,
    Postgres,
};
use tracing::{debug, error, info, warn};

/// Migrations shipped with this crate
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied migrations compared to the embedded set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,
    pub known_migrations: usize,

    /// Highest applied version
    pub latest_version: Option<i64>,

    pub is_up_to_date: bool,
}

/// Number of forward migrations embedded in the binary
pub fn known_migrations() -> usize {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .count()
}

/// Applies all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(known = known_migrations(), "Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}

/// Reverts every applied migration
///
/// Only meant for tests and local development.
pub async fn revert_all(pool: &PgPool) -> Result<(), MigrateError> {
    warn!("Reverting all database migrations");
    MIGRATOR.undo(pool, 0).await
}

/// Reads which migrations have been applied
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let known = known_migrations();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            known_migrations: known,
            latest_version: None,
            is_up_to_date: known == 0,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    let applied = count as usize;
    Ok(MigrationStatus {
        applied_migrations: applied,
        known_migrations: known,
        latest_version,
        is_up_to_date: applied >= known,
    })
}

/// Creates the database named in `database_url` if it is missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Creating database");
    Postgres::create_database(database_url).await
}

/// Drops the database named in `database_url`, deleting all data
///
/// Only meant for tests and local development.
pub async fn drop_database(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    warn!("Dropping database");
    Postgres::drop_database(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_reversible() {
        assert_eq!(known_migrations(), 3);
        assert!(MIGRATOR.iter().all(|m| m.migration_type.is_reversible()));
    }

    #[test]
    fn test_embedded_migration_versions_are_ordered() {
        let versions: Vec<i64> = MIGRATOR
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
            .map(|m| m.version)
            .collect();

        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted);
    }
}
