/// Project model and database operations
///
/// A project groups tasks and carries a roster of owners and members (see
/// [`crate::models::membership`]). Deleting a project deletes its roster,
/// its tasks and, through the tasks, their comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::project::{Project, CreateProject};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let project = Project::create(&pool, CreateProject {
///     name: "Website relaunch".to_string(),
///     description: None,
///     status: None,
///     due_date: None,
/// }, "alice").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::deserialize_some;
use super::membership::{ProjectMember, ProjectRole, ProjectRoster};

/// Default status for new projects
pub const DEFAULT_PROJECT_STATUS: &str = "pending";

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Free-form status label (e.g., "pending", "active", "done")
    pub status: String,

    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    /// Defaults to "pending"
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,

    pub due_date: Option<NaiveDate>,
}

/// Input for updating a project
///
/// Only fields that are present are written. For nullable columns,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProject {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl UpdateProject {
    /// Returns true if no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

impl Project {
    /// Creates a project and registers `owner` as its first owner
    ///
    /// # Errors
    ///
    /// Returns an error if `owner` is not an existing username (foreign key
    /// violation) or the database operation fails.
    pub async fn create(
        pool: &PgPool,
        data: CreateProject,
        owner: &str,
    ) -> Result<Self, sqlx::Error> {
        let owners = [owner.to_string()];
        let (project, _) = Self::create_with_roster(pool, data, &owners, &[]).await?;

        Ok(project)
    }

    /// Creates a project together with its initial owners and members
    ///
    /// The project row and every roster entry are written in one
    /// transaction: if any username has no account, nothing is stored.
    pub async fn create_with_roster(
        pool: &PgPool,
        data: CreateProject,
        owners: &[String],
        members: &[String],
    ) -> Result<(Self, ProjectRoster), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, status, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, status, due_date, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.status.unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()))
        .bind(data.due_date)
        .fetch_one(&mut *tx)
        .await?;

        ProjectMember::replace_in(&mut tx, project.id, ProjectRole::Owner, owners).await?;
        let roster =
            ProjectMember::replace_in(&mut tx, project.id, ProjectRole::Member, members).await?;

        tx.commit().await?;

        Ok((project, roster))
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, due_date, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, due_date, created_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists projects where `username` is an owner or a member, newest first
    pub async fn list_for_user(pool: &PgPool, username: &str) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.status, p.due_date, p.created_at
            FROM projects p
            WHERE EXISTS (
                SELECT 1 FROM project_members m
                WHERE m.project_id = p.id AND m.username = $1
            )
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates the provided fields of a project
    ///
    /// Returns the current row unchanged when `data` is empty, and `None`
    /// if the project doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE projects SET ");

        {
            let mut fields = builder.separated(", ");

            if let Some(name) = data.name {
                fields.push("name = ").push_bind_unseparated(name);
            }
            if let Some(description) = data.description {
                fields.push("description = ").push_bind_unseparated(description);
            }
            if let Some(status) = data.status {
                fields.push("status = ").push_bind_unseparated(status);
            }
            if let Some(due_date) = data.due_date {
                fields.push("due_date = ").push_bind_unseparated(due_date);
            }
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, name, description, status, due_date, created_at");

        let project = builder
            .build_query_as::<Project>()
            .fetch_optional(pool)
            .await?;

        Ok(project)
    }

    /// Deletes a project together with its roster, tasks and comments
    ///
    /// Returns false if the project didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_distinguishes_null_from_missing() {
        let update: UpdateProject =
            serde_json::from_str(r#"{"description": null, "status": "active"}"#).unwrap();

        assert_eq!(update.description, Some(None));
        assert_eq!(update.status.as_deref(), Some("active"));
        assert!(update.name.is_none());
        assert!(update.due_date.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_project_empty_body() {
        let update: UpdateProject = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_project_parses_due_date() {
        let update: UpdateProject =
            serde_json::from_str(r#"{"due_date": "2025-07-01"}"#).unwrap();
        assert_eq!(
            update.due_date,
            Some(Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()))
        );
    }

    #[test]
    fn test_project_name_required() {
        let project = CreateProject {
            name: String::new(),
            description: None,
            status: None,
            due_date: None,
        };
        assert!(project.validate().is_err());

        let update: UpdateProject = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(update.validate().is_err());
    }
}
