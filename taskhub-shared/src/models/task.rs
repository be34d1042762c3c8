/// Task model and database operations
///
/// Tasks usually belong to a project; a task without a project is only
/// visible to administrators. Deleting a task deletes its comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     priority VARCHAR(50) NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     assignee VARCHAR(50) REFERENCES users(username)
///         ON UPDATE CASCADE ON DELETE SET NULL,
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::task::{Task, CreateTask, TaskFilter};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: None,
///     status: None,
///     priority: Some("high".to_string()),
///     due_date: None,
///     assignee: Some("bob".to_string()),
///     project_id: Some(project_id),
/// }, Some(user_id)).await?;
///
/// let bobs = Task::list(&pool, &TaskFilter {
///     assignee: Some("bob".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::deserialize_some;

/// Longest username an assignee can name (`users.username` is VARCHAR(50))
pub const ASSIGNEE_MAX_LEN: usize = 50;

/// Default status for new tasks
pub const DEFAULT_TASK_STATUS: &str = "pending";

/// Default priority for new tasks
pub const DEFAULT_TASK_PRIORITY: &str = "medium";

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, assignee, \
                            project_id, created_by, created_at, updated_at";

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,

    /// Free-form status label (e.g., "pending", "in_progress", "done")
    pub status: String,

    /// Free-form priority label (e.g., "low", "medium", "high")
    pub priority: String,

    pub due_date: Option<NaiveDate>,

    /// Username of the assigned user
    pub assignee: Option<String>,

    /// Owning project (None for tasks created outside a project)
    pub project_id: Option<Uuid>,

    /// User who created the task (None if that user was deleted)
    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// True if the task is assigned to `username` (exact match)
    pub fn is_assigned_to(&self, username: &str) -> bool {
        self.assignee.as_deref() == Some(username)
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// Defaults to "pending"
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,

    /// Defaults to "medium"
    #[validate(length(min = 1, max = 50, message = "Priority must be 1-50 characters"))]
    pub priority: Option<String>,

    pub due_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 50, message = "Assignee must be 1-50 characters"))]
    pub assignee: Option<String>,

    pub project_id: Option<Uuid>,
}

/// Input for updating a task
///
/// Only fields that are present are written. For nullable columns,
/// `Some(None)` clears the value. The owning project cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Status must be 1-50 characters"))]
    pub status: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Priority must be 1-50 characters"))]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignee: Option<Option<String>>,
}

impl UpdateTask {
    /// Runs the field validators and checks a newly set assignee
    ///
    /// `assignee` is doubly optional, which the derived validators skip, so
    /// its length is checked here. Clearing it (`null`) is always valid.
    pub fn validate_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(Some(assignee)) = &self.assignee {
            let len = assignee.chars().count();
            if len == 0 || len > ASSIGNEE_MAX_LEN {
                let mut error = ValidationError::new("length");
                error.message = Some(Cow::from("Assignee must be 1-50 characters"));
                errors.add("assignee", error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Optional filters for listing tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub assignee: Option<String>,
}

/// Task together with the number of comments on it
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskWithCommentCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,

    pub comment_count: i64,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the project or the assignee
    /// doesn't exist.
    pub async fn create(
        pool: &PgPool,
        data: CreateTask,
        created_by: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date, assignee, \
                                project_id, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status.unwrap_or_else(|| DEFAULT_TASK_STATUS.to_string()))
            .bind(data.priority.unwrap_or_else(|| DEFAULT_TASK_PRIORITY.to_string()))
            .bind(data.due_date)
            .bind(data.assignee)
            .bind(data.project_id)
            .bind(created_by)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists all tasks matching `filter`, oldest first
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM tasks WHERE TRUE", TASK_COLUMNS));

        if let Some(ref status) = filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(ref assignee) = filter.assignee {
            builder.push(" AND assignee = ").push_bind(assignee.clone());
        }
        builder.push(" ORDER BY created_at ASC");

        let tasks = builder.build_query_as::<Task>().fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Lists the tasks of one project, oldest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY created_at ASC",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Lists the tasks of one project with their comment counts
    pub async fn list_with_comment_counts(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithCommentCount>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithCommentCount>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date,
                   t.assignee, t.project_id, t.created_by, t.created_at, t.updated_at,
                   COUNT(c.id) AS comment_count
            FROM tasks t
            LEFT JOIN comments c ON c.task_id = t.id
            WHERE t.project_id = $1
            GROUP BY t.id
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates the provided fields of a task and bumps `updated_at`
    ///
    /// Returns `None` if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = data.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = data.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            builder.push(", status = ").push_bind(status);
        }
        if let Some(priority) = data.priority {
            builder.push(", priority = ").push_bind(priority);
        }
        if let Some(due_date) = data.due_date {
            builder.push(", due_date = ").push_bind(due_date);
        }
        if let Some(assignee) = data.assignee {
            builder.push(", assignee = ").push_bind(assignee);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let task = builder.build_query_as::<Task>().fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task and its comments
    ///
    /// Returns false if the task didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
