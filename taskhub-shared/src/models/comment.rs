/// Comment model and database operations
///
/// Comments belong to exactly one task and are deleted with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     content TEXT NOT NULL,
///     author VARCHAR(50) NOT NULL,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,

    /// Username of the comment author
    pub author: String,

    pub task_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub task_id: Uuid,
    pub author: String,
    pub content: String,
}

impl Comment {
    /// Adds a comment to a task
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, author, content)
            VALUES ($1, $2, $3)
            RETURNING id, content, author, task_id, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.author)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists the comments of a task, oldest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, author, task_id, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Counts the comments of a task
    pub async fn count_by_task(pool: &PgPool, task_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
