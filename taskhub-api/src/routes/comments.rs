/// Comment endpoints
///
/// Comments live under `/projects/:id/tasks/:task_id/comments`. Anyone who
/// can read the task can read and add comments.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskhub_shared::{
    auth::{authorization::TaskAction, middleware::Principal},
    models::comment::{Comment, CreateComment},
};
use uuid::Uuid;
use validator::Validate;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}

/// Lists the comments on a task, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    principal: Principal,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Comment>>> {
    state
        .authorizer()
        .authorize_task_in_project(&principal, project_id, task_id, TaskAction::Read)
        .await?;

    let comments = Comment::list_by_task(&state.db, task_id).await?;

    Ok(Json(comments))
}

/// Adds a comment to a task
///
/// The author is always the authenticated user.
pub async fn create_comment(
    State(state): State<AppState>,
    principal: Principal,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;

    state
        .authorizer()
        .authorize_task_in_project(&principal, project_id, task_id, TaskAction::Read)
        .await?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            task_id,
            author: principal.username.clone(),
            content: req.content,
        },
    )
    .await?;

    tracing::info!(
        comment_id = %comment.id,
        task_id = %task_id,
        author = %principal.username,
        "Comment added"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}
