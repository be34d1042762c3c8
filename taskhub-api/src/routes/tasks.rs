/// Task endpoints
///
/// Tasks are reachable both at the top level (`/tasks`) and nested under
/// their project (`/projects/:id/tasks`). The nested forms additionally
/// require the task to belong to the project in the path.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use taskhub_shared::{
    auth::{
        authorization::{ProjectAction, TaskAction},
        middleware::Principal,
    },
    models::task::{CreateTask, Task, TaskFilter, TaskWithCommentCount, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Creates a task
///
/// `project_id` in the body selects the project; without one the task is
/// created outside any project, which only admins may do.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or the assignee doesn't exist
/// - `403 Forbidden`: Caller may not add tasks to the project
/// - `404 Not Found`: Project doesn't exist
pub async fn create_task(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    state
        .authorizer()
        .authorize_task_creation(&principal, req.project_id)
        .await?;

    let task = Task::create(&state.db, req, Some(principal.id)).await?;

    tracing::info!(
        task_id = %task.id,
        project_id = ?task.project_id,
        created_by = %principal.id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists the tasks the caller can read, optionally filtered by `status` and
/// `assignee`
pub async fn list_tasks(
    State(state): State<AppState>,
    principal: Principal,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db, &filter).await?;
    let visible = state.authorizer().visible_tasks(&principal, tasks).await?;

    Ok(Json(visible))
}

pub async fn get_task(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let record = state
        .authorizer()
        .authorize_task(&principal, id, TaskAction::Read)
        .await?;

    Ok(Json(record.task))
}

/// Updates the provided fields of a task
///
/// Allowed for admins, project owners and the task's assignee.
pub async fn update_task(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    req.validate_update()?;

    state
        .authorizer()
        .authorize_task(&principal, id, TaskAction::Update)
        .await?;

    apply_update(&state, id, req).await
}

/// Deletes a task and its comments
pub async fn delete_task(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .authorizer()
        .authorize_task(&principal, id, TaskAction::Delete)
        .await?;

    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, user_id = %principal.id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the tasks of a project
pub async fn list_project_tasks(
    State(state): State<AppState>,
    principal: Principal,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    state
        .authorizer()
        .authorize_project(&principal, project_id, ProjectAction::View)
        .await?;

    let tasks = Task::list_by_project(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// Creates a task in the project named by the path
///
/// A `project_id` in the body is ignored.
pub async fn create_project_task(
    State(state): State<AppState>,
    principal: Principal,
    Path(project_id): Path<Uuid>,
    Json(mut req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    req.project_id = Some(project_id);

    state
        .authorizer()
        .authorize_project(&principal, project_id, ProjectAction::CreateTask)
        .await?;

    let task = Task::create(&state.db, req, Some(principal.id)).await?;

    tracing::info!(
        task_id = %task.id,
        project_id = %project_id,
        created_by = %principal.id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists the tasks of a project, each with its number of comments
pub async fn list_tasks_with_comment_count(
    State(state): State<AppState>,
    principal: Principal,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithCommentCount>>> {
    state
        .authorizer()
        .authorize_project(&principal, project_id, ProjectAction::View)
        .await?;

    let tasks = Task::list_with_comment_counts(&state.db, project_id).await?;

    Ok(Json(tasks))
}

pub async fn get_project_task(
    State(state): State<AppState>,
    principal: Principal,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Task>> {
    let record = state
        .authorizer()
        .authorize_task_in_project(&principal, project_id, task_id, TaskAction::Read)
        .await?;

    Ok(Json(record.task))
}

pub async fn update_project_task(
    State(state): State<AppState>,
    principal: Principal,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    req.validate_update()?;

    state
        .authorizer()
        .authorize_task_in_project(&principal, project_id, task_id, TaskAction::Update)
        .await?;

    apply_update(&state, task_id, req).await
}

async fn apply_update(state: &AppState, id: Uuid, req: UpdateTask) -> ApiResult<Json<Task>> {
    let task = Task::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(task_id = %id, "Task updated");

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query_string() {
        let Query(filter): Query<TaskFilter> =
            Query::try_from_uri(&"/tasks?status=pending&assignee=bob".parse().unwrap()).unwrap();

        assert_eq!(filter.status.as_deref(), Some("pending"));
        assert_eq!(filter.assignee.as_deref(), Some("bob"));

        let Query(filter): Query<TaskFilter> =
            Query::try_from_uri(&"/tasks".parse().unwrap()).unwrap();
        assert!(filter.status.is_none());
        assert!(filter.assignee.is_none());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let req: UpdateTask = serde_json::from_str(r#"{"assignee": null}"#).unwrap();
        assert_eq!(req.assignee, Some(None));
        assert!(req.title.is_none());

        let req: UpdateTask = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert!(req.assignee.is_none());
        assert_eq!(req.status.as_deref(), Some("done"));
    }

    #[test]
    fn test_create_requires_title() {
        let req: CreateTask = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateTask =
            serde_json::from_str(r#"{"title": "T1", "assignee": "bob"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.project_id.is_none());
    }
}
