/// Project endpoints
///
/// # Endpoints
///
/// - `POST /projects` - Create a project; the caller becomes an owner
/// - `GET /projects` - List projects (admins: all, others: their own)
/// - `GET /projects/:id` - Project with roster and task summary (view)
/// - `PUT /projects/:id` - Partial update (admin or owner)
/// - `DELETE /projects/:id` - Delete with tasks and comments (admin or owner)
/// - `PUT /projects/:id/members` - Replace the member list (admin or owner)
/// - `PUT /projects/:id/owners` - Replace the owner list (admin or owner)

use std::collections::BTreeSet;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taskhub_shared::{
    auth::{authorization::ProjectAction, middleware::Principal},
    models::{
        membership::{ProjectMember, ProjectRole, ProjectRoster},
        project::{CreateProject, Project, UpdateProject},
        task::Task,
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Project as returned by the API: the row plus its roster
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,

    pub owners: BTreeSet<String>,
    pub members: BTreeSet<String>,
}

impl ProjectResponse {
    fn new(project: Project, roster: ProjectRoster) -> Self {
        Self {
            project,
            owners: roster.owners,
            members: roster.members,
        }
    }
}

/// Short form of a task embedded in the project detail
#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub assignee: Option<String>,
}

impl From<Task> for TaskSummary {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            status: task.status,
            priority: task.priority,
            assignee: task.assignee,
        }
    }
}

/// Project detail response
#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,

    pub tasks: Vec<TaskSummary>,
}

/// Create project request
///
/// `owners` and `members` seed the roster; the creator is always added as
/// an owner.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub project: CreateProject,

    #[serde(default)]
    pub owners: Vec<String>,

    #[serde(default)]
    pub members: Vec<String>,
}

/// Replace-members request
#[derive(Debug, Deserialize)]
pub struct MembersRequest {
    pub members: Vec<String>,
}

/// Replace-owners request
#[derive(Debug, Deserialize)]
pub struct OwnersRequest {
    pub owners: Vec<String>,
}

/// Rejects usernames that don't belong to an account
async fn ensure_users_exist(pool: &PgPool, usernames: &[String]) -> ApiResult<()> {
    let missing = User::missing_usernames(pool, usernames).await?;

    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Unknown usernames: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Creates a project
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or a roster name has no account
pub async fn create_project(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    req.validate()?;

    let mut owners = req.owners;
    owners.push(principal.username.clone());

    ensure_users_exist(&state.db, &owners).await?;
    ensure_users_exist(&state.db, &req.members).await?;

    let (project, roster) =
        Project::create_with_roster(&state.db, req.project, &owners, &req.members).await?;

    tracing::info!(
        project_id = %project.id,
        owner = %principal.username,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(ProjectResponse::new(project, roster))))
}

/// Lists projects visible to the caller
///
/// Admins see every project; everyone else sees the projects they own or
/// belong to.
pub async fn list_projects(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = if principal.is_admin() {
        Project::list(&state.db).await?
    } else {
        Project::list_for_user(&state.db, &principal.username).await?
    };

    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let mut rosters = ProjectMember::rosters(&state.db, &ids).await?;

    let response = projects
        .into_iter()
        .map(|project| {
            let roster = rosters.remove(&project.id).unwrap_or_default();
            ProjectResponse::new(project, roster)
        })
        .collect();

    Ok(Json(response))
}

/// Gets a project with its roster and tasks
pub async fn get_project(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetailResponse>> {
    let record = state
        .authorizer()
        .authorize_project(&principal, id, ProjectAction::View)
        .await?;

    let tasks = Task::list_by_project(&state.db, id).await?;

    Ok(Json(ProjectDetailResponse {
        project: ProjectResponse::new(record.project, record.roster),
        tasks: tasks.into_iter().map(TaskSummary::from).collect(),
    }))
}

/// Updates the provided fields of a project
pub async fn update_project(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProject>,
) -> ApiResult<Json<ProjectResponse>> {
    req.validate()?;

    let record = state
        .authorizer()
        .authorize_project(&principal, id, ProjectAction::Edit)
        .await?;

    let project = Project::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProjectResponse::new(project, record.roster)))
}

/// Deletes a project together with its tasks and their comments
pub async fn delete_project(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .authorizer()
        .authorize_project(&principal, id, ProjectAction::Delete)
        .await?;

    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = %id, user_id = %principal.id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn replace_roster(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    role: ProjectRole,
    usernames: Vec<String>,
) -> ApiResult<Json<ProjectResponse>> {
    let record = state
        .authorizer()
        .authorize_project(principal, id, ProjectAction::ManageRoster)
        .await?;

    ensure_users_exist(&state.db, &usernames).await?;

    let roster = ProjectMember::replace(&state.db, id, role, &usernames).await?;

    tracing::info!(
        project_id = %id,
        role = role.as_str(),
        count = usernames.len(),
        "Project roster replaced"
    );

    Ok(Json(ProjectResponse::new(record.project, roster)))
}

/// Replaces the member list of a project
///
/// Applying the same list again is a no-op.
pub async fn update_members(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(req): Json<MembersRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    replace_roster(&state, &principal, id, ProjectRole::Member, req.members).await
}

/// Replaces the owner list of a project
///
/// An empty list leaves the project manageable by admins only.
pub async fn update_owners(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(req): Json<OwnersRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    replace_roster(&state, &principal, id, ProjectRole::Owner, req.owners).await
}
