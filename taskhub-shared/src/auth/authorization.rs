/// Authorization engine for projects and tasks
///
/// Every endpoint that touches a project or a task goes through the
/// [`Authorizer`]. It loads the current state of the resource through a
/// [`ResourceLookup`], evaluates the policy for the requested action and
/// either returns the loaded record or a specific denial.
///
/// # Permission Model
///
/// Administrators may do anything. Everyone else is judged by the project
/// roster (owners and members) and, for tasks, by the assignee:
///
/// | Action                  | Allowed for                          |
/// |-------------------------|--------------------------------------|
/// | Project view            | owner, member                        |
/// | Project edit / delete   | owner                                |
/// | Project roster changes  | owner                                |
/// | Create task in project  | owner, member                        |
/// | Task read               | owner, member, assignee              |
/// | Task update             | owner, assignee                      |
/// | Task delete             | owner                                |
///
/// A task without a project (or whose project no longer exists) is
/// invisible to non-admins: lookups fail with `NotFound` and list
/// filtering drops it.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::auth::authorization::{Authorizer, ProjectAction};
/// use taskhub_shared::auth::middleware::Principal;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, principal: Principal, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let authorizer = Authorizer::from_pool(pool);
///
/// let record = authorizer
///     .authorize_project(&principal, project_id, ProjectAction::Edit)
///     .await?;
/// println!("{} may edit {}", principal.username, record.project.name);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::Principal;
use crate::models::membership::{ProjectMember, ProjectRoster};
use crate::models::project::Project;
use crate::models::task::Task;

/// Kind of resource a denial refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Project(Uuid),
    Task(Uuid),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Project(_) => write!(f, "Project"),
            Resource::Task(_) => write!(f, "Task"),
        }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Resource (or the project a task requires) doesn't exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// Policy denied the action
    #[error("{0}")]
    Forbidden(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Actions on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    View,
    Edit,
    Delete,

    /// Replace the owners or members list
    ManageRoster,

    /// Create a task under the project
    CreateTask,
}

impl ProjectAction {
    fn describe(&self) -> &'static str {
        match self {
            ProjectAction::View => "view this project",
            ProjectAction::Edit => "edit this project",
            ProjectAction::Delete => "delete this project",
            ProjectAction::ManageRoster => "change this project's owners or members",
            ProjectAction::CreateTask => "create tasks in this project",
        }
    }
}

/// Actions on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Read a single task (also used to filter task lists)
    Read,
    Update,
    Delete,
}

impl TaskAction {
    fn describe(&self) -> &'static str {
        match self {
            TaskAction::Read => "view this task",
            TaskAction::Update => "update this task",
            TaskAction::Delete => "delete this task",
        }
    }
}

/// Evaluates a project action against a roster
pub fn project_allows(principal: &Principal, roster: &ProjectRoster, action: ProjectAction) -> bool {
    if principal.is_admin() {
        return true;
    }

    let username = principal.username.as_str();
    match action {
        ProjectAction::View | ProjectAction::CreateTask => roster.is_participant(username),
        ProjectAction::Edit | ProjectAction::Delete | ProjectAction::ManageRoster => {
            roster.is_owner(username)
        }
    }
}

/// Evaluates a task action
///
/// `roster` is the roster of the task's project, or `None` if the task has
/// no (existing) project, in which case only admins are allowed.
pub fn task_allows(
    principal: &Principal,
    task: &Task,
    roster: Option<&ProjectRoster>,
    action: TaskAction,
) -> bool {
    if principal.is_admin() {
        return true;
    }

    let Some(roster) = roster else {
        return false;
    };

    let username = principal.username.as_str();
    match action {
        TaskAction::Read => roster.is_participant(username) || task.is_assigned_to(username),
        TaskAction::Update => roster.is_owner(username) || task.is_assigned_to(username),
        TaskAction::Delete => roster.is_owner(username),
    }
}

/// A project together with its roster
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub project: Project,
    pub roster: ProjectRoster,
}

/// A task together with its project, if it has one
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: Task,
    pub project: Option<ProjectRecord>,
}

/// Source of current project and task state
///
/// Implementations must not cache: every call observes the latest
/// committed rows.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Loads a project and its roster
    async fn project(&self, id: Uuid) -> Result<Option<ProjectRecord>, sqlx::Error>;

    /// Loads a task
    async fn task(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error>;
}

/// PostgreSQL-backed resource lookup
#[derive(Debug, Clone)]
pub struct PgResourceLookup {
    pool: PgPool,
}

impl PgResourceLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceLookup for PgResourceLookup {
    async fn project(&self, id: Uuid) -> Result<Option<ProjectRecord>, sqlx::Error> {
        let Some(project) = Project::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let roster = ProjectMember::roster(&self.pool, id).await?;

        Ok(Some(ProjectRecord { project, roster }))
    }

    async fn task(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        Task::find_by_id(&self.pool, id).await
    }
}

/// Authorization engine
#[derive(Debug, Clone)]
pub struct Authorizer<L = PgResourceLookup> {
    lookup: L,
}

impl Authorizer<PgResourceLookup> {
    /// Creates an authorizer reading from PostgreSQL
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(PgResourceLookup::new(pool))
    }
}

impl<L: ResourceLookup> Authorizer<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Loads a project and checks `action` on it
    ///
    /// # Errors
    ///
    /// - `AuthzError::NotFound` if the project doesn't exist
    /// - `AuthzError::Forbidden` if the policy denies the action
    pub async fn authorize_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        action: ProjectAction,
    ) -> Result<ProjectRecord, AuthzError> {
        let record = self
            .lookup
            .project(project_id)
            .await?
            .ok_or(AuthzError::NotFound(Resource::Project(project_id)))?;

        if !project_allows(principal, &record.roster, action) {
            tracing::warn!(
                user_id = %principal.id,
                username = %principal.username,
                project_id = %project_id,
                action = ?action,
                "Project access denied"
            );
            return Err(AuthzError::Forbidden(format!(
                "Not allowed to {}",
                action.describe()
            )));
        }

        Ok(record)
    }

    /// Loads a task and its project and checks `action` on the task
    ///
    /// # Errors
    ///
    /// - `AuthzError::NotFound` if the task doesn't exist, or if it has no
    ///   (existing) project and the principal isn't an admin
    /// - `AuthzError::Forbidden` if the policy denies the action
    pub async fn authorize_task(
        &self,
        principal: &Principal,
        task_id: Uuid,
        action: TaskAction,
    ) -> Result<TaskRecord, AuthzError> {
        let task = self.load_task(task_id).await?;
        self.evaluate_task(principal, task, action).await
    }

    /// Like [`authorize_task`](Self::authorize_task), but the task must also
    /// belong to `project_id`
    ///
    /// A task from another project is reported as `NotFound`.
    pub async fn authorize_task_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        task_id: Uuid,
        action: TaskAction,
    ) -> Result<TaskRecord, AuthzError> {
        let task = self.load_task(task_id).await?;

        if task.project_id != Some(project_id) {
            return Err(AuthzError::NotFound(Resource::Task(task_id)));
        }

        self.evaluate_task(principal, task, action).await
    }

    /// Checks that the principal may create a task under `project_id`
    ///
    /// Tasks outside any project can only be created by admins.
    pub async fn authorize_task_creation(
        &self,
        principal: &Principal,
        project_id: Option<Uuid>,
    ) -> Result<Option<ProjectRecord>, AuthzError> {
        match project_id {
            Some(id) => self
                .authorize_project(principal, id, ProjectAction::CreateTask)
                .await
                .map(Some),
            None if principal.is_admin() => Ok(None),
            None => {
                tracing::warn!(
                    user_id = %principal.id,
                    username = %principal.username,
                    "Task creation without project denied"
                );
                Err(AuthzError::Forbidden(
                    "Only administrators can create tasks outside a project".to_string(),
                ))
            }
        }
    }

    /// Filters a candidate list down to the tasks the principal may read
    ///
    /// Each distinct project is looked up once per call.
    pub async fn visible_tasks(
        &self,
        principal: &Principal,
        tasks: Vec<Task>,
    ) -> Result<Vec<Task>, AuthzError> {
        if principal.is_admin() {
            return Ok(tasks);
        }

        let mut rosters: HashMap<Uuid, Option<ProjectRoster>> = HashMap::new();
        let mut visible = Vec::with_capacity(tasks.len());

        for task in tasks {
            let roster = match task.project_id {
                Some(project_id) => {
                    if !rosters.contains_key(&project_id) {
                        let roster = self
                            .lookup
                            .project(project_id)
                            .await?
                            .map(|record| record.roster);
                        rosters.insert(project_id, roster);
                    }
                    rosters.get(&project_id).and_then(Option::as_ref)
                }
                None => None,
            };

            if task_allows(principal, &task, roster, TaskAction::Read) {
                visible.push(task);
            }
        }

        Ok(visible)
    }

    async fn load_task(&self, task_id: Uuid) -> Result<Task, AuthzError> {
        self.lookup
            .task(task_id)
            .await?
            .ok_or(AuthzError::NotFound(Resource::Task(task_id)))
    }

    async fn evaluate_task(
        &self,
        principal: &Principal,
        task: Task,
        action: TaskAction,
    ) -> Result<TaskRecord, AuthzError> {
        let project = match task.project_id {
            Some(project_id) => self.lookup.project(project_id).await?,
            None => None,
        };

        // Orphaned tasks stay hidden from everyone but admins.
        if project.is_none() && !principal.is_admin() {
            tracing::warn!(
                user_id = %principal.id,
                task_id = %task.id,
                "Task without project requested by non-admin"
            );
            return Err(AuthzError::NotFound(Resource::Task(task.id)));
        }

        if !task_allows(principal, &task, project.as_ref().map(|p| &p.roster), action) {
            tracing::warn!(
                user_id = %principal.id,
                username = %principal.username,
                task_id = %task.id,
                action = ?action,
                "Task access denied"
            );
            return Err(AuthzError::Forbidden(format!(
                "Not allowed to {}",
                action.describe()
            )));
        }

        Ok(TaskRecord { task, project })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryLookup {
        projects: HashMap<Uuid, ProjectRecord>,
        tasks: HashMap<Uuid, Task>,
        project_reads: AtomicUsize,
    }

    impl MemoryLookup {
        fn add_project(&mut self, owners: &[&str], members: &[&str]) -> Uuid {
            let id = Uuid::new_v4();
            let project = Project {
                id,
                name: format!("project-{}", id),
                description: None,
                status: "pending".to_string(),
                due_date: None,
                created_at: Utc::now(),
            };
            let roster = ProjectRoster::new(owners.iter().copied(), members.iter().copied());
            self.projects.insert(id, ProjectRecord { project, roster });
            id
        }

        fn add_task(&mut self, project_id: Option<Uuid>, assignee: Option<&str>) -> Uuid {
            let id = Uuid::new_v4();
            let task = Task {
                id,
                title: "task".to_string(),
                description: None,
                status: "pending".to_string(),
                priority: "medium".to_string(),
                due_date: None,
                assignee: assignee.map(str::to_string),
                project_id,
                created_by: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.tasks.insert(id, task);
            id
        }
    }

    #[async_trait]
    impl ResourceLookup for MemoryLookup {
        async fn project(&self, id: Uuid) -> Result<Option<ProjectRecord>, sqlx::Error> {
            self.project_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.projects.get(&id).cloned())
        }

        async fn task(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
            Ok(self.tasks.get(&id).cloned())
        }
    }

    fn user(name: &str) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: name.to_string(),
            role: UserRole::User,
        }
    }

    fn admin() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            role: UserRole::Admin,
        }
    }

    fn is_forbidden<T>(result: &Result<T, AuthzError>) -> bool {
        matches!(result, Err(AuthzError::Forbidden(_)))
    }

    fn is_not_found<T>(result: &Result<T, AuthzError>) -> bool {
        matches!(result, Err(AuthzError::NotFound(_)))
    }

    #[test]
    fn test_project_policy_table() {
        let roster = ProjectRoster::new(["alice"], ["bob"]);
        let alice = user("alice");
        let bob = user("bob");
        let carol = user("carol");
        let root = admin();

        use ProjectAction::*;
        for action in [View, CreateTask] {
            assert!(project_allows(&alice, &roster, action));
            assert!(project_allows(&bob, &roster, action));
            assert!(!project_allows(&carol, &roster, action));
            assert!(project_allows(&root, &roster, action));
        }
        for action in [Edit, Delete, ManageRoster] {
            assert!(project_allows(&alice, &roster, action));
            assert!(!project_allows(&bob, &roster, action));
            assert!(!project_allows(&carol, &roster, action));
            assert!(project_allows(&root, &roster, action));
        }
    }

    #[test]
    fn test_task_policy_table() {
        let roster = ProjectRoster::new(["alice"], ["bob"]);
        let mut lookup = MemoryLookup::default();
        let task_id = lookup.add_task(None, Some("dave"));
        let task = lookup.tasks[&task_id].clone();

        let alice = user("alice");
        let bob = user("bob");
        let dave = user("dave");
        let carol = user("carol");

        use TaskAction::*;
        // owner
        assert!(task_allows(&alice, &task, Some(&roster), Read));
        assert!(task_allows(&alice, &task, Some(&roster), Update));
        assert!(task_allows(&alice, &task, Some(&roster), Delete));
        // member
        assert!(task_allows(&bob, &task, Some(&roster), Read));
        assert!(!task_allows(&bob, &task, Some(&roster), Update));
        assert!(!task_allows(&bob, &task, Some(&roster), Delete));
        // assignee
        assert!(task_allows(&dave, &task, Some(&roster), Read));
        assert!(task_allows(&dave, &task, Some(&roster), Update));
        assert!(!task_allows(&dave, &task, Some(&roster), Delete));
        // outsider
        assert!(!task_allows(&carol, &task, Some(&roster), Read));
        assert!(!task_allows(&carol, &task, Some(&roster), Update));
        assert!(!task_allows(&carol, &task, Some(&roster), Delete));
        // admin, even without a project
        for action in [Read, Update, Delete] {
            assert!(task_allows(&admin(), &task, None, action));
            assert!(!task_allows(&dave, &task, None, action));
        }
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let roster = ProjectRoster::new(["alice"], ["bob"]);
        assert!(!project_allows(&user("Alice"), &roster, ProjectAction::Edit));
        assert!(!project_allows(&user("BOB"), &roster, ProjectAction::View));
        assert!(!project_allows(&user("alice "), &roster, ProjectAction::View));
    }

    #[test]
    fn test_empty_roster_allows_only_admin() {
        let roster = ProjectRoster::default();
        for action in [
            ProjectAction::View,
            ProjectAction::Edit,
            ProjectAction::Delete,
            ProjectAction::ManageRoster,
            ProjectAction::CreateTask,
        ] {
            assert!(!project_allows(&user("alice"), &roster, action));
            assert!(project_allows(&admin(), &roster, action));
        }
    }

    #[tokio::test]
    async fn test_alice_bob_admin_scenario() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &[]);
        let t1 = lookup.add_task(Some(p1), Some("bob"));
        let authorizer = Authorizer::new(lookup);

        let alice = user("alice");
        let bob = user("bob");
        let root = admin();

        // bob can update T1 through the assignee match
        let record = authorizer
            .authorize_task(&bob, t1, TaskAction::Update)
            .await
            .expect("assignee may update");
        assert_eq!(record.task.id, t1);
        assert_eq!(record.project.map(|p| p.project.id), Some(p1));

        // but may neither delete P1 nor change its members
        assert!(is_forbidden(
            &authorizer.authorize_project(&bob, p1, ProjectAction::Delete).await
        ));
        assert!(is_forbidden(
            &authorizer
                .authorize_project(&bob, p1, ProjectAction::ManageRoster)
                .await
        ));
        assert!(is_forbidden(
            &authorizer.authorize_task(&bob, t1, TaskAction::Delete).await
        ));

        // alice owns P1
        assert!(authorizer
            .authorize_project(&alice, p1, ProjectAction::ManageRoster)
            .await
            .is_ok());
        assert!(authorizer
            .authorize_task(&alice, t1, TaskAction::Delete)
            .await
            .is_ok());

        // admin can do everything
        for action in [
            ProjectAction::View,
            ProjectAction::Edit,
            ProjectAction::Delete,
            ProjectAction::ManageRoster,
            ProjectAction::CreateTask,
        ] {
            assert!(authorizer.authorize_project(&root, p1, action).await.is_ok());
        }
        for action in [TaskAction::Read, TaskAction::Update, TaskAction::Delete] {
            assert!(authorizer.authorize_task(&root, t1, action).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_missing_resources_are_not_found() {
        let authorizer = Authorizer::new(MemoryLookup::default());
        let missing = Uuid::new_v4();

        let result = authorizer
            .authorize_project(&admin(), missing, ProjectAction::View)
            .await;
        assert!(matches!(
            result,
            Err(AuthzError::NotFound(Resource::Project(id))) if id == missing
        ));

        let result = authorizer
            .authorize_task(&admin(), missing, TaskAction::Read)
            .await;
        assert!(matches!(
            result,
            Err(AuthzError::NotFound(Resource::Task(id))) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_orphan_task_hidden_from_non_admins() {
        let mut lookup = MemoryLookup::default();
        let orphan = lookup.add_task(None, Some("bob"));
        let dangling = lookup.add_task(Some(Uuid::new_v4()), Some("bob"));
        let authorizer = Authorizer::new(lookup);

        let bob = user("bob");
        for task_id in [orphan, dangling] {
            for action in [TaskAction::Read, TaskAction::Update, TaskAction::Delete] {
                assert!(is_not_found(
                    &authorizer.authorize_task(&bob, task_id, action).await
                ));
            }

            let record = authorizer
                .authorize_task(&admin(), task_id, TaskAction::Update)
                .await
                .expect("admin may access orphaned tasks");
            assert!(record.project.is_none());
        }
    }

    #[tokio::test]
    async fn test_task_in_other_project_is_not_found() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &[]);
        let p2 = lookup.add_project(&["alice"], &[]);
        let t1 = lookup.add_task(Some(p1), None);
        let authorizer = Authorizer::new(lookup);

        let alice = user("alice");
        assert!(authorizer
            .authorize_task_in_project(&alice, p1, t1, TaskAction::Read)
            .await
            .is_ok());
        assert!(is_not_found(
            &authorizer
                .authorize_task_in_project(&alice, p2, t1, TaskAction::Read)
                .await
        ));
        assert!(is_not_found(
            &authorizer
                .authorize_task_in_project(&admin(), p2, t1, TaskAction::Read)
                .await
        ));
    }

    #[tokio::test]
    async fn test_task_creation() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &["bob"]);
        let authorizer = Authorizer::new(lookup);

        assert!(authorizer
            .authorize_task_creation(&user("bob"), Some(p1))
            .await
            .unwrap()
            .is_some());
        assert!(is_forbidden(
            &authorizer
                .authorize_task_creation(&user("carol"), Some(p1))
                .await
        ));
        assert!(is_not_found(
            &authorizer
                .authorize_task_creation(&user("alice"), Some(Uuid::new_v4()))
                .await
        ));

        // outside a project only admins may create
        assert!(is_forbidden(
            &authorizer.authorize_task_creation(&user("alice"), None).await
        ));
        assert!(authorizer
            .authorize_task_creation(&admin(), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_visible_tasks_filters_per_task() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &["bob"]);
        let p2 = lookup.add_project(&["carol"], &[]);
        let in_p1 = lookup.add_task(Some(p1), None);
        let in_p2_assigned = lookup.add_task(Some(p2), Some("bob"));
        let in_p2_other = lookup.add_task(Some(p2), Some("carol"));
        let orphan = lookup.add_task(None, Some("bob"));

        let all: Vec<Task> = [in_p1, in_p2_assigned, in_p2_other, orphan]
            .iter()
            .map(|id| lookup.tasks[id].clone())
            .collect();
        let authorizer = Authorizer::new(lookup);

        let visible = authorizer.visible_tasks(&user("bob"), all.clone()).await.unwrap();
        let ids: Vec<Uuid> = visible.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![in_p1, in_p2_assigned]);

        let visible = authorizer.visible_tasks(&user("dave"), all.clone()).await.unwrap();
        assert!(visible.is_empty());

        let visible = authorizer.visible_tasks(&admin(), all).await.unwrap();
        assert_eq!(visible.len(), 4);
    }

    #[tokio::test]
    async fn test_visible_tasks_loads_each_project_once() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &[]);
        let ids: Vec<Uuid> = (0..5).map(|_| lookup.add_task(Some(p1), None)).collect();
        let tasks: Vec<Task> = ids.iter().map(|id| lookup.tasks[id].clone()).collect();
        let authorizer = Authorizer::new(lookup);

        let visible = authorizer.visible_tasks(&user("alice"), tasks).await.unwrap();
        assert_eq!(visible.len(), 5);
        assert_eq!(authorizer.lookup.project_reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_decisions_observe_current_roster() {
        let mut lookup = MemoryLookup::default();
        let p1 = lookup.add_project(&["alice"], &[]);
        let bob = user("bob");

        let authorizer = Authorizer::new(lookup);
        assert!(is_forbidden(
            &authorizer.authorize_project(&bob, p1, ProjectAction::View).await
        ));

        let mut lookup = authorizer.lookup;
        if let Some(record) = lookup.projects.get_mut(&p1) {
            record.roster = ProjectRoster::new(["alice"], ["bob"]);
        }
        let authorizer = Authorizer::new(lookup);
        assert!(authorizer
            .authorize_project(&bob, p1, ProjectAction::View)
            .await
            .is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = AuthzError::NotFound(Resource::Task(Uuid::new_v4()));
        assert_eq!(err.to_string(), "Task not found");

        let err = AuthzError::NotFound(Resource::Project(Uuid::new_v4()));
        assert_eq!(err.to_string(), "Project not found");
    }
}
