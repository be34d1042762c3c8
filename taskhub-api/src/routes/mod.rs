/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and token refresh
/// - `users`: User directory
/// - `projects`: Projects and their rosters
/// - `tasks`: Tasks, globally and within a project
/// - `comments`: Comments on a project's tasks
///
/// Every handler that touches a project or task goes through
/// `AppState::authorizer`, so the permission rules live in one place.

pub mod auth;
pub mod comments;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
