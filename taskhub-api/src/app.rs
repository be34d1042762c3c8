/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_shared::auth::{authorization::Authorizer, middleware::authenticate};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Authorization engine reading current rows from the pool
    pub fn authorizer(&self) -> Authorizer {
        Authorizer::from_pool(self.db.clone())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                                   (public)
/// ├── /auth/                                         (public)
/// │   ├── POST /register
/// │   ├── POST /login
/// │   └── POST /refresh
/// ├── /users                                         (authenticated)
/// │   ├── GET  /
/// │   └── GET  /me
/// ├── /projects                                      (authenticated)
/// │   ├── GET, POST  /
/// │   ├── GET, PUT, DELETE /:id
/// │   ├── PUT  /:id/members
/// │   ├── PUT  /:id/owners
/// │   ├── GET, POST  /:id/tasks
/// │   ├── GET  /:id/tasks-with-comment-count
/// │   ├── GET, PUT   /:id/tasks/:task_id
/// │   └── GET, POST  /:id/tasks/:task_id/comments
/// └── /tasks                                         (authenticated)
///     ├── GET, POST  /
///     └── GET, PUT, DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/me", get(routes::users::current_user));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/members", put(routes::projects::update_members))
        .route("/:id/owners", put(routes::projects::update_owners))
        .route(
            "/:id/tasks",
            get(routes::tasks::list_project_tasks).post(routes::tasks::create_project_task),
        )
        .route(
            "/:id/tasks-with-comment-count",
            get(routes::tasks::list_tasks_with_comment_count),
        )
        .route(
            "/:id/tasks/:task_id",
            get(routes::tasks::get_project_task).put(routes::tasks::update_project_task),
        )
        .route(
            "/:id/tasks/:task_id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        // Only matched routes authenticate; unknown paths fall through to 404
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.cors_allows_any() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Resolves the Bearer token into a `Principal` (re-reading the user row)
/// and injects it into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state.db, req.headers(), state.jwt_secret()).await?;

    tracing::debug!(
        user_id = %principal.id,
        username = %principal.username,
        role = principal.role.as_str(),
        "Request authenticated"
    );

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
