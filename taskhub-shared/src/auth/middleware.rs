/// Request authentication for Axum
///
/// Resolves the `Authorization: Bearer <token>` header of a request into a
/// [`Principal`]: the token is validated, then the user it names is loaded
/// from the database so that username and role are always current.
///
/// # Request Extensions
///
/// After successful authentication the API server inserts the `Principal`
/// into the request extensions. Handlers take it as an extractor:
///
/// ```
/// use taskhub_shared::auth::middleware::Principal;
///
/// async fn handler(principal: Principal) -> String {
///     format!("Hello, {}!", principal.username)
/// }
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::auth::middleware::authenticate;
/// use axum::http::HeaderMap;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let principal = authenticate(&pool, &headers, "your-jwt-secret").await?;
/// println!("{} ({})", principal.username, principal.role.as_str());
/// # Ok(())
/// # }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::{User, UserRole};

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header isn't a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token is valid but its user no longer exists
    #[error("User not found")]
    UnknownSubject(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            AuthError::InvalidFormat(_) => ("bad_request", self.to_string()),
            AuthError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database error during authentication");
                ("internal_error", "Internal server error".to_string())
            }
            _ => ("unauthorized", self.to_string()),
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            JwtError::WrongTokenType { .. } => {
                AuthError::InvalidToken("Access token required".to_string())
            }
            _ => AuthError::InvalidToken("Invalid token".to_string()),
        }
    }
}

/// Extracts the Bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Resolves an access token into the principal it names
///
/// # Errors
///
/// - `AuthError::InvalidToken` if the token is malformed, expired, signed
///   with another key or is not an access token
/// - `AuthError::UnknownSubject` if the user has been deleted
pub async fn resolve_principal(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<Principal, AuthError> {
    let claims = validate_access_token(token, secret)?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject(claims.sub))?;

    Ok(Principal::from(user))
}

/// Authenticates a request from its headers
pub async fn authenticate(
    pool: &PgPool,
    headers: &HeaderMap,
    secret: &str,
) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;
    resolve_principal(pool, token, secret).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    #[test]
    fn test_principal_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Admin,
            created_at: chrono::Utc::now(),
        };
        let id = user.id;

        let principal = Principal::from(user);
        assert_eq!(principal.id, id);
        assert_eq!(principal.username, "alice");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn test_jwt_errors_map_to_invalid_token() {
        let err: AuthError = JwtError::Expired.into();
        assert_eq!(err.to_string(), "Token expired");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: AuthError = JwtError::ValidationError("bad signature".into()).into();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::UnknownSubject(Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_principal_extractor() {
        let principal = Principal {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            role: UserRole::User,
        };

        let mut req = Request::new(());
        req.extensions_mut().insert(principal.clone());
        let (mut parts, _) = req.into_parts();
        let extracted = Principal::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, principal);

        let (mut parts, _) = Request::new(()).into_parts();
        assert!(matches!(
            Principal::from_request_parts(&mut parts, &()).await,
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_resolve_principal_rejects_bad_token() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/unused")
            .unwrap();

        let result = resolve_principal(&pool, "garbage", "secret-secret-secret-secret-secret").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
