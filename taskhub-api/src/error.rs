/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; every library error converts into
/// [`ApiError`], which renders as a JSON body with a matching status code.
///
/// # Response Format
///
/// ```json
/// {
///   "error": "forbidden",
///   "message": "Not allowed to delete this project"
/// }
/// ```
///
/// # Example
///
/// ```
/// use taskhub_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Project not found".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskhub_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), including duplicates and unknown references
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Request validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field errors for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Details stay in the log
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique and foreign key violations are client mistakes (a taken username,
/// an assignee that doesn't exist) and map to 400.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default();

                if db_err.is_unique_violation() {
                    let message = if constraint.contains("username") {
                        "Username already exists"
                    } else if constraint.contains("email") {
                        "Email already registered"
                    } else {
                        "Duplicate value"
                    };
                    return ApiError::BadRequest(message.to_string());
                }

                if db_err.is_foreign_key_violation() {
                    let message = if constraint.contains("assignee") {
                        "Assignee does not exist"
                    } else if constraint.contains("username") {
                        "Unknown username"
                    } else if constraint.contains("project") {
                        "Project does not exist"
                    } else {
                        "Referenced record does not exist"
                    };
                    return ApiError::BadRequest(message.to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation failures to API errors
///
/// Nested request structs are flattened on the wire, so their fields are
/// reported under their own names. List entries are reported as
/// `field[index].name`.
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = Vec::new();
        collect_validation_details(&err, "", &mut errors);
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

fn collect_validation_details(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<ValidationErrorDetail>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| ValidationErrorDetail {
                    field: format!("{}{}", prefix, field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_details(inner, prefix, out);
            }
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    let prefix = format!("{}{}[{}].", prefix, field, index);
                    collect_validation_details(inner, &prefix, out);
                }
            }
        }
    }
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::UnknownSubject(_) => ApiError::Unauthorized("User not found".to_string()),
            AuthError::DatabaseError(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotFound(resource) => ApiError::NotFound(format!("{} not found", resource)),
            AuthzError::Forbidden(msg) => ApiError::Forbidden(msg),
            AuthzError::DatabaseError(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::WrongTokenType { expected, .. } => {
                ApiError::Unauthorized(format!("Expected {} token", expected))
            }
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_shared::auth::authorization::Resource;
    use uuid::Uuid;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InternalError("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_authz_errors_map_one_to_one() {
        let err: ApiError = AuthzError::NotFound(Resource::Project(Uuid::new_v4())).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Project not found"));

        let err: ApiError = AuthzError::Forbidden("Not allowed to delete this task".into()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_errors() {
        let err: ApiError = AuthError::UnknownSubject(Uuid::new_v4()).into();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "User not found"));

        let err: ApiError = AuthError::InvalidFormat("Expected Bearer token".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_carry_field_details() {
        let err: ApiError = Sample { name: String::new() }.validate().unwrap_err().into();

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(
                    details,
                    vec![ValidationErrorDetail {
                        field: "name".to_string(),
                        message: "Name is required".to_string(),
                    }]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[derive(Validate)]
    struct Wrapper {
        #[validate(nested)]
        inner: Sample,

        #[validate(range(min = 1, message = "Count must be positive"))]
        count: i32,
    }

    #[test]
    fn test_nested_validation_errors_are_reported() {
        let wrapper = Wrapper {
            inner: Sample { name: String::new() },
            count: 0,
        };
        let err: ApiError = wrapper.validate().unwrap_err().into();

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(
                    details,
                    vec![
                        ValidationErrorDetail {
                            field: "count".to_string(),
                            message: "Count must be positive".to_string(),
                        },
                        ValidationErrorDetail {
                            field: "name".to_string(),
                            message: "Name is required".to_string(),
                        },
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
