/// User directory endpoints
///
/// - `GET /users` - List users (any authenticated caller)
/// - `GET /users/me` - The caller's own account

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use taskhub_shared::{auth::middleware::Principal, models::user::User};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    fn bounds(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Lists users, oldest first; password hashes are never included
pub async fn list_users(
    State(state): State<AppState>,
    _principal: Principal,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let (limit, offset) = page.bounds();
    let users = User::list(&state.db, limit, offset).await?;
    Ok(Json(users))
}

/// Returns the authenticated user
pub async fn current_user(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        assert_eq!(Pagination::default().bounds(), (100, 0));

        let page = Pagination {
            limit: Some(5000),
            offset: Some(-3),
        };
        assert_eq!(page.bounds(), (1000, 0));

        let page = Pagination {
            limit: Some(0),
            offset: Some(20),
        };
        assert_eq!(page.bounds(), (1, 20));
    }
}
