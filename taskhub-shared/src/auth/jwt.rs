/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the user ID as the
/// subject. Username and role are deliberately not embedded: they are
/// re-read from the database on every request so that authorization always
/// sees the current account state.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (24h), used for API authentication
/// - **Refresh Token**: Long-lived (30d), used to obtain new access tokens
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated_claims = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated_claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim written into and required from every token
pub const TOKEN_ISSUER: &str = "taskhub";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token has the wrong type for this use
    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// - `sub`: User ID
/// - `iss`: Always "taskhub"
/// - `iat` / `nbf` / `exp`: Unix timestamps
/// - `token_type`: Access or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for `token_type`
    pub fn new(user_id: Uuid, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, token_type, token_type.default_expiration())
    }

    /// Creates claims with custom expiration
    ///
    /// A negative duration produces an already expired token (useful in tests).
    pub fn with_expiration(user_id: Uuid, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds until the token expires (0 if already expired)
    pub fn expires_in_seconds(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// Creates an HS256-signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies signature, expiration, not-before and issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the token has expired
/// - `JwtError::InvalidIssuer` if the issuer isn't "taskhub"
/// - `JwtError::ValidationError` for anything else (bad signature, garbage input)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

fn validate_token_of_type(
    token: &str,
    secret: &str,
    expected: TokenType,
) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongTokenType {
            expected: expected.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

/// Validates token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_of_type(token, secret, TokenType::Access)
}

/// Validates token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_of_type(token, secret, TokenType::Refresh)
}

/// Issues a new access token for the subject of a valid refresh token
///
/// Returns the new token together with the subject's user ID so callers can
/// check that the account still exists.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<(Uuid, String), JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, TokenType::Access);
    let token = create_token(&access_claims, secret)?;

    Ok((refresh_claims.sub, token))
}
