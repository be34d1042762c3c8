/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer token → [`middleware::Principal`] resolution
/// - [`authorization`]: Project and task permission checks
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{hash_password, verify_password};
/// use taskhub_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
