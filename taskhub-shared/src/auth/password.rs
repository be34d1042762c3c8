/// Password hashing using Argon2id
///
/// Hashes are stored as PHC strings, which embed the algorithm, parameters
/// and salt, so verification doesn't need to know how a hash was produced.
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("pw123")?;
///
/// assert!(verify_password("pw123", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id memory cost in KiB (19 MiB)
const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Argon2id iterations
const TIME_COST: u32 = 2;

/// Argon2id lanes
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// Example output:
/// ```text
/// $argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0$hash...
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password and an error only when the
/// stored hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}
