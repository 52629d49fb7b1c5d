//! Account credentials and password hashing.
//!
//! Users and clients authenticate the same way: a unique name and an Argon2id-hashed
//! password.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use thiserror::Error;

use mazerp_shared::AppError;

/// Maximum account name length.
pub const MAX_NAME_LEN: usize = 20;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Name or password failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// Name already registered.
    #[error("name is already taken: {0}")]
    NameTaken(String),

    /// Unknown name or wrong password. Deliberately does not say which.
    #[error("invalid name or password")]
    InvalidCredentials,

    /// Hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => Self::Validation(msg),
            AuthError::NameTaken(_) => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Password(e) => Self::Internal(e.to_string()),
            AuthError::Repository(msg) => Self::Database(msg),
        }
    }
}

/// Name and password as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Trimmed account name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Validates submitted credentials.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank or overlong name, or a blank password.
    pub fn validate(name: &str, password: &str) -> Result<Self, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AuthError::InvalidInput(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if password.trim().is_empty() {
            return Err(AuthError::InvalidInput("password is required".to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            password: password.to_string(),
        })
    }

    /// Hashes the password for storage.
    ///
    /// # Errors
    ///
    /// `Password` if hashing fails.
    pub fn hash(&self) -> Result<String, AuthError> {
        Ok(hash_password(&self.password)?)
    }

    /// Checks the password against a stored hash.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` on mismatch, `Password` for a corrupt hash.
    pub fn verify(&self, stored_hash: &str) -> Result<(), AuthError> {
        if verify_password(&self.password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
