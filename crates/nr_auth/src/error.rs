use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("User already registered: {0}")]
    UserExists(String),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
