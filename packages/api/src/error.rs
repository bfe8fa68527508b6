//! # Failure taxonomy
//!
//! Every failure the services produce falls into one of two categories:
//!
//! - **Public** — carries a short, pre-approved message that is safe to
//!   show verbatim to an end user ("email is already taken").
//! - **Internal** — anything from storage, the crypto primitives, or an
//!   invariant check. The presentation layer shows [`GENERIC_ALERT`]
//!   instead; the original error is for operators and logs only.
//!
//! Validation runs fail-fast, so a single [`Error`] is always the first
//! failure encountered. Services pass failures through unchanged; only the
//! presentation boundary calls [`Error::alert`] to decide what a user sees.

use store::StoreError;
use thiserror::Error;

/// Fallback message shown when a failure is not safe to display.
pub const GENERIC_ALERT: &str =
    "Something went wrong. Please try again. If the problem persists, contact support@typedrecipes.org";

/// Every failure the account and recipe services can produce.
#[derive(Debug, Error)]
pub enum Error {
    // Safe to show to end users.
    #[error("password is required")]
    PasswordRequired,
    #[error("password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("email is required")]
    EmailRequired,
    #[error("email provided has an invalid format")]
    EmailInvalid,
    #[error("email is already taken")]
    EmailTaken,
    #[error("full name is required")]
    NameRequired,
    #[error("email or password provided is invalid")]
    InvalidCredentials,
    #[error("title is required")]
    TitleRequired,

    // Internal: operators and logs only.
    #[error("resource not found")]
    NotFound,
    #[error("ID has an invalid value")]
    InvalidId,
    #[error("user ID is required")]
    UserIdRequired,
    #[error("password hash is required")]
    PasswordHashRequired,
    #[error("remember hash is required")]
    RememberHashRequired,
    #[error("remember token must be at least 32 bytes long")]
    RememberTooShort,
    #[error("filename has an invalid value")]
    FilenameInvalid,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("random source failed: {0}")]
    Rand(String),
    #[error("token is not valid base64: {0}")]
    TokenDecode(#[from] base64::DecodeError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the message may be shown verbatim to an end user.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Error::PasswordRequired
                | Error::PasswordTooShort
                | Error::EmailRequired
                | Error::EmailInvalid
                | Error::EmailTaken
                | Error::NameRequired
                | Error::InvalidCredentials
                | Error::TitleRequired
        )
    }

    /// Human-presentable message: the failure itself when public (first
    /// letter capitalized), the generic fallback otherwise.
    pub fn alert(&self) -> String {
        if !self.is_public() {
            return GENERIC_ALERT.to_string();
        }
        let msg = self.to_string();
        let mut chars = msg.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => msg,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Error::NotFound,
            other => Error::Store(other),
        }
    }
}
