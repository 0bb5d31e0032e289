//! Error types for the mailer service.

use thiserror::Error;

/// Failures decoding an encrypted recipient address token.
///
/// These are per-candidate errors: the resolver downgrades them to a
/// skipped recipient and they never cross its boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The token did not split into two non-empty `iv:ciphertext` halves.
    #[error("malformed address token: expected iv:ciphertext")]
    MalformedToken,

    /// Invalid hex in either half, or the decrypted bytes were not UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Block decryption failed: bad padding, or a key/IV of the wrong length.
    #[error("decryption error: {0}")]
    Decryption(String),
}

/// Storage-layer failure. Fatal for the whole resolve step.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// The underlying driver/query message, without the layer prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Database(detail) => detail,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Startup configuration failure.
#[derive(Debug, Clone, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

/// Errors that can occur when sending emails.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    /// Configuration error (missing env var, invalid value, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing required field (e.g., from address).
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid email address format.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Error building the email message.
    #[error("Build error: {0}")]
    BuildError(String),

    /// Error sending the email.
    #[error("Send error: {0}")]
    SendError(String),
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::BuildError(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::SendError(err.to_string())
    }
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}
