use std::time::Duration;

use thiserror::Error;

// === ValidationError ===

/// Errors raised when a secure-QR request is rejected before any work is done.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The content is empty or whitespace only.
    #[error("Content cannot be empty")]
    ContentEmpty,
    /// The password is shorter than the minimum length.
    #[error("Password too short: must contain at least {min} characters")]
    PasswordTooShort { min: usize },
    /// The download count is outside the accepted range.
    #[error("Downloads out of range: must be between {min} and {max}, got {got}")]
    DownloadsOutOfRange { min: u32, max: u32, got: u32 },
}

// === CryptoError ===

/// Errors related to cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Failed to derive encryption key from password.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
    /// Failed to generate random bytes.
    #[error("Random generation failed: {0}")]
    RandomGeneration(String),
    /// The provided key is invalid.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// === UploadError ===

/// Errors related to the hosting service upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The hosting service answered with a non-2xx status.
    #[error("Upload API error ({status}): {body}")]
    Status { status: u16, body: String },
    /// The request did not complete within the configured timeout.
    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),
    /// A network error occurred before a response was received.
    #[error("Upload network error: {0}")]
    Network(String),
    /// The response body was not the expected JSON document.
    #[error("Upload response invalid: {0}")]
    InvalidResponse(String),
    /// The response did not carry a content id.
    #[error("Upload response did not return an id")]
    MissingId,
}

// === ConfigError ===

/// Errors related to loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("Config I/O error: {0}")]
    Io(String),
    /// Failed to deserialize the config file.
    #[error("Config serialization error: {0}")]
    Serialization(String),
    /// A config value is out of its accepted domain.
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

// === SecureQrError ===

/// Underlying cause of a failed secure-QR generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecureQrErrorKind {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    /// Failures outside the validation, crypto and upload taxonomy.
    #[error("{0}")]
    Unknown(String),
}

/// The single error type surfaced by secure-QR generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Secure QR code generation failed: {kind}")]
pub struct SecureQrError {
    kind: SecureQrErrorKind,
}

impl SecureQrError {
    pub fn kind(&self) -> &SecureQrErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> SecureQrErrorKind {
        self.kind
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, SecureQrErrorKind::Validation(_))
    }
}

impl From<SecureQrErrorKind> for SecureQrError {
    fn from(kind: SecureQrErrorKind) -> Self {
        Self { kind }
    }
}

impl From<ValidationError> for SecureQrError {
    fn from(err: ValidationError) -> Self {
        SecureQrErrorKind::from(err).into()
    }
}

impl From<CryptoError> for SecureQrError {
    fn from(err: CryptoError) -> Self {
        SecureQrErrorKind::from(err).into()
    }
}

impl From<UploadError> for SecureQrError {
    fn from(err: UploadError) -> Self {
        SecureQrErrorKind::from(err).into()
    }
}
