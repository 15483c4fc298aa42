//! SecureQR — password-protected QR links backed by zero-knowledge text hosting.
//!
//! Content is encrypted locally (PBKDF2-HMAC-SHA256 + AES-256-GCM), uploaded as an
//! opaque blob, and the returned link carries the salt in its URL fragment.

pub mod services;
pub mod types;

pub use services::crypto_service::{CryptoProvider, RingCryptoProvider};
pub use services::secure_qr::SecureQrGenerator;
pub use services::upload_client::{Uploader, YeetFileClient};
pub use types::config::SecureQrConfig;
pub use types::errors::{SecureQrError, SecureQrErrorKind};
pub use types::secure_qr::{Expiration, SecureQrRequest, SecureQrResult};
