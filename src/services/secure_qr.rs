//! Secure QR generation.
//!
//! Encrypts the content and a random name under one password and salt, uploads
//! both to the hosting service, and returns a share link whose fragment carries
//! the salt. Browsers do not send fragments, so the link can travel through
//! channels that never see the salt again after upload.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::services::crypto_service::{CryptoProvider, KdfParams, RingCryptoProvider};
use crate::services::encryption::Encryptor;
use crate::services::upload_client::{Uploader, YeetFileClient};
use crate::types::config::SecureQrConfig;
use crate::types::errors::{ConfigError, SecureQrError, ValidationError};
use crate::types::secure_qr::{
    SecureQrRequest, SecureQrResult, MAX_DOWNLOADS, MIN_DOWNLOADS, MIN_PASSWORD_LENGTH,
};

/// Rejects requests that must not reach the crypto or network steps.
pub fn validate_request(request: &SecureQrRequest) -> Result<(), ValidationError> {
    // Matches JS `trim()`, which also strips the byte-order mark.
    let content = request
        .content
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if content.is_empty() {
        return Err(ValidationError::ContentEmpty);
    }

    // Length in UTF-16 code units, as the decrypting web client measures it.
    if request.password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if !(MIN_DOWNLOADS..=MAX_DOWNLOADS).contains(&request.downloads) {
        return Err(ValidationError::DownloadsOutOfRange {
            min: MIN_DOWNLOADS,
            max: MAX_DOWNLOADS,
            got: request.downloads,
        });
    }

    Ok(())
}

/// `<base>/send/<id>#<base64url(salt), unpadded>`
pub fn build_share_url(base_url: &str, content_id: &str, salt: &[u8]) -> String {
    format!(
        "{}/send/{}#{}",
        base_url.trim_end_matches('/'),
        content_id,
        URL_SAFE_NO_PAD.encode(salt)
    )
}

/// Entry point for password-protected QR links.
///
/// Holds no per-call state: each `generate` draws its own salt, IVs and name,
/// so one generator can serve concurrent calls.
pub struct SecureQrGenerator {
    encryptor: Encryptor,
    uploader: Arc<dyn Uploader>,
    base_url: String,
}

impl SecureQrGenerator {
    pub fn new(
        crypto: Arc<dyn CryptoProvider>,
        uploader: Arc<dyn Uploader>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            encryptor: Encryptor::new(crypto),
            uploader,
            base_url: base_url.into(),
        }
    }

    /// Wires the `ring` provider and the HTTP client from a config.
    pub fn from_config(config: &SecureQrConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let kdf = KdfParams::with_iterations(config.kdf_iterations).ok_or_else(|| {
            ConfigError::InvalidValue("kdf_iterations must be greater than zero".to_string())
        })?;
        let uploader = YeetFileClient::from_config(config)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        Ok(Self::new(
            Arc::new(RingCryptoProvider::with_kdf(kdf)),
            Arc::new(uploader),
            config.base_url.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs the whole pipeline. Any failure is reported as one
    /// [`SecureQrError`] whose message embeds the underlying cause.
    pub async fn generate(&self, request: &SecureQrRequest) -> Result<SecureQrResult, SecureQrError> {
        match self.run(request).await {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::warn!(error = %err, "secure QR generation failed");
                Err(err)
            }
        }
    }

    async fn run(&self, request: &SecureQrRequest) -> Result<SecureQrResult, SecureQrError> {
        validate_request(request)?;

        let name = self.encryptor.generate_name()?;

        let content = self
            .encryptor
            .encrypt(request.content.as_bytes(), &request.password)
            .await?;

        // Same salt so one password recovers both; encrypt_with_salt draws a new IV.
        let encrypted_name = self
            .encryptor
            .encrypt_with_salt(name.as_bytes(), &request.password, &content.salt)
            .await?;
        let encrypted_name_hex = hex::encode(&encrypted_name.ciphertext);

        let content_id = self
            .uploader
            .upload_text(
                &encrypted_name_hex,
                &content.salt,
                &content.ciphertext,
                request.expiration,
                request.downloads,
            )
            .await?;

        let url = build_share_url(&self.base_url, &content_id, &content.salt);
        tracing::debug!(id = %content_id, expiration = %request.expiration, "secure QR link built");

        Ok(SecureQrResult {
            url,
            name,
            expiration: request.expiration,
            downloads: request.downloads,
        })
    }
}
