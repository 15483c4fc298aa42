// Secure-QR configuration.
// Holds the hosting deployment (base URL, upload endpoint), the upload timeout and the
// PBKDF2 iteration count. Loaded from a JSON file; every field falls back to its default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::errors::ConfigError;

/// Public base URL of the hosting deployment the shareable links point at.
pub const DEFAULT_BASE_URL: &str = "https://yeetfileforqqrcode.thibaultpauljack.uno";

/// Path of the text-upload route, relative to the base URL.
pub const UPLOAD_PATH: &str = "/api/send/text";

/// Upload timeout applied when none is configured.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 5;

/// PBKDF2-HMAC-SHA256 iteration count expected by the hosting service's decryptor.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Settings for the secure-QR pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureQrConfig {
    pub base_url: String,
    pub upload_endpoint: String,
    pub upload_timeout_secs: u64,
    /// Changing this breaks decryption of anything produced under another count.
    pub kdf_iterations: u32,
}

impl Default for SecureQrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_endpoint: format!("{}{}", DEFAULT_BASE_URL, UPLOAD_PATH),
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl SecureQrConfig {
    /// Config targeting another deployment of the same hosting service.
    pub fn for_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            base_url: base_url.to_string(),
            upload_endpoint: format!("{}{}", base_url, UPLOAD_PATH),
            ..Self::default()
        }
    }

    /// Loads the config from a JSON file.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), base_url = %config.base_url, "config loaded");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ConfigError::Serialization(format!("Failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("base_url", &self.base_url),
            ("upload_endpoint", &self.upload_endpoint),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must start with http:// or https://, got '{}'",
                    field, url
                )));
            }
        }

        if self.upload_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "upload_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.kdf_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "kdf_iterations must be greater than zero".to_string(),
            ));
        }

        if self.kdf_iterations != DEFAULT_KDF_ITERATIONS {
            tracing::warn!(
                iterations = self.kdf_iterations,
                "non-default KDF iteration count; links will not open on the standard service"
            );
        }

        Ok(())
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}
