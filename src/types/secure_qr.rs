use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minimum number of characters accepted for the sharing password.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Lowest download count the hosting service accepts.
pub const MIN_DOWNLOADS: u32 = 1;

/// Highest download count the hosting service accepts.
pub const MAX_DOWNLOADS: u32 = 999;

/// Lifetime of a hosted secret before the service deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Expiration {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[default]
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Expiration {
    pub const ALL: [Expiration; 4] = [
        Expiration::FiveMinutes,
        Expiration::ThirtyMinutes,
        Expiration::OneHour,
        Expiration::OneDay,
    ];

    /// Wire name used by the hosting API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Expiration::FiveMinutes => "5m",
            Expiration::ThirtyMinutes => "30m",
            Expiration::OneHour => "1h",
            Expiration::OneDay => "1d",
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expiration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expiration::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown expiration: {}", s))
    }
}

fn default_downloads() -> u32 {
    MIN_DOWNLOADS
}

/// Options for one secure-QR generation.
///
/// Deserializes from the `{content, password, expiration?, downloads?}` option
/// object, applying the `30m` / `1` defaults for the optional fields.
#[derive(Clone, Deserialize)]
pub struct SecureQrRequest {
    pub content: String,
    pub password: String,
    #[serde(default)]
    pub expiration: Expiration,
    #[serde(default = "default_downloads")]
    pub downloads: u32,
}

impl SecureQrRequest {
    pub fn new(content: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            password: password.into(),
            expiration: Expiration::default(),
            downloads: default_downloads(),
        }
    }

    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn with_downloads(mut self, downloads: u32) -> Self {
        self.downloads = downloads;
        self
    }
}

impl fmt::Debug for SecureQrRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureQrRequest")
            .field("content_len", &self.content.len())
            .field("password", &"<redacted>")
            .field("expiration", &self.expiration)
            .field("downloads", &self.downloads)
            .finish()
    }
}

/// Outcome of a successful generation. `name` is the plaintext random name;
/// only its encrypted form ever leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureQrResult {
    pub url: String,
    pub name: String,
    pub expiration: Expiration,
    pub downloads: u32,
}
