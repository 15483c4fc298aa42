use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::secure_qr::Expiration;

/// AES-256-GCM nonce/IV length in bytes.
pub const IV_LENGTH: usize = 12;

/// PBKDF2 salt length in bytes.
pub const SALT_LENGTH: usize = 32;

/// AES-256-GCM key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES-256-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// One sealed message: `ciphertext` is `iv || aead_output || tag`, and `iv`
/// repeats its first twelve bytes for callers that want it alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LENGTH],
}

/// Result of encrypting under a freshly drawn salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptedPayload {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LENGTH],
    pub salt: [u8; SALT_LENGTH],
    pub key_bits: [u8; KEY_LENGTH],
}

impl std::fmt::Debug for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedPayload")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("iv", &self.iv)
            .field("salt", &self.salt)
            .field("key_bits", &"<redacted>")
            .finish()
    }
}

/// JSON body sent to the hosting service. Byte fields serialize as plain
/// integer arrays, which is the only binary encoding the API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    pub name: String,
    pub salt: Vec<u8>,
    pub downloads: u32,
    pub expiration: Expiration,
    pub text: Vec<u8>,
    pub size: usize,
}

impl UploadPayload {
    /// Builds the payload; `size` always tracks `text.len()`.
    pub fn new(
        encrypted_name_hex: impl Into<String>,
        salt: &[u8],
        encrypted_text: Vec<u8>,
        expiration: Expiration,
        downloads: u32,
    ) -> Self {
        let size = encrypted_text.len();
        Self {
            name: encrypted_name_hex.into(),
            salt: salt.to_vec(),
            downloads,
            expiration,
            text: encrypted_text,
            size,
        }
    }
}

/// Success body returned by the hosting service.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub id: Option<String>,
}
