//! Password-based encryption codec and random name generator.
//!
//! Output framing is `iv (12 bytes) || AES-256-GCM ciphertext || tag (16 bytes)`,
//! which is what the hosting service's decryptor reads. Every call draws a new IV,
//! including calls that reuse a salt and password.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::services::crypto_service::CryptoProvider;
use crate::types::errors::CryptoError;
use crate::types::payload::{EncryptedPayload, SealedMessage, IV_LENGTH, KEY_LENGTH, SALT_LENGTH};

/// Random bytes behind a generated name (8 hex characters).
const NAME_BYTES: usize = 4;

/// Async encryption front-end over an injected [`CryptoProvider`].
///
/// Key derivation is deliberately slow, so it runs on the blocking pool.
#[derive(Clone)]
pub struct Encryptor {
    provider: Arc<dyn CryptoProvider>,
}

impl Encryptor {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn CryptoProvider> {
        &self.provider
    }

    pub fn generate_salt(&self) -> Result<[u8; SALT_LENGTH], CryptoError> {
        let mut salt = [0u8; SALT_LENGTH];
        self.provider.fill_random(&mut salt)?;
        Ok(salt)
    }

    /// Returns 8 lowercase hex characters from 4 random bytes.
    ///
    /// No collision check is made against previously issued names.
    pub fn generate_name(&self) -> Result<String, CryptoError> {
        let mut bytes = [0u8; NAME_BYTES];
        self.provider.fill_random(&mut bytes)?;
        Ok(hex::encode(bytes))
    }

    /// Encrypts `plaintext` under a key derived from `password` and `salt`.
    pub async fn encrypt_with_salt(
        &self,
        plaintext: &[u8],
        password: &str,
        salt: &[u8; SALT_LENGTH],
    ) -> Result<SealedMessage, CryptoError> {
        let (ciphertext, iv, _) = self.seal_blocking(plaintext, password, salt).await?;
        Ok(SealedMessage { ciphertext, iv })
    }

    /// Encrypts `plaintext` under a freshly drawn salt.
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        password: &str,
    ) -> Result<EncryptedPayload, CryptoError> {
        let salt = self.generate_salt()?;
        let (ciphertext, iv, key_bits) = self.seal_blocking(plaintext, password, &salt).await?;
        Ok(EncryptedPayload {
            ciphertext,
            iv,
            salt,
            key_bits: *key_bits,
        })
    }

    async fn seal_blocking(
        &self,
        plaintext: &[u8],
        password: &str,
        salt: &[u8; SALT_LENGTH],
    ) -> Result<(Vec<u8>, [u8; IV_LENGTH], Zeroizing<[u8; KEY_LENGTH]>), CryptoError> {
        let mut iv = [0u8; IV_LENGTH];
        self.provider.fill_random(&mut iv)?;

        let provider = Arc::clone(&self.provider);
        let plaintext = Zeroizing::new(plaintext.to_vec());
        let password = Zeroizing::new(password.to_string());
        let salt = *salt;

        let task = tokio::task::spawn_blocking(move || {
            let key = provider.derive_key(&password, &salt)?;
            let sealed = provider.seal(&key, &iv, &plaintext)?;
            Ok::<_, CryptoError>((sealed, Zeroizing::new(*key.key_bits())))
        });

        let (sealed, key_bits) = task
            .await
            .map_err(|e| CryptoError::Encryption(format!("Encryption task aborted: {}", e)))??;

        let mut framed = Vec::with_capacity(IV_LENGTH + sealed.len());
        framed.extend_from_slice(&iv);
        framed.extend_from_slice(&sealed);

        Ok((framed, iv, key_bits))
    }
}
