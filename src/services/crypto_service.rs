use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::config::DEFAULT_KDF_ITERATIONS;
use crate::types::errors::CryptoError;
use crate::types::payload::{IV_LENGTH, KEY_LENGTH, SALT_LENGTH};

/// PBKDF2 parameters, versioned because the decrypting side must use the same count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: NonZeroU32,
}

impl KdfParams {
    /// The parameters the hosting service decrypts with.
    pub fn v1() -> Self {
        Self::with_iterations(DEFAULT_KDF_ITERATIONS)
            .unwrap_or(Self { iterations: NonZeroU32::MIN })
    }

    /// Custom iteration count; `None` when `iterations` is zero.
    pub fn with_iterations(iterations: u32) -> Option<Self> {
        NonZeroU32::new(iterations).map(|iterations| Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::v1()
    }
}

/// A 256-bit AES-GCM key derived from a password. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bits: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub fn from_bits(bits: [u8; KEY_LENGTH]) -> Self {
        Self { bits }
    }

    /// Raw key material.
    pub fn key_bits(&self) -> &[u8; KEY_LENGTH] {
        &self.bits
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Cryptographic capability injected into the encryption pipeline.
pub trait CryptoProvider: Send + Sync {
    /// Fills `dest` with cryptographically secure random bytes.
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError>;

    /// Derives an AES-256-GCM key from a password and a 32-byte salt.
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<DerivedKey, CryptoError>;

    /// Encrypts with AES-256-GCM and no associated data, returning `ciphertext || tag`.
    fn seal(
        &self,
        key: &DerivedKey,
        iv: &[u8; IV_LENGTH],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// A nonce sequence that uses a single nonce value.
/// Used for one-shot encryption operations.
struct SingleNonce {
    nonce: Option<[u8; IV_LENGTH]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; IV_LENGTH]) -> Self {
        Self {
            nonce: Some(nonce_bytes),
        }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.nonce
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// Implementation of the crypto provider using the `ring` crate.
pub struct RingCryptoProvider {
    rng: SystemRandom,
    kdf: KdfParams,
}

impl RingCryptoProvider {
    /// Creates a provider with the interoperable KDF parameters.
    pub fn new() -> Self {
        Self::with_kdf(KdfParams::v1())
    }

    pub fn with_kdf(kdf: KdfParams) -> Self {
        Self {
            rng: SystemRandom::new(),
            kdf,
        }
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }
}

impl Default for RingCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for RingCryptoProvider {
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        self.rng
            .fill(dest)
            .map_err(|_| CryptoError::RandomGeneration("System RNG unavailable".to_string()))
    }

    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<DerivedKey, CryptoError> {
        if salt.len() != SALT_LENGTH {
            return Err(CryptoError::KeyDerivation(format!(
                "Salt must be {} bytes, got {}",
                SALT_LENGTH,
                salt.len()
            )));
        }

        let mut bits = [0u8; KEY_LENGTH];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.kdf.iterations,
            salt,
            password.as_bytes(),
            &mut bits,
        );

        let key = DerivedKey::from_bits(bits);
        bits.zeroize();
        Ok(key)
    }

    fn seal(
        &self,
        key: &DerivedKey,
        iv: &[u8; IV_LENGTH],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let unbound_key = UnboundKey::new(&AES_256_GCM, key.key_bits())
            .map_err(|_| CryptoError::InvalidKey("Failed to create encryption key".to_string()))?;

        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce::new(*iv));

        // ring appends the auth tag to the buffer
        let mut in_out = plaintext.to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encryption("Encryption operation failed".to_string()))?;

        Ok(in_out)
    }
}
