// Secure-QR services
// Key derivation, the encryption codec, the hosting upload client and the orchestrator.

pub mod crypto_service;
pub mod encryption;
pub mod secure_qr;
pub mod upload_client;
