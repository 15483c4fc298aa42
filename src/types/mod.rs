// Secure-QR shared type definitions
// Each submodule defines types used across the services.

pub mod config;
pub mod errors;
pub mod payload;
pub mod secure_qr;
