//! Integration tests for the secure QR generation pipeline.
//!
//! The uploader is an in-process fake, so every test can inspect exactly what
//! would have been sent to the hosting service.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{
    decrypt_frame, fast_provider, BrokenRandomProvider, RecordingUploader, ScriptedProvider,
    TEST_ITERATIONS,
};
use secureqr::types::errors::{CryptoError, SecureQrErrorKind, UploadError, ValidationError};
use secureqr::types::payload::{IV_LENGTH, SALT_LENGTH, TAG_LENGTH};
use secureqr::{Expiration, SecureQrGenerator, SecureQrRequest};

const BASE: &str = "https://share.example";

fn generator_with(uploader: Arc<RecordingUploader>) -> SecureQrGenerator {
    SecureQrGenerator::new(Arc::new(fast_provider()), uploader, BASE)
}

fn known_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    for (i, b) in salt.iter_mut().enumerate() {
        *b = i as u8;
    }
    salt
}

#[tokio::test]
async fn test_empty_content_rejected_without_upload() {
    let uploader = RecordingUploader::returning("text_never");
    let generator = generator_with(uploader.clone());

    let err = generator
        .generate(&SecureQrRequest::new("", "validpass"))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SecureQrErrorKind::Validation(ValidationError::ContentEmpty)
    );
    assert_eq!(uploader.call_count(), 0);
}

#[tokio::test]
async fn test_short_password_rejected_without_upload() {
    let uploader = RecordingUploader::returning("text_never");
    let generator = generator_with(uploader.clone());

    for password in ["", "ab", "abc"] {
        let err = generator
            .generate(&SecureQrRequest::new("hi", password))
            .await
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            SecureQrErrorKind::Validation(ValidationError::PasswordTooShort { min: 4 })
        ));
    }
    assert_eq!(uploader.call_count(), 0);
}

#[tokio::test]
async fn test_validation_error_message_is_prefixed() {
    let generator = generator_with(RecordingUploader::returning("x"));
    let err = generator
        .generate(&SecureQrRequest::new("   ", "validpass"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Secure QR code generation failed: Content cannot be empty"
    );
}

#[tokio::test]
async fn test_url_carries_salt_in_fragment() {
    let uploader = RecordingUploader::returning("text_abc123");
    let generator = SecureQrGenerator::new(
        Arc::new(ScriptedProvider::with_salt(known_salt())),
        uploader.clone(),
        BASE,
    );

    let result = generator
        .generate(&SecureQrRequest::new("hello", "password"))
        .await
        .unwrap();

    assert_eq!(
        result.url,
        "https://share.example/send/text_abc123#AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8"
    );
    let fragment = result.url.split('#').nth(1).unwrap();
    assert!(!fragment.contains(['+', '/', '=']));
    assert_eq!(uploader.calls()[0].salt, known_salt().to_vec());
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let uploader = RecordingUploader::returning("text_xyz");
    let generator = generator_with(uploader.clone());

    let request = SecureQrRequest::new("secret note", "longpassword1")
        .with_expiration(Expiration::OneHour)
        .with_downloads(3);
    let result = generator.generate(&request).await.unwrap();

    let prefix = "https://share.example/send/text_xyz#";
    assert!(result.url.starts_with(prefix));
    let fragment = &result.url[prefix.len()..];
    assert!((18..=44).contains(&fragment.len()));
    assert!(fragment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    assert_eq!(result.name.len(), 8);
    assert!(result.name.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    assert_eq!(result.expiration, Expiration::OneHour);
    assert_eq!(result.downloads, 3);

    let calls = uploader.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].expiration, Expiration::OneHour);
    assert_eq!(calls[0].downloads, 3);
}

#[tokio::test]
async fn test_defaults_are_thirty_minutes_and_one_download() {
    let uploader = RecordingUploader::returning("text_d");
    let generator = generator_with(uploader.clone());

    let result = generator
        .generate(&SecureQrRequest::new("content", "password"))
        .await
        .unwrap();

    assert_eq!(result.expiration, Expiration::ThirtyMinutes);
    assert_eq!(result.downloads, 1);
    assert_eq!(uploader.calls()[0].expiration.as_str(), "30m");
}

#[tokio::test]
async fn test_upload_payload_shape() {
    let uploader = RecordingUploader::returning("text_shape");
    let generator = generator_with(uploader.clone());
    let content = "ünïcode content";

    generator
        .generate(&SecureQrRequest::new(content, "password"))
        .await
        .unwrap();

    let payload = &uploader.calls()[0];
    assert_eq!(payload.size, content.len() + IV_LENGTH + TAG_LENGTH);
    assert_eq!(payload.size, payload.text.len());

    let json = serde_json::to_value(payload).unwrap();
    let salt = json["salt"].as_array().unwrap();
    assert_eq!(salt.len(), SALT_LENGTH);
    assert!(salt.iter().all(|v| v.as_u64().is_some_and(|n| n <= 255)));
    assert!(json["text"].is_array());
}

#[tokio::test]
async fn test_uploaded_blobs_decrypt_with_password_and_salt() {
    let uploader = RecordingUploader::returning("text_rt");
    let generator = generator_with(uploader.clone());

    let result = generator
        .generate(&SecureQrRequest::new("secret note", "longpassword1"))
        .await
        .unwrap();

    let payload = &uploader.calls()[0];
    let content = decrypt_frame(&payload.text, "longpassword1", &payload.salt, TEST_ITERATIONS)
        .expect("content must decrypt");
    assert_eq!(content, b"secret note");

    let name_frame = hex::decode(&payload.name).unwrap();
    let name = decrypt_frame(&name_frame, "longpassword1", &payload.salt, TEST_ITERATIONS)
        .expect("name must decrypt");
    assert_eq!(String::from_utf8(name).unwrap(), result.name);

    // The plaintext name never leaves the process.
    assert_ne!(payload.name, result.name);
    assert!(decrypt_frame(&payload.text, "wrongpassword", &payload.salt, TEST_ITERATIONS).is_none());
}

#[tokio::test]
async fn test_name_and_content_never_share_an_iv() {
    let uploader = RecordingUploader::returning("text_iv");
    let generator = generator_with(uploader.clone());

    for _ in 0..50 {
        generator
            .generate(&SecureQrRequest::new("same content", "password"))
            .await
            .unwrap();
    }

    let calls = uploader.calls();
    assert_eq!(calls.len(), 50);
    for payload in &calls {
        let name_frame = hex::decode(&payload.name).unwrap();
        assert_ne!(&name_frame[..IV_LENGTH], &payload.text[..IV_LENGTH]);
    }
    assert_ne!(calls[0].salt, calls[1].salt);
}

#[tokio::test]
async fn test_concurrent_calls_use_independent_randomness() {
    let uploader = RecordingUploader::returning("text_c");
    let generator = generator_with(uploader.clone());
    let request = SecureQrRequest::new("parallel", "password");

    let (a, b) = tokio::join!(generator.generate(&request), generator.generate(&request));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.url, b.url);
    let calls = uploader.calls();
    assert_ne!(calls[0].salt, calls[1].salt);
    assert_ne!(calls[0].text, calls[1].text);
}

#[tokio::test]
async fn test_upload_failure_is_wrapped() {
    let uploader = RecordingUploader::failing(UploadError::Status {
        status: 500,
        body: "boom".to_string(),
    });
    let generator = generator_with(uploader.clone());

    let err = generator
        .generate(&SecureQrRequest::new("content", "password"))
        .await
        .unwrap_err();

    assert_eq!(uploader.call_count(), 1);
    assert!(matches!(err.kind(), SecureQrErrorKind::Upload(UploadError::Status { status: 500, .. })));
    assert_eq!(
        err.to_string(),
        "Secure QR code generation failed: Upload API error (500): boom"
    );
}

#[tokio::test]
async fn test_crypto_failure_stops_before_upload() {
    let uploader = RecordingUploader::returning("text_never");
    let generator = SecureQrGenerator::new(Arc::new(BrokenRandomProvider), uploader.clone(), BASE);

    let err = generator
        .generate(&SecureQrRequest::new("content", "password"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        SecureQrErrorKind::Crypto(CryptoError::RandomGeneration(_))
    ));
    assert_eq!(uploader.call_count(), 0);
}

#[tokio::test]
async fn test_request_deserializes_with_defaults() {
    let request: SecureQrRequest =
        serde_json::from_str(r#"{"content":"hi","password":"secret"}"#).unwrap();
    assert_eq!(request.expiration, Expiration::ThirtyMinutes);
    assert_eq!(request.downloads, 1);

    let request: SecureQrRequest = serde_json::from_str(
        r#"{"content":"hi","password":"secret","expiration":"1d","downloads":7}"#,
    )
    .unwrap();
    assert_eq!(request.expiration, Expiration::OneDay);
    assert_eq!(request.downloads, 7);
}
