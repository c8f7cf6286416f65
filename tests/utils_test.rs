use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{TimeZone, Utc};
use spotdash::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    assert_eq!(verifier.len(), 128);
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(verifier, generate_code_verifier());
}

#[test]
fn test_generate_code_challenge() {
    // RFC 7636 appendix B
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );

    let challenge = generate_code_challenge(&generate_code_verifier());
    assert_eq!(challenge.len(), 43);
    assert!(!challenge.contains('='));
    assert!(!challenge.contains('+'));
    assert!(!challenge.contains('/'));
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_basic_auth() {
    let header = basic_auth("client", "s3cret");

    let encoded = header.strip_prefix("Basic ").unwrap();
    let decoded = STANDARD.decode(encoded).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "client:s3cret");
}

#[test]
fn test_expires_at_millis() {
    assert_eq!(expires_at_millis(1_000, 3600), 3_601_000);
    assert_eq!(expires_at_millis(1_000, 0), 1_000);
    assert_eq!(expires_at_millis(i64::MAX - 10, 3600), i64::MAX);
}

#[test]
fn test_now_millis_is_current() {
    let before = Utc::now().timestamp_millis();
    let now = now_millis();
    let after = Utc::now().timestamp_millis();

    assert!(before <= now && now <= after);
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(9_999), "0:09");
    assert_eq!(format_duration(215_000), "3:35");
    assert_eq!(format_duration(3_600_000), "1:00:00");
    assert_eq!(format_duration(3_725_000), "1:02:05");
}

#[test]
fn test_format_receipt_date() {
    let date = Utc.with_ymd_and_hms(2024, 12, 5, 23, 59, 0).unwrap();
    assert_eq!(format_receipt_date(date), "05/12/2024");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("a longer title", 8), "a longe…");
    assert_eq!(truncate("a longer title", 8).chars().count(), 8);
    assert_eq!(truncate("Björk – Jóga", 6), "Björk…");
}
