//! Stripe webhook signature verification and label-only event dispatch.
//!
//! Verification follows the provider's scheme: the `Stripe-Signature` header
//! carries a unix timestamp `t` and one or more `v1` HMAC-SHA256 digests of
//! `"{t}.{raw_payload}"` keyed by the shared endpoint secret.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Signatures older than this are rejected even when the digest matches.
pub const SIGNATURE_TOLERANCE: Duration = Duration::from_secs(300);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("webhook endpoint secret is not configured")]
    MissingSecret,
    #[error("signature header is missing a timestamp")]
    MissingTimestamp,
    #[error("signature header carries no v1 signature")]
    MissingSignature,
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,
    #[error("no v1 signature matches the payload")]
    Mismatch,
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 || !value.is_ascii() {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&value[i..i + 2], 16).ok())
        .collect()
}

/// Verify `header` against the raw request body.
///
/// `now` is the verifier's unix time; callers outside tests pass the current
/// time. Comparison against each `v1` candidate is constant-time via the MAC
/// itself.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance: Duration,
) -> Result<(), SignatureError> {
    // An empty key would let anyone forge signatures; treat it as
    // no-secret-configured and reject everything.
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }

    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Some(bytes) = decode_hex(value) {
                    candidates.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    if candidates.is_empty() {
        return Err(SignatureError::MissingSignature);
    }
    if (now - timestamp).unsigned_abs() > tolerance.as_secs() {
        return Err(SignatureError::StaleTimestamp);
    }

    for candidate in &candidates {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("hmac accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(candidate).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Route a verified event by its type label.
///
/// Intentionally log-only: the hosted flow keeps no server-side subscription
/// state, so each branch records the event and mutates nothing. Returns the
/// label that was handled, for observability and tests.
pub fn dispatch_event(event: &Value) -> &str {
    let kind = event["type"].as_str().unwrap_or_default();
    let object_id = event
        .pointer("/data/object/id")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match kind {
        "customer.subscription.created" => {
            info!(%object_id, "subscription created");
        }
        "customer.subscription.updated" => {
            info!(%object_id, "subscription updated");
        }
        "customer.subscription.deleted" => {
            info!(%object_id, "subscription deleted");
        }
        "invoice.payment_succeeded" => {
            info!(%object_id, "invoice payment succeeded");
        }
        "invoice.payment_failed" => {
            info!(%object_id, "invoice payment failed");
        }
        other => {
            warn!(event_type = %other, "unhandled webhook event type");
        }
    }

    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64, secret: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let digest = mac.finalize().into_bytes();
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        format!("t={timestamp},v1={hex}")
    }

    #[test]
    fn accepts_a_valid_signature() {
        let payload = br#"{"type":"invoice.payment_succeeded"}"#;
        let header = sign(payload, 1_700_000_000, SECRET);
        assert_eq!(
            verify_signature(payload, &header, SECRET, 1_700_000_010, SIGNATURE_TOLERANCE),
            Ok(())
        );
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let header = sign(br#"{"amount":100}"#, 1_700_000_000, SECRET);
        assert_eq!(
            verify_signature(
                br#"{"amount":999}"#,
                &header,
                SECRET,
                1_700_000_010,
                SIGNATURE_TOLERANCE
            ),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_a_wrong_secret() {
        let payload = br#"{"type":"x"}"#;
        let header = sign(payload, 1_700_000_000, "whsec_other");
        assert_eq!(
            verify_signature(payload, &header, SECRET, 1_700_000_010, SIGNATURE_TOLERANCE),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let payload = br#"{}"#;
        let header = sign(payload, 1_700_000_000, SECRET);
        assert_eq!(
            verify_signature(payload, &header, SECRET, 1_700_001_000, SIGNATURE_TOLERANCE),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn rejects_everything_when_no_secret_is_configured() {
        let payload = br#"{"type":"x"}"#;
        // Even a digest honestly computed over the empty key must not pass.
        let header = sign(payload, 1_700_000_000, "");
        assert_eq!(
            verify_signature(payload, &header, "", 1_700_000_000, SIGNATURE_TOLERANCE),
            Err(SignatureError::MissingSecret)
        );
    }

    #[test]
    fn rejects_headers_without_signature_material() {
        assert_eq!(
            verify_signature(b"{}", "v1=00", SECRET, 0, SIGNATURE_TOLERANCE),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            verify_signature(b"{}", "t=100", SECRET, 100, SIGNATURE_TOLERANCE),
            Err(SignatureError::MissingSignature)
        );
    }

    #[test]
    fn accepts_any_matching_v1_among_several() {
        let payload = br#"{"ok":true}"#;
        let valid = sign(payload, 1_700_000_000, SECRET);
        let digest = valid.split("v1=").nth(1).expect("digest present");
        let header = format!("t=1700000000,v1=deadbeef,v1={digest}");
        assert_eq!(
            verify_signature(payload, &header, SECRET, 1_700_000_000, SIGNATURE_TOLERANCE),
            Ok(())
        );
    }

    #[test]
    fn dispatch_reports_the_event_label() {
        let event = json!({
            "type": "customer.subscription.deleted",
            "data": { "object": { "id": "sub_123" } }
        });
        assert_eq!(dispatch_event(&event), "customer.subscription.deleted");
        assert_eq!(dispatch_event(&json!({ "type": "price.created" })), "price.created");
    }
}
