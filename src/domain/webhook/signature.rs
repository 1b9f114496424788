//! Stripe webhook signature verification.
//!
//! Verifies the `Stripe-Signature` header using HMAC-SHA256 over the exact
//! request bytes and rejects timestamps outside a symmetric tolerance window
//! to limit replays.

use std::fmt;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use super::errors::VerificationError;

type HmacSha256 = Hmac<Sha256>;

/// Stripe's default tolerance between the signed timestamp and now (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Upper bound on the number of secret characters surfaced by [`WebhookSecret::hint`].
const SECRET_HINT_CHARS: usize = 10;

/// The webhook signing secret (`whsec_...`).
///
/// Never printed in full. `Debug` and [`hint`](Self::hint) only show a
/// truncated prefix.
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::new(secret.into()))
    }

    /// Truncated prefix for diagnostics, at most half of the secret.
    pub fn hint(&self) -> String {
        let exposed = self.0.expose_secret();
        let shown = SECRET_HINT_CHARS.min(exposed.chars().count() / 2);
        let prefix: String = exposed.chars().take(shown).collect();
        format!("{}...", prefix)
    }

    fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.0.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }
}

impl From<SecretString> for WebhookSecret {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WebhookSecret").field(&self.hint()).finish()
    }
}

/// Parsed components of the `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp the signature was generated at.
    pub timestamp: i64,
    /// Decoded v1 (HMAC-SHA256) signatures. Never empty.
    pub signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a `Stripe-Signature` header.
    ///
    /// Format: `t=<timestamp>,v1=<hex>[,v1=<hex>...]`. Other schemes such as
    /// the legacy `v0` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::MalformedHeader` when the timestamp is
    /// missing or not an integer, a part has no `=`, a v1 value is not hex,
    /// or there is no v1 entry at all.
    pub fn parse(header: &str) -> Result<Self, VerificationError> {
        let mut timestamp: Option<i64> = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(VerificationError::MalformedHeader("expected key=value pairs"))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| VerificationError::MalformedHeader("invalid timestamp"))?,
                    );
                }
                "v1" => {
                    let signature = hex::decode(value.trim()).map_err(|_| {
                        VerificationError::MalformedHeader("v1 signature is not hex")
                    })?;
                    signatures.push(signature);
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or(VerificationError::MalformedHeader("missing timestamp"))?;
        if signatures.is_empty() {
            return Err(VerificationError::MalformedHeader("no v1 signature"));
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// A payload whose signature has been checked.
///
/// Only [`verify`] and [`verify_at`] construct this type, so anything that
/// requires it as input can only run on authenticated bytes.
#[derive(Clone)]
pub struct VerifiedPayload {
    bytes: Vec<u8>,
    timestamp: i64,
}

impl VerifiedPayload {
    /// The exact bytes that were verified.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The signed timestamp from the header.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl fmt::Debug for VerifiedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedPayload")
            .field("len", &self.bytes.len())
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Verifies `signature_header` against `payload` using the current time.
pub fn verify(
    payload: &[u8],
    signature_header: &str,
    secret: &WebhookSecret,
    tolerance_secs: i64,
) -> Result<VerifiedPayload, VerificationError> {
    verify_at(
        payload,
        signature_header,
        secret,
        tolerance_secs,
        chrono::Utc::now().timestamp(),
    )
}

/// Verifies `signature_header` against `payload` as of `now` (unix seconds).
///
/// # Verification Steps
///
/// 1. Parse the signature header
/// 2. Compute HMAC-SHA256 over `"{timestamp}."` followed by the raw payload
/// 3. Compare against every v1 signature in constant time
/// 4. Require `|now - timestamp| <= tolerance_secs`
///
/// # Errors
///
/// - `MalformedHeader` - header could not be parsed
/// - `SignatureMismatch` - no v1 signature matches
/// - `Stale` - signature is valid but the timestamp is outside the window
pub fn verify_at(
    payload: &[u8],
    signature_header: &str,
    secret: &WebhookSecret,
    tolerance_secs: i64,
    now: i64,
) -> Result<VerifiedPayload, VerificationError> {
    let header = SignatureHeader::parse(signature_header)?;

    let expected = compute_signature(secret, header.timestamp, payload);
    let matched = header
        .signatures
        .iter()
        .fold(Choice::from(0), |acc, candidate| {
            acc | constant_time_eq(&expected, candidate)
        });
    if !bool::from(matched) || secret.is_empty() {
        return Err(VerificationError::SignatureMismatch);
    }

    let tolerance = u64::try_from(tolerance_secs).unwrap_or(0);
    if now.abs_diff(header.timestamp) > tolerance {
        return Err(VerificationError::Stale);
    }

    Ok(VerifiedPayload {
        bytes: payload.to_vec(),
        timestamp: header.timestamp,
    })
}

/// Builds a valid `Stripe-Signature` header for `payload`.
///
/// Used to produce fixtures and to replay captured payloads locally.
pub fn signature_header_for(secret: &WebhookSecret, timestamp: i64, payload: &[u8]) -> String {
    let signature = compute_signature(secret, timestamp, payload);
    format!("t={},v1={}", timestamp, hex::encode(signature))
}

/// Computes the HMAC-SHA256 signature for the given timestamp and payload.
fn compute_signature(secret: &WebhookSecret, timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let mut mac = secret.mac();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time equality. Lengths are public (always 32 bytes for v1).
fn constant_time_eq(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        return Choice::from(0);
    }
    a.ct_eq(b)
}

/// Verifier bound to the process-wide secret and tolerance.
///
/// Cheap to clone; shared by every request.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: Arc<WebhookSecret>,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: Arc<WebhookSecret>, tolerance_secs: i64) -> Self {
        Self {
            secret,
            tolerance_secs,
        }
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    pub fn secret_hint(&self) -> String {
        self.secret.hint()
    }

    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<VerifiedPayload, VerificationError> {
        verify(payload, signature_header, &self.secret, self.tolerance_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";
    const NOW: i64 = 1_704_067_200;

    fn secret() -> WebhookSecret {
        WebhookSecret::new(TEST_SECRET)
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_single_v1() {
        let header_str = format!("t=1234567890,v1={}", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.signatures.len(), 1);
        assert_eq!(header.signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_every_v1() {
        let header_str = format!("t=1,v1={},v1={}", "a".repeat(64), "b".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.signatures.len(), 2);
    }

    #[test]
    fn parse_header_ignores_v0_and_unknown_schemes() {
        let header_str = format!("t=1,v0={},v1={},scheme=future", "b".repeat(64), "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.signatures, vec![vec![0xaa; 32]]);
    }

    #[test]
    fn parse_header_tolerates_whitespace() {
        let header_str = format!("t = 42 , v1 = {}", "c".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 42);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let header_str = format!("v1={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert_eq!(
            result,
            Err(VerificationError::MalformedHeader("missing timestamp"))
        );
    }

    #[test]
    fn parse_header_without_v1_fails() {
        let header_str = format!("t=1234567890,v0={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert_eq!(
            result,
            Err(VerificationError::MalformedHeader("no v1 signature"))
        );
    }

    #[test]
    fn parse_header_invalid_timestamp_fails() {
        let header_str = format!("t=not_a_number,v1={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_non_hex_signature_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_without_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    #[test]
    fn parse_empty_header_fails() {
        let result = SignatureHeader::parse("");

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature_returns_exact_bytes() {
        let payload = br#"{"id":"evt_test123","type":"checkout.session.completed"}"#;
        let header = signature_header_for(&secret(), NOW, payload);

        let verified = verify_at(payload, &header, &secret(), 300, NOW).unwrap();

        assert_eq!(verified.as_bytes(), payload);
        assert_eq!(verified.timestamp(), NOW);
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let payload = br#"{"id":"evt_test"}"#;
        let header = signature_header_for(&WebhookSecret::new("whsec_other"), NOW, payload);

        let result = verify_at(payload, &header, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let header = signature_header_for(&secret(), NOW, br#"{"id":"evt_test"}"#);

        let result = verify_at(br#"{"id":"evt_hacked"}"#, &header, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn verify_tampered_timestamp_fails() {
        let payload = br#"{"id":"evt_test"}"#;
        let header = signature_header_for(&secret(), NOW, payload);
        let forged = header.replacen(&format!("t={}", NOW), &format!("t={}", NOW + 1), 1);

        let result = verify_at(payload, &forged, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn verify_accepts_any_matching_v1_entry() {
        let payload = br#"{"id":"evt_rotation"}"#;
        let valid = signature_header_for(&secret(), NOW, payload);
        let valid_sig = valid.split_once("v1=").unwrap().1;
        let header = format!("t={},v1={},v1={}", NOW, "0".repeat(64), valid_sig);

        let result = verify_at(payload, &header, &secret(), 300, NOW);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_short_signature_is_mismatch() {
        let header = format!("t={},v1=abcd", NOW);

        let result = verify_at(b"{}", &header, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn verify_covers_non_utf8_bytes() {
        let payload = [0xff, 0xfe, b'{', b'}', 0x80];
        let header = signature_header_for(&secret(), NOW, &payload);

        let verified = verify_at(&payload, &header, &secret(), 300, NOW).unwrap();
        assert_eq!(verified.as_bytes(), &payload);

        let altered = [0xff, 0xfd, b'{', b'}', 0x80];
        let result = verify_at(&altered, &header, &secret(), 300, NOW);
        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn verify_rejects_empty_secret() {
        let empty = WebhookSecret::new("");
        let header = signature_header_for(&empty, NOW, b"{}");

        let result = verify_at(b"{}", &header, &empty, 300, NOW);

        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    // ══════════════════════════════════════════════════════════════
    // Tolerance Window Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_timestamp_at_boundary_succeeds() {
        let header = signature_header_for(&secret(), NOW - 300, b"{}");

        let result = verify_at(b"{}", &header, &secret(), 300, NOW);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_timestamp_just_past_boundary_is_stale() {
        let header = signature_header_for(&secret(), NOW - 301, b"{}");

        let result = verify_at(b"{}", &header, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::Stale)));
    }

    #[test]
    fn verify_timestamp_from_future_beyond_tolerance_is_stale() {
        let header = signature_header_for(&secret(), NOW + 301, b"{}");

        let result = verify_at(b"{}", &header, &secret(), 300, NOW);

        assert!(matches!(result, Err(VerificationError::Stale)));
    }

    #[test]
    fn verify_timestamp_slightly_in_future_succeeds() {
        let header = signature_header_for(&secret(), NOW + 30, b"{}");

        let result = verify_at(b"{}", &header, &secret(), 300, NOW);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_extreme_timestamp_is_stale_without_overflow() {
        let header = signature_header_for(&secret(), i64::MIN, b"{}");

        let result = verify_at(b"{}", &header, &secret(), 300, i64::MAX);

        assert!(matches!(result, Err(VerificationError::Stale)));
    }

    #[test]
    fn verify_with_current_clock() {
        let now = chrono::Utc::now().timestamp();
        let header = signature_header_for(&secret(), now, b"{}");

        assert!(verify(b"{}", &header, &secret(), DEFAULT_TOLERANCE_SECS).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Secret Handling Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn hint_shows_truncated_prefix_only() {
        let hint = secret().hint();

        assert_eq!(hint, "whsec_test...");
        assert!(!hint.contains("12345"));
    }

    #[test]
    fn hint_never_reveals_more_than_half_of_short_secret() {
        let hint = WebhookSecret::new("abcd").hint();

        assert_eq!(hint, "ab...");
    }

    #[test]
    fn debug_output_is_redacted() {
        let debug = format!("{:?}", secret());

        assert!(!debug.contains(TEST_SECRET));
        assert!(debug.contains("whsec_test..."));
    }

    #[test]
    fn verifier_delegates_with_configured_tolerance() {
        let verifier = WebhookVerifier::new(Arc::new(secret()), 60);
        let now = chrono::Utc::now().timestamp();
        let fresh = signature_header_for(&secret(), now, b"{}");
        let old = signature_header_for(&secret(), now - 120, b"{}");

        assert!(verifier.verify(b"{}", &fresh).is_ok());
        assert!(matches!(
            verifier.verify(b"{}", &old),
            Err(VerificationError::Stale)
        ));
        assert_eq!(verifier.tolerance_secs(), 60);
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn signed_payload_always_verifies(
            payload in proptest::collection::vec(any::<u8>(), 0..512),
            key in "[a-zA-Z0-9_]{1,40}",
            skew in -300i64..=300,
        ) {
            let secret = WebhookSecret::new(key);
            let header = signature_header_for(&secret, NOW + skew, &payload);

            let verified = verify_at(&payload, &header, &secret, 300, NOW).unwrap();

            prop_assert_eq!(verified.as_bytes(), payload.as_slice());
        }

        #[test]
        fn flipped_signature_byte_is_mismatch(
            payload in proptest::collection::vec(any::<u8>(), 0..256),
            index in 0usize..32,
            mask in 1u8..=255,
        ) {
            let secret = secret();
            let mut signature = compute_signature(&secret, NOW, &payload);
            signature[index] ^= mask;
            let header = format!("t={},v1={}", NOW, hex::encode(signature));

            let result = verify_at(&payload, &header, &secret, 300, NOW);

            prop_assert_eq!(result.map(|_| ()), Err(VerificationError::SignatureMismatch));
        }
    }
}
