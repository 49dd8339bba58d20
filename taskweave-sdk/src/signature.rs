//! Webhook signature verification.
//!
//! The task service signs every webhook delivery with HMAC-SHA256 over the
//! raw request body, keyed by the per-channel shared secret, and sends the
//! lowercase hex digest in the `x-signature` header:
//!
//! ```text
//! x-signature: hex(HMAC-SHA256(raw_body, channel_secret))
//! ```
//!
//! Verification recomputes the digest and compares it for exact equality
//! with the provided header value. The digest comparison is plain equality;
//! the upstream threat model does not require a constant-time compare.

/// Header name carrying the webhook HMAC signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Compute the lowercase hex HMAC-SHA256 digest of `raw_body` under `secret`.
pub fn sign_body(raw_body: &[u8], secret: &[u8]) -> String {
    let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret);
    let tag = ring::hmac::sign(&key, raw_body);
    hex::encode(tag.as_ref())
}

/// Verify that `provided` is the hex HMAC-SHA256 digest of `raw_body` under
/// `secret`.
///
/// Returns `false` for any mismatch, including a digest of the wrong length
/// or casing.
pub fn verify_signature(raw_body: &[u8], provided: &str, secret: &[u8]) -> bool {
    sign_body(raw_body, secret) == provided
}
