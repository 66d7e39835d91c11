//! Webhook signature verification (HMAC-SHA256, `X-Hub-Signature-256`).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a `sha256=<hex>` signature header against the raw request body.
///
/// No configured secret means verification is skipped entirely; this is the
/// explicit insecure-by-default mode. With a secret, a missing or malformed
/// header always fails.
pub fn verify_signature(secret: Option<&str>, body: &[u8], header: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    let Some(header) = header else {
        return false;
    };
    let Some(hex_digest) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    // Constant-time comparison
    mac.verify_slice(&expected).is_ok()
}

/// Produces the `sha256=<hex>` header value for a body, the counterpart of
/// `verify_signature`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
