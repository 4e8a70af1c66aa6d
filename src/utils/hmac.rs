//! HMAC-SHA256 signing of administrative requests.
//!
//! The signed message is `{timestamp}.{payload}`, where the payload is the
//! [`canonical_request`] of method, path with query, and raw body. The
//! signature travels hex encoded in `X-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while signing or checking a signature
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid secret key")]
    InvalidKey,

    #[error("signature is not valid hex")]
    Malformed,

    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

fn keyed(secret: &str, payload: &str, timestamp: u64) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(format!("{timestamp}.{payload}").as_bytes());
    Ok(mac)
}

/// Payload covering everything that selects what an admin request does
pub fn canonical_request(method: &str, path_and_query: &str, body: &str) -> String {
    format!("{method} {path_and_query}\n{body}")
}

/// Equality check whose timing does not depend on where the inputs differ
pub fn constant_time_eq(expected: &str, candidate: &str) -> bool {
    let (Ok(expected), Ok(candidate)) = (
        keyed("compare", expected, 0),
        keyed("compare", candidate, 0),
    ) else {
        return false;
    };
    candidate
        .verify_slice(&expected.finalize().into_bytes())
        .is_ok()
}

/// Current Unix time in seconds
pub fn unix_now() -> Result<u64, SignatureError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Hex encoded signature of `payload` at `timestamp`
pub fn generate_signature(
    secret: &str,
    payload: &str,
    timestamp: u64,
) -> Result<String, SignatureError> {
    let mac = keyed(secret, payload, timestamp)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a signature and its timestamp against the allowed clock skew
///
/// Returns `Ok(false)` for a stale timestamp or a wrong signature.
pub fn validate_signature(
    secret: &str,
    payload: &str,
    timestamp: u64,
    signature: &str,
    tolerance_seconds: u64,
) -> Result<bool, SignatureError> {
    if unix_now()?.abs_diff(timestamp) > tolerance_seconds {
        return Ok(false);
    }

    let signature = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;
    // verify_slice compares in constant time
    Ok(keyed(secret, payload, timestamp)?
        .verify_slice(&signature)
        .is_ok())
}
