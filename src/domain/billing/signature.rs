//! Webhook signature checks for both payment providers.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Stripe's default replay window
pub const STRIPE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("No signatures found matching the expected signature for payload")]
    Mismatch,
    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,
    #[error("Timestamp outside the tolerance zone")]
    Expired,
}

fn mac(secret: &str) -> Option<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes()).ok()
}

/// LemonSqueezy: hex HMAC-SHA256 of the raw body in `X-Signature`
pub fn verify_lemon_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Some(mut mac) = mac(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[derive(Debug, PartialEq, Eq)]
struct StripeSignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_stripe_header(header: &str) -> Result<StripeSignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(StripeSignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(SignatureError::MalformedHeader),
    }
}

/// Stripe: `Stripe-Signature: t=<unix>,v1=<hex>` signing `"{t}.{body}"`.
/// Any matching `v1` entry is accepted.
pub fn verify_stripe_signature(
    secret: &str,
    body: &[u8],
    header: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let parsed = parse_stripe_header(header)?;

    let mut signed = mac(secret).ok_or(SignatureError::Mismatch)?;
    signed.update(parsed.timestamp.to_string().as_bytes());
    signed.update(b".");
    signed.update(body);

    let matches = parsed
        .signatures
        .iter()
        .any(|candidate| signed.clone().verify_slice(candidate).is_ok());
    if !matches {
        return Err(SignatureError::Mismatch);
    }

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::Expired);
    }

    Ok(())
}
