use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{BotError, BotResult};

type HmacSha256 = Hmac<Sha256>;

/// Base64 HMAC-SHA256 of `body` keyed with the channel secret, as sent by LINE
/// in `x-line-signature`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take any size key");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

pub fn check_signature(secret: &str, body: &[u8], signature: Option<&str>) -> BotResult<()> {
    let signature = signature.ok_or(BotError::MissingSignature)?;
    if verify_signature(secret, body, signature) {
        Ok(())
    } else {
        Err(BotError::InvalidSignature)
    }
}
