//! Session Token Signing
//!
//! Cookie tokens are `<session uuid>.<base64url HMAC-SHA256 signature>`.
//! Verification happens before any store lookup, so forged tokens never
//! reach the session repository.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{MembershipError, MembershipResult};

/// Generate a signed session token for a session ID
pub(crate) fn generate_session_token(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Parse and verify a session token, returning the session ID
pub(crate) fn verify_session_token(token: &str, secret: &[u8; 32]) -> MembershipResult<Uuid> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(MembershipError::SessionInvalid);
    }

    let session_id_str = parts[0];
    let signature_b64 = parts[1];

    // Verify signature
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| MembershipError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| MembershipError::SessionInvalid)?;

    // Parse UUID
    session_id_str
        .parse()
        .map_err(|_| MembershipError::SessionInvalid)
}
