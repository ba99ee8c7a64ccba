//! Request principal and the signed session cookie codec.
//!
//! The session is a typed value, not an ambient dictionary: handlers
//! receive the decoded `Principal` and pass it explicitly into core
//! operations. Cookie format: `<payload-b64>.<hmac-b64>` where the
//! payload is the JSON-encoded principal and the MAC is HMAC-SHA256
//! under the process secret key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "medibook_session";

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session cookie")]
    Malformed,
    #[error("session signature mismatch")]
    BadSignature,
}

/// Encode a principal into a signed cookie value.
pub fn encode(principal: &Principal, secret: &str) -> String {
    let json = serde_json::to_vec(principal).expect("principal always serializes");
    let payload = URL_SAFE_NO_PAD.encode(json);
    let sig = sign(&payload, secret);
    format!("{payload}.{sig}")
}

/// Decode and verify a cookie value. The signature is checked in
/// constant time before the payload is parsed.
pub fn decode(value: &str, secret: &str) -> Result<Principal, SessionError> {
    let (payload, sig) = value.rsplit_once('.').ok_or(SessionError::Malformed)?;
    let expected = sign(payload, secret);
    if !bool::from(sig.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(SessionError::BadSignature);
    }
    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| SessionError::Malformed)?;
    serde_json::from_slice(&raw).map_err(|_| SessionError::Malformed)
}

fn sign(payload: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}
