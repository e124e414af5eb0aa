use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

use crate::error::AppError;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Interaction payloads are small; anything bigger is not from Discord.
const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum PublicKeyError {
    #[error("public key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("public key must be 32 bytes, got {0}")]
    Length(usize),
    #[error("public key is not a valid Ed25519 point: {0}")]
    Point(#[from] ed25519_dalek::SignatureError),
}

/// Checks the Ed25519 signature Discord puts on every interaction request.
///
/// The signed message is the `X-Signature-Timestamp` header value followed
/// by the raw request body.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    pub fn from_hex(public_key: &str) -> Result<Self, PublicKeyError> {
        let bytes = hex::decode(public_key.trim())?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PublicKeyError::Length(bytes.len()))?;
        Ok(InteractionVerifier {
            key: VerifyingKey::from_bytes(&bytes)?,
        })
    }

    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> bool {
        let Ok(sig_bytes) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key.verify(&message, &signature).is_ok()
    }
}

/// Axum middleware rejecting any request whose signature does not verify.
///
/// The body is buffered to check it, then handed on unchanged.
pub async fn verify_signature(
    State(app): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::bad_request(format!("unreadable body: {e}")))?;

    let header = |name: &str| parts.headers.get(name).and_then(|h| h.to_str().ok());
    let (Some(signature), Some(timestamp)) = (header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER))
    else {
        tracing::warn!("interaction request without signature headers");
        return Err(AppError::unauthorized("missing request signature"));
    };

    if !app.verifier.verify(timestamp, &bytes, signature) {
        tracing::warn!("invalid interaction signature");
        return Err(AppError::unauthorized("invalid request signature"));
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair() -> (SigningKey, InteractionVerifier) {
        let signing = SigningKey::from_bytes(&[7u8; 32]);
        let public_key = hex::encode(signing.verifying_key().as_bytes());
        let verifier = InteractionVerifier::from_hex(&public_key).unwrap();
        (signing, verifier)
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut msg = timestamp.as_bytes().to_vec();
        msg.extend_from_slice(body);
        hex::encode(key.sign(&msg).to_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let (key, verifier) = keypair();
        let body = br#"{"type":1}"#;
        let sig = sign(&key, "1700000000", body);
        assert!(verifier.verify("1700000000", body, &sig));
    }

    #[test]
    fn rejects_tampered_body() {
        let (key, verifier) = keypair();
        let sig = sign(&key, "1700000000", br#"{"type":1}"#);
        assert!(!verifier.verify("1700000000", br#"{"type":2}"#, &sig));
    }

    #[test]
    fn rejects_other_timestamp() {
        let (key, verifier) = keypair();
        let body = br#"{"type":1}"#;
        let sig = sign(&key, "1700000000", body);
        assert!(!verifier.verify("1700000001", body, &sig));
    }

    #[test]
    fn rejects_garbage_signature() {
        let (_, verifier) = keypair();
        assert!(!verifier.verify("1", b"{}", "zz"));
        assert!(!verifier.verify("1", b"{}", "abcd"));
    }

    #[test]
    fn bad_public_keys() {
        assert!(matches!(
            InteractionVerifier::from_hex("not hex"),
            Err(PublicKeyError::Hex(_))
        ));
        assert!(matches!(
            InteractionVerifier::from_hex("abcd"),
            Err(PublicKeyError::Length(2))
        ));
    }
}
