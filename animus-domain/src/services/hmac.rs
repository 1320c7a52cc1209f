// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HMAC-SHA256 signing and constant-time verification, used for gateway
//! header auth and run-token signatures alike.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::GovernanceError;

type HmacSha256 = Hmac<Sha256>;

/// Signs `message` under `secret`, returning `base64url(no-pad)` of the raw
/// HMAC-SHA256 tag.
pub fn hmac_sign(secret: &[u8], message: &[u8]) -> Result<String, GovernanceError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| GovernanceError::internal(e.to_string()))?;
    mac.update(message);
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Constant-time verification of a `base64url(no-pad)`-encoded signature.
pub fn hmac_verify(secret: &[u8], message: &[u8], signature: &str) -> Result<bool, GovernanceError> {
    let expected = hmac_sign(secret, message)?;
    let decoded_expected =
        URL_SAFE_NO_PAD.decode(&expected).map_err(|e| GovernanceError::internal(e.to_string()))?;
    let decoded_actual = match URL_SAFE_NO_PAD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };
    Ok(decoded_expected.ct_eq(&decoded_actual).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrips() {
        let sig = hmac_sign(b"secret", b"hello").unwrap();
        assert!(hmac_verify(b"secret", b"hello", &sig).unwrap());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let sig = hmac_sign(b"secret", b"hello").unwrap();
        assert!(!hmac_verify(b"secret", b"goodbye", &sig).unwrap());
    }

    #[test]
    fn malformed_signature_is_rejected_not_errored() {
        assert!(!hmac_verify(b"secret", b"hello", "not-base64!!").unwrap());
    }
}
