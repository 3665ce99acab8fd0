// SPDX-License-Identifier: MIT

//! Signed-cookie session tokens. A single process-wide secret is
//! generated at startup; tokens are an HMAC-SHA256 MAC over an expiry
//! timestamp, base64-encoded for cookie transport. There is no session
//! store and no renewal — a token is either valid and unexpired, or the
//! caller re-authenticates with the password.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_COOKIE_NAME: &str = "token";
const TOKEN_LIFETIME: Duration = Duration::minutes(15);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Process-wide signing secret, generated once at startup.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Issue a token valid for [`TOKEN_LIFETIME`] from `now`.
    pub fn issue(&self, now: DateTime<Utc>) -> String {
        let expires_at = (now + TOKEN_LIFETIME).timestamp();
        self.sign(expires_at)
    }

    fn sign(&self, expires_at: i64) -> String {
        let payload = expires_at.to_string();
        #[allow(clippy::expect_used)]
        let mut mac = HmacSha256::new_from_slice(&self.0).expect("hmac accepts any key length");
        mac.update(payload.as_bytes());
        let sig = mac.finalize().into_bytes();
        let encoded_sig = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(sig);
        format!("{payload}.{encoded_sig}")
    }

    /// Verify a token presented by a client, against `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<(), TokenError> {
        let (payload, sig) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let expires_at: i64 = payload.parse().map_err(|_| TokenError::Malformed)?;
        let expected_sig = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(sig)
            .map_err(|_| TokenError::Malformed)?;

        #[allow(clippy::expect_used)]
        let mut mac = HmacSha256::new_from_slice(&self.0).expect("hmac accepts any key length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected_sig).map_err(|_| TokenError::BadSignature)?;

        if now.timestamp() > expires_at {
            return Err(TokenError::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
