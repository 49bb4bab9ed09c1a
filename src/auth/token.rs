//! Signed bearer tokens
//!
//! Token layout: `base64url(claims_json) "." base64url(HMAC-SHA256(claims_b64))`.
//! Tokens carry their own expiry and are independent of the admin password.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Subject carried by every admin token
pub const ADMIN_SUBJECT: &str = "admin";

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject
    pub sub: String,
    /// Unique token id, used for revocation
    pub jti: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issues and verifies HMAC-signed tokens
pub struct TokenSigner {
    key: hmac::Key,
    ttl_secs: i64,
}

impl TokenSigner {
    /// Signer keyed with a configured secret
    pub fn from_secret(secret: &str, ttl_secs: u64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
            ttl_secs: clamp_ttl(ttl_secs),
        }
    }

    /// Signer keyed with 32 fresh random bytes
    pub fn random(ttl_secs: u64) -> Result<Self> {
        let rng = ring::rand::SystemRandom::new();
        let bytes: Zeroizing<[u8; 32]> = Zeroizing::new(
            ring::rand::generate(&rng)
                .map_err(|_| Error::Internal("Failed to generate token key".to_string()))?
                .expose(),
        );
        Ok(Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, &bytes[..]),
            ttl_secs: clamp_ttl(ttl_secs),
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `subject` valid from `now` for the configured TTL
    pub fn issue(&self, subject: &str, now: i64) -> Result<(String, Claims)> {
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| Error::Internal("Token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };

        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        let token = format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(tag.as_ref()));
        Ok((token, claims))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| Error::Auth("Malformed token".to_string()))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Error::Auth("Malformed token".to_string()))?;
        hmac::verify(&self.key, payload.as_bytes(), &signature)
            .map_err(|_| Error::Auth("Invalid token signature".to_string()))?;

        let raw = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::Auth("Malformed token".to_string()))?;
        let claims: Claims = serde_json::from_slice(&raw)
            .map_err(|_| Error::Auth("Malformed token".to_string()))?;

        if now >= claims.exp {
            return Err(Error::Auth("Token expired".to_string()));
        }
        Ok(claims)
    }

    /// Sign arbitrary bytes with the token key
    pub(crate) fn sign(&self, data: &[u8]) -> hmac::Tag {
        hmac::sign(&self.key, data)
    }

    /// Constant-time check of `data` against a tag produced by [`sign`](Self::sign)
    pub(crate) fn verify_tag(&self, data: &[u8], tag: &[u8]) -> bool {
        hmac::verify(&self.key, data, tag).is_ok()
    }
}

fn clamp_ttl(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::random(3600).unwrap();
        let (token, claims) = signer.issue(ADMIN_SUBJECT, NOW).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, NOW + 3600);

        let verified = signer.verify(&token, NOW + 10).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::from_secret("secret", 60);
        let (token, _) = signer.issue(ADMIN_SUBJECT, NOW).unwrap();

        assert!(signer.verify(&token, NOW + 59).is_ok());
        let err = signer.verify(&token, NOW + 60).unwrap_err();
        assert_eq!(err.to_string(), "Token expired");
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = TokenSigner::from_secret("secret", 60);
        let (token, mut claims) = signer.issue(ADMIN_SUBJECT, NOW).unwrap();
        let signature = token.split_once('.').unwrap().1;

        claims.exp += 1_000_000;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert!(matches!(signer.verify(&forged, NOW), Err(Error::Auth(_))));
    }

    #[test]
    fn test_other_key_rejected() {
        let a = TokenSigner::from_secret("key-a", 60);
        let b = TokenSigner::from_secret("key-b", 60);
        let (token, _) = a.issue(ADMIN_SUBJECT, NOW).unwrap();
        assert!(b.verify(&token, NOW).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = TokenSigner::from_secret("secret", 60);
        assert!(signer.verify("", NOW).is_err());
        assert!(signer.verify("no-dot", NOW).is_err());
        assert!(signer.verify("a.b", NOW).is_err());
        assert!(signer.verify("admin123", NOW).is_err());
    }

    #[test]
    fn test_random_keys_differ() {
        let a = TokenSigner::random(60).unwrap();
        let b = TokenSigner::random(60).unwrap();
        let (token, _) = a.issue(ADMIN_SUBJECT, NOW).unwrap();
        assert!(b.verify(&token, NOW).is_err());
    }

    #[test]
    fn test_huge_ttl_does_not_wrap() {
        let signer = TokenSigner::from_secret("secret", u64::MAX);
        assert_eq!(signer.ttl_secs(), i64::MAX);

        let err = signer.issue(ADMIN_SUBJECT, NOW).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_ttl_overflowing_expiry_is_an_error() {
        let signer = TokenSigner::from_secret("secret", i64::MAX as u64);
        assert!(matches!(
            signer.issue(ADMIN_SUBJECT, NOW),
            Err(Error::Internal(_))
        ));

        let signer = TokenSigner::from_secret("secret", (i64::MAX - NOW) as u64);
        let (token, claims) = signer.issue(ADMIN_SUBJECT, NOW).unwrap();
        assert_eq!(claims.exp, i64::MAX);
        assert!(signer.verify(&token, NOW).is_ok());
    }

    #[test]
    fn test_tag_verification() {
        let signer = TokenSigner::from_secret("secret", 60);
        let tag = signer.sign(b"admin123");
        assert!(signer.verify_tag(b"admin123", tag.as_ref()));
        assert!(!signer.verify_tag(b"admin1234", tag.as_ref()));
        assert!(!signer.verify_tag(b"", tag.as_ref()));
    }
}
