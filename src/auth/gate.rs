//! Admin password gate
//!
//! `login` trades the admin password for a signed, short-lived bearer token;
//! `check` validates a presented token. Logged-out tokens are remembered
//! until their natural expiry.

use crate::auth::token::{Claims, TokenSigner, ADMIN_SUBJECT};
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Outcome of a credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credential is valid
    Authenticated {
        /// Token subject
        identity: String,
    },
    /// Credential is missing, malformed, expired or revoked
    Rejected {
        /// Human-readable reason for rejection
        reason: String,
    },
}

impl AuthOutcome {
    /// Returns true if the request is authenticated
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Password gate for note administration
pub struct AuthGate {
    signer: TokenSigner,
    /// HMAC tag of the admin password; the plaintext is not retained
    password_tag: Vec<u8>,
    /// Revoked token ids → expiry
    revoked: RwLock<HashMap<String, i64>>,
}

impl AuthGate {
    /// Build the gate from configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let signer = match config.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                TokenSigner::from_secret(secret, config.token_ttl_secs)
            }
            _ => TokenSigner::random(config.token_ttl_secs)?,
        };
        Ok(Self::with_signer(signer, &config.admin_password))
    }

    /// Build the gate around an existing signer
    pub fn with_signer(signer: TokenSigner, admin_password: &str) -> Self {
        let password_tag = signer.sign(admin_password.as_bytes()).as_ref().to_vec();
        Self {
            signer,
            password_tag,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Exchange the admin password for a bearer token
    pub fn login(&self, password: &str) -> Result<IssuedToken> {
        self.login_at(password, now())
    }

    fn login_at(&self, password: &str, now: i64) -> Result<IssuedToken> {
        if !self.signer.verify_tag(password.as_bytes(), &self.password_tag) {
            tracing::warn!("Rejected admin login attempt");
            return Err(Error::Auth("Invalid password".to_string()));
        }

        let (token, claims) = self.signer.issue(ADMIN_SUBJECT, now)?;
        tracing::info!(expires_at = claims.exp, "Issued admin token");
        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate a bearer token
    pub async fn check(&self, token: &str) -> AuthOutcome {
        self.check_at(token, now()).await
    }

    async fn check_at(&self, token: &str, now: i64) -> AuthOutcome {
        match self.claims_at(token, now).await {
            Ok(claims) => AuthOutcome::Authenticated {
                identity: claims.sub,
            },
            Err(e) => AuthOutcome::Rejected {
                reason: e.to_string(),
            },
        }
    }

    async fn claims_at(&self, token: &str, now: i64) -> Result<Claims> {
        let claims = self.signer.verify(token, now)?;
        if claims.sub != ADMIN_SUBJECT {
            return Err(Error::Auth("Unknown token subject".to_string()));
        }
        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(Error::Auth("Token revoked".to_string()));
        }
        Ok(claims)
    }

    /// Revoke a valid token until it expires
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.logout_at(token, now()).await
    }

    async fn logout_at(&self, token: &str, now: i64) -> Result<()> {
        let claims = self.claims_at(token, now).await?;

        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
        tracing::info!("Revoked admin token");
        Ok(())
    }

    /// Number of tokens currently held in the revocation set
    pub async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
