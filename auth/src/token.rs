//! HMAC-signed bearer tokens.
//!
//! A token is `hex(claims-json) + "." + hex(hmac-sha256)`. The claims
//! carry the user, tenant, role, kind, and expiry; the signature is
//! keyed by the server secret. Verification is constant-time through
//! `Mac::verify_slice`.

use crate::AuthError;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use verity_types::{AuthContext, OrgId, Role, Timestamp, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Default access token lifetime: one hour.
pub const ACCESS_TTL_SECS: u64 = 60 * 60;
/// Default refresh token lifetime: seven days.
pub const REFRESH_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// What a token is good for. A refresh token cannot authenticate a
/// request and an access token cannot mint new tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// The signed token payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub org: OrgId,
    pub role: Role,
    pub kind: TokenKind,
    pub exp: Timestamp,
}

impl Claims {
    pub fn context(&self) -> AuthContext {
        AuthContext::new(self.org.clone(), self.sub.clone(), self.role)
    }
}

/// Issues and verifies tokens under one secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
            access_ttl_secs: ACCESS_TTL_SECS,
            refresh_ttl_secs: REFRESH_TTL_SECS,
        }
    }

    pub fn with_ttls(mut self, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.key).map_err(|err| AuthError::Hash(err.to_string()))
    }

    /// Sign a token for a user at an explicit instant.
    pub fn issue_at(
        &self,
        sub: UserId,
        org: OrgId,
        role: Role,
        kind: TokenKind,
        now: Timestamp,
    ) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let claims = Claims {
            sub,
            org,
            role,
            kind,
            exp: now.plus_secs(ttl),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|err| AuthError::Hash(err.to_string()))?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let sig = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(payload), hex::encode(sig)))
    }

    pub fn issue(
        &self,
        sub: UserId,
        org: OrgId,
        role: Role,
        kind: TokenKind,
    ) -> Result<String, AuthError> {
        self.issue_at(sub, org, role, kind, Timestamp::now())
    }

    /// Verify signature, kind, and expiry; returns the claims.
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: Timestamp,
    ) -> Result<Claims, AuthError> {
        let (payload_hex, sig_hex) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let payload = hex::decode(payload_hex).map_err(|_| AuthError::InvalidToken)?;
        let sig = hex::decode(sig_hex).map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&sig).map_err(|_| AuthError::InvalidToken)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
        if claims.kind != expected {
            return Err(AuthError::InvalidToken);
        }
        if claims.exp.is_past(now) {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }

    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        self.verify_at(token, expected, Timestamp::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret")
    }

    #[test]
    fn issued_tokens_verify() {
        let s = signer();
        let now = Timestamp::new(1_000);
        let token = s
            .issue_at(
                UserId::generate(),
                OrgId::generate(),
                Role::Admin,
                TokenKind::Access,
                now,
            )
            .unwrap();
        let claims = s.verify_at(&token, TokenKind::Access, now).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, now.plus_secs(ACCESS_TTL_SECS));
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let s = signer();
        let now = Timestamp::new(0);
        let refresh = s
            .issue_at(
                UserId::generate(),
                OrgId::generate(),
                Role::User,
                TokenKind::Refresh,
                now,
            )
            .unwrap();
        assert!(matches!(
            s.verify_at(&refresh, TokenKind::Access, now),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let s = signer();
        let now = Timestamp::new(0);
        let token = s
            .issue_at(
                UserId::generate(),
                OrgId::generate(),
                Role::User,
                TokenKind::Access,
                now,
            )
            .unwrap();
        let (payload, sig) = token.split_once('.').unwrap();
        let mut bytes = hex::decode(payload).unwrap();
        bytes[0] ^= 1;
        let forged = format!("{}.{sig}", hex::encode(bytes));
        assert!(matches!(
            s.verify_at(&forged, TokenKind::Access, now),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let now = Timestamp::new(0);
        let token = signer()
            .issue_at(
                UserId::generate(),
                OrgId::generate(),
                Role::User,
                TokenKind::Access,
                now,
            )
            .unwrap();
        assert!(matches!(
            TokenSigner::new("other-secret").verify_at(&token, TokenKind::Access, now),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let s = signer();
        let now = Timestamp::new(0);
        let token = s
            .issue_at(
                UserId::generate(),
                OrgId::generate(),
                Role::User,
                TokenKind::Access,
                now,
            )
            .unwrap();
        let at_deadline = Timestamp::new(ACCESS_TTL_SECS);
        assert!(s.verify_at(&token, TokenKind::Access, at_deadline).is_ok());
        assert!(matches!(
            s.verify_at(&token, TokenKind::Access, at_deadline.plus_secs(1)),
            Err(AuthError::ExpiredToken)
        ));
    }
}
