//! Registration, login, and token refresh over the store.

use crate::password::{hash_password, verify_password};
use crate::token::{TokenKind, TokenSigner};
use crate::AuthError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use verity_store::Store;
use verity_types::{
    AuditAction, AuditLog, AuthContext, Organization, Role, TargetType, Timestamp, User, UserId,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
    pub organization_name: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// The token pair returned by register, login, and refresh.
#[derive(Clone, Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

pub struct AuthService {
    store: Arc<dyn Store>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Create a tenant and its first admin user in one write, then
    /// issue tokens. The audit entry is appended after the write; the
    /// tenant's trail starts with its own creation.
    pub fn register(&self, req: RegisterRequest) -> Result<(Organization, User, TokenPair), AuthError> {
        let email = req.email.trim().to_ascii_lowercase();
        if !email.contains('@') {
            return Err(AuthError::Invalid("email address is malformed".into()));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if req.organization_name.trim().is_empty() {
            return Err(AuthError::Invalid("organization name is required".into()));
        }

        let now = Timestamp::now();
        let org = Organization::new(req.organization_name.trim(), Some(email.clone()), now);
        let admin = User {
            id: UserId::generate(),
            organization_id: org.id.clone(),
            email,
            password_hash: hash_password(&req.password)?,
            name: req.name,
            role: Role::Admin,
            is_active: true,
            created_at: now,
        };
        self.store.create_organization_with_admin(&org, &admin)?;
        self.store.append_audit(&AuditLog::new(
            org.id.clone(),
            Some(admin.id.clone()),
            AuditAction::Create,
            TargetType::Organization,
            Some(org.id.as_str().to_string()),
            None,
            now,
        ))?;
        tracing::info!(org = %org.id, "organization registered");

        let tokens = self.token_pair(&admin)?;
        Ok((org, admin, tokens))
    }

    /// Verify credentials and issue tokens. Unknown email and wrong
    /// password produce the same error.
    pub fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let user = match self.store.get_user_by_email(&email) {
            Ok(user) => user,
            Err(verity_store::StoreError::NotFound(_)) => {
                return Err(AuthError::InvalidCredentials)
            }
            Err(err) => return Err(err.into()),
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        let tokens = self.token_pair(&user)?;
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a fresh pair. The user must still
    /// exist and be active; a deleted tenant's tokens die here.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.signer.verify(refresh_token, TokenKind::Refresh)?;
        let user = match self.store.get_user(&claims.sub) {
            Ok(user) => user,
            Err(verity_store::StoreError::NotFound(_)) => return Err(AuthError::InvalidToken),
            Err(err) => return Err(err.into()),
        };
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        self.token_pair(&user)
    }

    /// Authenticate a bearer access token into a request context.
    pub fn authenticate(&self, access_token: &str) -> Result<AuthContext, AuthError> {
        let claims = self.signer.verify(access_token, TokenKind::Access)?;
        Ok(claims.context())
    }

    fn token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self.signer.issue(
            user.id.clone(),
            user.organization_id.clone(),
            user.role,
            TokenKind::Access,
        )?;
        let refresh_token = self.signer.issue(
            user.id.clone(),
            user.organization_id.clone(),
            user.role,
            TokenKind::Refresh,
        )?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_store_memory::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            TokenSigner::new("test-secret"),
        )
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            organization_name: "Acme Compliance".into(),
            email: email.into(),
            password: "hunter2hunter2".into(),
            name: None,
        }
    }

    #[test]
    fn register_then_login() {
        let svc = service();
        let (org, admin, _) = svc.register(request("ops@acme.test")).unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.organization_id, org.id);

        let (user, tokens) = svc.login("ops@acme.test", "hunter2hunter2").unwrap();
        assert_eq!(user.id, admin.id);
        let ctx = svc.authenticate(&tokens.access_token).unwrap();
        assert_eq!(ctx.org_id, org.id);
        assert!(ctx.is_admin());
    }

    #[test]
    fn email_is_normalized() {
        let svc = service();
        svc.register(request("  Ops@Acme.Test ")).unwrap();
        assert!(svc.login("ops@acme.test", "hunter2hunter2").is_ok());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let svc = service();
        svc.register(request("ops@acme.test")).unwrap();
        assert!(matches!(
            svc.register(request("ops@acme.test")),
            Err(AuthError::EmailTaken)
        ));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_alike() {
        let svc = service();
        svc.register(request("ops@acme.test")).unwrap();
        let a = svc.login("ops@acme.test", "wrong-password").unwrap_err();
        let b = svc.login("nobody@acme.test", "whatever").unwrap_err();
        assert!(matches!(a, AuthError::InvalidCredentials));
        assert!(matches!(b, AuthError::InvalidCredentials));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let svc = service();
        let mut req = request("ops@acme.test");
        req.password = "short".into();
        assert!(matches!(svc.register(req), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn refresh_rotates_the_pair() {
        let svc = service();
        let (_, _, tokens) = svc.register(request("ops@acme.test")).unwrap();
        let rotated = svc.refresh(&tokens.refresh_token).unwrap();
        assert!(svc.authenticate(&rotated.access_token).is_ok());
        // An access token is not a refresh token.
        assert!(matches!(
            svc.refresh(&tokens.access_token),
            Err(AuthError::InvalidToken)
        ));
    }
}
