//! Shared application state handed to every handler.

use std::sync::Arc;
use verity_auth::{AuthService, ChallengeStore, TokenSigner};
use verity_kyc::{
    AuditRecorder, InvitationRegistry, Notifier, SessionTracker, SubmissionWorkflow,
};
use verity_store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthService>,
    pub registry: Arc<InvitationRegistry>,
    pub tracker: Arc<SessionTracker>,
    pub workflow: Arc<SubmissionWorkflow>,
    pub recorder: Arc<AuditRecorder>,
    pub challenges: Arc<ChallengeStore>,
}

impl AppState {
    /// Wire the engines over one store. The token secret and the
    /// notifier come from the caller; everything else is internal.
    pub fn new(store: Arc<dyn Store>, token_secret: &str, notifier: Arc<dyn Notifier>) -> Self {
        let signer = TokenSigner::new(token_secret);
        Self {
            auth: Arc::new(AuthService::new(store.clone(), signer)),
            registry: Arc::new(InvitationRegistry::new(store.clone())),
            tracker: Arc::new(SessionTracker::new(store.clone())),
            workflow: Arc::new(SubmissionWorkflow::new(store.clone(), notifier)),
            recorder: Arc::new(AuditRecorder::new(store.clone())),
            challenges: Arc::new(ChallengeStore::default()),
            store,
        }
    }
}
