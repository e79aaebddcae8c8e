//! Verification session storage trait.

use crate::StoreError;
use verity_types::{Session, SessionId};

/// Trait for storing verification sessions.
///
/// Sessions are written by an anonymous customer holding the session
/// id; the id is unguessable and acts as the capability.
pub trait SessionStore {
    /// Insert a newly opened session.
    fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Lookup by session id.
    fn get_session(&self, id: &SessionId) -> Result<Session, StoreError>;

    /// Replace the stored session with an updated copy.
    fn update_session(&self, session: &Session) -> Result<(), StoreError>;
}
