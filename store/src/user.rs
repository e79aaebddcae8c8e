//! User storage trait.

use crate::StoreError;
use verity_types::{User, UserId};

/// Trait for storing tenant users. Emails are globally unique.
pub trait UserStore {
    /// Insert a user. Fails `Duplicate` if the email is taken.
    fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    fn get_user(&self, id: &UserId) -> Result<User, StoreError>;

    fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;
}
