//! Authenticated tenant users.

use crate::{OrgId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Role of a user within their organization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Reviewer,
    #[default]
    User,
}

/// A tenant user account.
///
/// `password_hash` is an opaque credential string; hashing and
/// verification live in the auth crate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub organization_id: OrgId,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: Timestamp,
}
