//! Tenant root entity.

use crate::{OrgId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription plan for an organization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Starter,
    Business,
    Enterprise,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Starter => f.write_str("starter"),
            Plan::Business => f.write_str("business"),
            Plan::Enterprise => f.write_str("enterprise"),
        }
    }
}

/// A tenant. Every other entity carries this organization's id and all
/// queries are filtered by it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub email: Option<String>,
    pub plan: Plan,
    pub created_at: Timestamp,
}

impl Organization {
    pub fn new(name: impl Into<String>, email: Option<String>, now: Timestamp) -> Self {
        Self {
            id: OrgId::generate(),
            name: name.into(),
            email,
            plan: Plan::Starter,
            created_at: now,
        }
    }
}
