use crate::error::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of platform user an actor is created as.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Role {
    Customer,
    Agent,
    Merchant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Agent, Role::Merchant];

    /// Fixed leading digits of every phone number issued for this role.
    pub fn phone_prefix(self) -> &'static str {
        match self {
            Role::Customer => "01500",
            Role::Agent => "01600",
            Role::Merchant => "01700",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Agent => "Agent",
            Role::Merchant => "Merchant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlatformError::ValidationError(format!("Unknown role: {s}")))
    }
}

/// A user created on the platform during a run.
///
/// `id` stays `None` until the platform assigns one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Actor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub nid: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// Every actor created so far, grouped by role in creation order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct AccountDocument {
    #[serde(default)]
    pub customers: Vec<Actor>,
    #[serde(default)]
    pub agents: Vec<Actor>,
    #[serde(default)]
    pub merchants: Vec<Actor>,
}

impl AccountDocument {
    pub fn actors(&self, role: Role) -> &[Actor] {
        match role {
            Role::Customer => &self.customers,
            Role::Agent => &self.agents,
            Role::Merchant => &self.merchants,
        }
    }

    /// Appends `actor` to the sequence matching its own role.
    pub fn push(&mut self, actor: Actor) {
        let bucket = match actor.role {
            Role::Customer => &mut self.customers,
            Role::Agent => &mut self.agents,
            Role::Merchant => &mut self.merchants,
        };
        bucket.push(actor);
    }

    pub fn get(&self, role: Role, index: usize) -> Option<&Actor> {
        self.actors(role).get(index)
    }

    pub fn is_empty(&self) -> bool {
        Role::ALL.into_iter().all(|role| self.actors(role).is_empty())
    }

    pub fn len(&self) -> usize {
        Role::ALL.into_iter().map(|role| self.actors(role).len()).sum()
    }
}
