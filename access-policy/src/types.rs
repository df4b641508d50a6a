//! Core identity and resource types for the access policy engine.
//!
//! # Model
//!
//! - A [`Principal`] is the acting identity: a [`Role`], a user id used for
//!   ownership checks, and (for KAM principals only) a set of territories.
//! - A [`Resource`] carries only the attributes authorization looks at: an id,
//!   an optional territory and an optional assignee.
//! - An [`Action`] is one of the four operations the engine rules on.
//!
//! Roles and actions are closed enums. Loosely typed strings coming from the
//! session provider or the UI are parsed at the boundary, so the rule table
//! only ever sees values it has a rule for.
//!
//! # Territory matching
//!
//! Territory identifiers are compared with exact, case-sensitive string
//! equality. `"North"` and `"north"` are different territories. No
//! normalization happens anywhere in this crate.

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// The closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full control over every resource.
    Admin,
    /// Key Account Manager, restricted to assigned territories.
    Kam,
    /// Restricted to resources assigned to the principal.
    ChannelPartner,
    /// No access to managed resources.
    Customer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Kam, Role::ChannelPartner, Role::Customer];

    /// Canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Kam => "kam",
            Role::ChannelPartner => "channel_partner",
            Role::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    /// Accepts the canonical names plus the display forms used by session
    /// payloads (`KAM`, `ChannelPartner`, `CP`), ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "kam" => Ok(Role::Kam),
            "channel_partner" | "channelpartner" | "cp" => Ok(Role::ChannelPartner),
            "customer" => Ok(Role::Customer),
            _ => Err(AuthzError::UnknownRole(value.to_string())),
        }
    }
}

/// The closed set of actions the engine rules on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Delete,
    Reassign,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Write, Action::Delete, Action::Reassign];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
            Action::Reassign => "reassign",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    /// Exact match on the lowercase action names.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "read" => Ok(Action::Read),
            "write" => Ok(Action::Write),
            "delete" => Ok(Action::Delete),
            "reassign" => Ok(Action::Reassign),
            _ => Err(AuthzError::InvalidAction(value.to_string())),
        }
    }
}

/// The session record supplied by the auth provider.
///
/// This is the loosely typed shape the rest of the portal passes around. It is
/// converted into a [`Principal`] with `Principal::try_from`, which is where
/// unknown roles and blank user ids are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "user_id")]
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub territories: Vec<String>,
    #[serde(default = "default_authenticated", alias = "is_authenticated")]
    pub is_authenticated: bool,
}

fn default_authenticated() -> bool {
    true
}

/// The acting identity for an authorization decision.
///
/// A principal is built once per authenticated session and never changes;
/// fields are private and only readable through accessors. Territories are
/// retained for KAM principals only. Every other role is built with an empty
/// territory set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionUser", into = "SessionUser")]
pub struct Principal {
    user_id: String,
    role: Role,
    territories: BTreeSet<String>,
    authenticated: bool,
}

impl Principal {
    /// Creates an authenticated principal.
    pub fn new<I, T>(user_id: impl Into<String>, role: Role, territories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let territories = match role {
            Role::Kam => territories.into_iter().map(Into::into).collect(),
            _ => BTreeSet::new(),
        };

        Self {
            user_id: user_id.into(),
            role,
            territories,
            authenticated: true,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin, Vec::<String>::new())
    }

    /// Creates a KAM principal assigned to the given territories.
    pub fn kam<I, T>(user_id: impl Into<String>, territories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(user_id, Role::Kam, territories)
    }

    pub fn channel_partner(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::ChannelPartner, Vec::<String>::new())
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Customer, Vec::<String>::new())
    }

    /// Returns the same identity marked as not authenticated.
    ///
    /// Every decision for such a principal is `NOT_AUTHENTICATED`.
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn territories(&self) -> &BTreeSet<String> {
        &self.territories
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl TryFrom<SessionUser> for Principal {
    type Error = AuthzError;

    fn try_from(session: SessionUser) -> Result<Self> {
        let role: Role = session.role.parse()?;

        if session.is_authenticated && session.user_id.trim().is_empty() {
            return Err(AuthzError::InvalidPrincipal(
                "authenticated session has an empty user id".to_string(),
            ));
        }

        let principal = Principal::new(session.user_id, role, session.territories);
        Ok(if session.is_authenticated {
            principal
        } else {
            principal.unauthenticated()
        })
    }
}

impl From<Principal> for SessionUser {
    fn from(principal: Principal) -> Self {
        Self {
            user_id: principal.user_id,
            role: principal.role.as_str().to_string(),
            territories: principal.territories.into_iter().collect(),
            is_authenticated: principal.authenticated,
        }
    }
}

/// The authorization-relevant view of any territorial or ownable entity.
///
/// Leads, audit entries and settings pages implement this to be passed through
/// the engine directly, without first being copied into a [`Resource`].
pub trait AccessControlled {
    fn resource_id(&self) -> &str;

    /// Territory the entity belongs to, if any.
    fn territory(&self) -> Option<&str>;

    /// User id of the entity's owner, if any.
    fn assigned_to(&self) -> Option<&str>;
}

/// A resource subject to access control, reduced to the attributes the
/// engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(default, alias = "assigned_to", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Resource {
    /// Creates a resource with no territory and no assignee.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            territory: None,
            assigned_to: None,
        }
    }

    pub fn with_territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = Some(territory.into());
        self
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }
}

impl AccessControlled for Resource {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }
}

impl<T: AccessControlled + ?Sized> AccessControlled for &T {
    fn resource_id(&self) -> &str {
        (**self).resource_id()
    }

    fn territory(&self) -> Option<&str> {
        (**self).territory()
    }

    fn assigned_to(&self) -> Option<&str> {
        (**self).assigned_to()
    }
}
