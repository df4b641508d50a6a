//! Decision values returned by every authorization check.

use serde::{Deserialize, Serialize};

/// Stable, machine-checkable denial codes.
///
/// The UI maps these to redirects or inline messages. The serialized codes
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    /// No principal, or the principal is not authenticated.
    NotAuthenticated,
    /// The role categorically cannot perform the action.
    RoleNotAuthorized,
    /// KAM principal, resource outside the assigned territories.
    TerritoryMismatch,
    /// Channel partner principal, resource not assigned to them.
    NotOwner,
    /// No resource was supplied.
    ResourceNotFound,
    /// Action outside the closed action set.
    InvalidAction,
}

impl DenialReason {
    pub fn code(self) -> &'static str {
        match self {
            DenialReason::NotAuthenticated => "NOT_AUTHENTICATED",
            DenialReason::RoleNotAuthorized => "ROLE_NOT_AUTHORIZED",
            DenialReason::TerritoryMismatch => "TERRITORY_MISMATCH",
            DenialReason::NotOwner => "NOT_OWNER",
            DenialReason::ResourceNotFound => "RESOURCE_NOT_FOUND",
            DenialReason::InvalidAction => "INVALID_ACTION",
        }
    }

    /// Display text for the UI. Not authoritative; match on the code instead.
    pub fn message(self) -> &'static str {
        match self {
            DenialReason::NotAuthenticated => "You must be signed in to access this resource",
            DenialReason::RoleNotAuthorized => "Your role does not permit this action",
            DenialReason::TerritoryMismatch => "This resource is outside your assigned territories",
            DenialReason::NotOwner => "This resource is not assigned to you",
            DenialReason::ResourceNotFound => "The requested resource was not found",
            DenialReason::InvalidAction => "The requested action is not recognized",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The outcome of an authorization check.
///
/// `reason` is present exactly when `has_access` is false. `message` is
/// derived from the reason and is empty on allow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub has_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            has_access: true,
            reason: None,
            message: String::new(),
        }
    }

    pub fn deny(reason: DenialReason) -> Self {
        Self {
            has_access: false,
            reason: Some(reason),
            message: reason.message().to_string(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.has_access
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            None => f.write_str("allowed"),
            Some(reason) => write!(f, "denied ({})", reason),
        }
    }
}
