//! Role and territory based access policy engine for the leads portal.
//!
//! This crate decides, for a principal (role, territories, user id) and a
//! resource (a lead, a settings page, an audit entry), whether an action is
//! permitted, and projects resource collections down to what a principal may
//! act on.
//!
//! # Architecture Overview
//!
//! 1. The session provider hands over a [`SessionUser`], converted into an
//!    immutable [`Principal`]. Unknown roles are rejected here.
//! 2. The data layer supplies resources (anything implementing
//!    [`AccessControlled`]).
//! 3. [`AccessPolicy::can_perform_action`] rules on a single
//!    `(principal, resource, action)` triple and returns a [`Decision`].
//! 4. [`AccessPolicy::filter_accessible_resources`] and the bulk-selection
//!    guard apply the same rules across a collection.
//!
//! # Rule table
//!
//! Evaluated in order, first match wins:
//!
//! 1. No resource: `RESOURCE_NOT_FOUND`.
//! 2. No principal, or not authenticated: `NOT_AUTHENTICATED`.
//! 3. Action outside `read | write | delete | reassign`: `INVALID_ACTION`.
//! 4. Admin: allowed.
//! 5. KAM: `read`/`write`/`reassign` need the resource's territory to be one
//!    of the principal's (`TERRITORY_MISMATCH` otherwise); `delete` is
//!    `ROLE_NOT_AUTHORIZED`.
//! 6. Channel partner: `read`/`write` need `assigned_to == user_id`
//!    (`NOT_OWNER` otherwise); `delete`/`reassign` are `ROLE_NOT_AUTHORIZED`.
//! 7. Customer: `ROLE_NOT_AUTHORIZED`.
//!
//! Resources with no territory are reachable by every KAM unless
//! [`PolicyConfig::territoryless_resources_visible`] is switched off.
//!
//! # Purity
//!
//! Every check is a pure function of its arguments and the engine's
//! configuration. Nothing is cached and no state is mutated, so callers may
//! memoize decisions keyed on `(principal, resource, action)`.
//!
//! # Example
//!
//! ```rust
//! use access_policy::{AccessPolicy, DenialReason, Principal, Resource};
//!
//! let policy = AccessPolicy::new();
//! let kam = Principal::kam("kam-1", ["North"]);
//! let lead = Resource::new("lead-1").with_territory("East");
//!
//! let decision = policy.can_perform_action(Some(&kam), Some(&lead), "read");
//! assert!(!decision.has_access);
//! assert_eq!(decision.reason, Some(DenialReason::TerritoryMismatch));
//! ```

pub mod config;
pub mod decision;
pub mod error;
pub mod filter;
pub mod selection;
pub mod territory;
pub mod types;

pub use config::{PolicyConfig, HARD_SELECTION_CAP};
pub use decision::{Decision, DenialReason};
pub use error::{AuthzError, Result};
pub use filter::BulkSelection;
pub use selection::{SelectOutcome, SelectionError, SelectionSet, ViewChange};
pub use territory::{territory_access_for, TerritoryAccess};
pub use types::{AccessControlled, Action, Principal, Resource, Role, SessionUser};

use tracing::{debug, trace};

/// The access policy engine.
///
/// Holds a validated [`PolicyConfig`] and nothing else. All methods take
/// `&self`; an engine can be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    config: PolicyConfig,
}

impl AccessPolicy {
    /// Creates an engine with the default policy configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from a configuration, validating it first.
    pub fn with_config(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Maximum size of any bulk selection under this policy.
    pub fn selection_cap(&self) -> usize {
        self.config.max_bulk_selection
    }

    /// See [`territory_access_for`].
    pub fn territory_access_for<'a>(&self, principal: Option<&'a Principal>) -> TerritoryAccess<'a> {
        territory_access_for(principal)
    }

    /// Rules on an action given by name.
    ///
    /// This is the entry point for callers holding an untyped action string.
    /// Names outside the action set produce an `INVALID_ACTION` denial, for
    /// every role including admin.
    pub fn can_perform_action<R>(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        action: &str,
    ) -> Decision
    where
        R: AccessControlled + ?Sized,
    {
        let decision = match gate(principal, resource) {
            Err(denied) => denied,
            Ok((principal, resource)) => match action.parse::<Action>() {
                Ok(action) => {
                    let access = territory_access_for(Some(principal));
                    self.evaluate(principal, resource, action, &access)
                }
                Err(_) => Decision::deny(DenialReason::InvalidAction),
            },
        };

        log_decision(principal, resource, action, &decision);
        decision
    }

    /// Rules on a typed action.
    pub fn check<R>(&self, principal: Option<&Principal>, resource: Option<&R>, action: Action) -> Decision
    where
        R: AccessControlled + ?Sized,
    {
        let decision = match gate(principal, resource) {
            Err(denied) => denied,
            Ok((principal, resource)) => {
                self.evaluate(principal, resource, action, &territory_access_for(Some(principal)))
            }
        };

        log_decision(principal, resource, action.as_str(), &decision);
        decision
    }

    /// Role rules (steps 4 to 7). The principal is known to be authenticated
    /// and `access` must be the territory view of that same principal.
    pub(crate) fn evaluate<R>(
        &self,
        principal: &Principal,
        resource: &R,
        action: Action,
        access: &TerritoryAccess<'_>,
    ) -> Decision
    where
        R: AccessControlled + ?Sized,
    {
        match principal.role() {
            Role::Admin => Decision::allow(),
            Role::Kam => match action {
                Action::Read | Action::Write | Action::Reassign => {
                    if self.within_territory(access, resource.territory()) {
                        Decision::allow()
                    } else {
                        Decision::deny(DenialReason::TerritoryMismatch)
                    }
                }
                Action::Delete => Decision::deny(DenialReason::RoleNotAuthorized),
            },
            Role::ChannelPartner => match action {
                Action::Read | Action::Write => {
                    if resource.assigned_to() == Some(principal.user_id()) {
                        Decision::allow()
                    } else {
                        Decision::deny(DenialReason::NotOwner)
                    }
                }
                Action::Delete | Action::Reassign => Decision::deny(DenialReason::RoleNotAuthorized),
            },
            Role::Customer => Decision::deny(DenialReason::RoleNotAuthorized),
        }
    }

    fn within_territory(&self, access: &TerritoryAccess<'_>, territory: Option<&str>) -> bool {
        match territory {
            Some(territory) => access.can_access_territory(territory),
            // TODO: confirm with product whether territory-less leads should be hidden from KAMs by default.
            None => self.config.territoryless_resources_visible,
        }
    }
}

/// Steps 1 and 2 of the rule table, shared by both entry points.
fn gate<'p, 'r, R>(
    principal: Option<&'p Principal>,
    resource: Option<&'r R>,
) -> std::result::Result<(&'p Principal, &'r R), Decision>
where
    R: AccessControlled + ?Sized,
{
    let resource = resource.ok_or_else(|| Decision::deny(DenialReason::ResourceNotFound))?;
    let principal = principal
        .filter(|p| p.is_authenticated())
        .ok_or_else(|| Decision::deny(DenialReason::NotAuthenticated))?;
    Ok((principal, resource))
}

fn log_decision<R>(principal: Option<&Principal>, resource: Option<&R>, action: &str, decision: &Decision)
where
    R: AccessControlled + ?Sized,
{
    let user_id = principal.map(Principal::user_id).unwrap_or("-");
    let role = principal.map(|p| p.role().as_str()).unwrap_or("-");
    let resource_id = resource.map(|r| r.resource_id()).unwrap_or("-");

    match decision.reason {
        Some(reason) => debug!(user_id, role, resource_id, action, %reason, "Access denied"),
        None => trace!(user_id, role, resource_id, action, "Access granted"),
    }
}

/// [`AccessPolicy::can_perform_action`] under the default configuration.
pub fn can_perform_action<R>(principal: Option<&Principal>, resource: Option<&R>, action: &str) -> Decision
where
    R: AccessControlled + ?Sized,
{
    AccessPolicy::new().can_perform_action(principal, resource, action)
}

/// [`AccessPolicy::filter_accessible_resources`] under the default configuration.
pub fn filter_accessible_resources<'r, R>(
    principal: Option<&Principal>,
    resources: &'r [R],
    action: Action,
) -> Vec<&'r R>
where
    R: AccessControlled,
{
    AccessPolicy::new().filter_accessible_resources(principal, resources, action)
}

/// [`AccessPolicy::select_for_bulk_action`] under the default configuration.
pub fn select_for_bulk_action<R, S>(
    principal: Option<&Principal>,
    resources: &[R],
    action: Action,
    requested_ids: &[S],
) -> BulkSelection
where
    R: AccessControlled,
    S: AsRef<str>,
{
    AccessPolicy::new().select_for_bulk_action(principal, resources, action, requested_ids)
}

/// [`AccessPolicy::select_all_accessible`] under the default configuration.
pub fn select_all_accessible<R>(principal: Option<&Principal>, resources: &[R], action: Action) -> BulkSelection
where
    R: AccessControlled,
{
    AccessPolicy::new().select_all_accessible(principal, resources, action)
}
