//! Collection filter and bulk-selection guard.
//!
//! Both operations run the rule table across a resource collection. The
//! principal's territory view is computed once per call and reused for every
//! element, so a pass is linear in the number of resources.

use crate::decision::DenialReason;
use crate::territory::territory_access_for;
use crate::types::{AccessControlled, Action, Principal, Role};
use crate::AccessPolicy;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Result of a bulk selection request.
///
/// Only the guard builds these, so `selected` is always within the policy's
/// cap and holds only ids the rule table allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSelection {
    selected: Vec<String>,
    capped: bool,
    denied_ids: Vec<String>,
}

impl BulkSelection {
    /// Selected ids, in the resources' original order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// True when more resources were accessible than the cap allowed.
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    /// Requested ids the rule table denied, including ids that matched no
    /// resource. Ids dropped only because of the cap are not listed.
    pub fn denied_ids(&self) -> &[String] {
        &self.denied_ids
    }
}

impl AccessPolicy {
    /// Returns the resources the principal may perform `action` on, in their
    /// original order.
    pub fn filter_accessible_resources<'r, R>(
        &self,
        principal: Option<&Principal>,
        resources: &'r [R],
        action: Action,
    ) -> Vec<&'r R>
    where
        R: AccessControlled,
    {
        let Some(principal) = principal.filter(|p| p.is_authenticated()) else {
            return Vec::new();
        };

        let accessible: Vec<&R> = match principal.role() {
            Role::Admin => resources.iter().collect(),
            Role::Customer => Vec::new(),
            Role::Kam | Role::ChannelPartner => {
                let access = territory_access_for(Some(principal));
                resources
                    .iter()
                    .filter(|r| self.evaluate(principal, *r, action, &access).has_access)
                    .collect()
            }
        };

        debug!(
            user_id = principal.user_id(),
            role = principal.role().as_str(),
            action = action.as_str(),
            total = resources.len(),
            accessible = accessible.len(),
            "Filtered resource collection"
        );

        accessible
    }

    /// Computes what a bulk selection of `requested_ids` may contain.
    ///
    /// Accessible resources are taken in the collection's order and truncated
    /// to the policy's cap, with `capped` set when truncation happened.
    /// Requested ids the rule table denies, or that match no resource, are
    /// reported in `denied_ids` in request order.
    ///
    /// Repeated requested ids are collapsed to their first occurrence before
    /// anything else happens, so with a null or unauthenticated principal
    /// `denied_ids` is the deduplicated request, not the request verbatim.
    pub fn select_for_bulk_action<R, S>(
        &self,
        principal: Option<&Principal>,
        resources: &[R],
        action: Action,
        requested_ids: &[S],
    ) -> BulkSelection
    where
        R: AccessControlled,
        S: AsRef<str>,
    {
        let requested: Vec<&str> = dedup(requested_ids.iter().map(|id| id.as_ref()));

        let Some(principal) = principal.filter(|p| p.is_authenticated()) else {
            return BulkSelection {
                selected: Vec::new(),
                capped: false,
                denied_ids: requested.into_iter().map(str::to_string).collect(),
            };
        };

        let wanted: HashSet<&str> = requested.iter().copied().collect();
        let access = territory_access_for(Some(principal));
        let cap = self.selection_cap();

        let mut seen: HashSet<&str> = HashSet::with_capacity(wanted.len());
        let mut denied: HashSet<&str> = HashSet::new();
        let mut selected = Vec::new();
        let mut capped = false;

        for resource in resources {
            let id = resource.resource_id();
            if !wanted.contains(id) || !seen.insert(id) {
                continue;
            }

            if !self.evaluate(principal, resource, action, &access).has_access {
                denied.insert(id);
            } else if selected.len() < cap {
                selected.push(id.to_string());
            } else {
                capped = true;
            }
        }

        // Ids with no matching resource fail with RESOURCE_NOT_FOUND.
        let denied_ids: Vec<String> = requested
            .iter()
            .filter(|id| denied.contains(*id) || !seen.contains(*id))
            .map(|id| id.to_string())
            .collect();

        if capped || !denied_ids.is_empty() {
            debug!(
                user_id = principal.user_id(),
                action = action.as_str(),
                selected = selected.len(),
                denied = denied_ids.len(),
                capped,
                cap,
                "Bulk selection restricted"
            );
        }

        BulkSelection {
            selected,
            capped,
            denied_ids,
        }
    }

    /// "Select all": a bulk selection requesting every resource in the
    /// collection.
    pub fn select_all_accessible<R>(
        &self,
        principal: Option<&Principal>,
        resources: &[R],
        action: Action,
    ) -> BulkSelection
    where
        R: AccessControlled,
    {
        let ids: Vec<&str> = resources.iter().map(|r| r.resource_id()).collect();
        self.select_for_bulk_action(principal, resources, action, &ids)
    }

    /// Reason the rule table gives for one resource of a collection, or
    /// `None` if it is accessible. Used to explain a `denied_ids` entry.
    pub fn denial_reason<R>(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        action: Action,
    ) -> Option<DenialReason>
    where
        R: AccessControlled + ?Sized,
    {
        self.check(principal, resource, action).reason
    }
}

/// Drops repeated ids, keeping first occurrences in order.
fn dedup<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
