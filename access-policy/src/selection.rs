//! Session-owned selection set for bulk operations.
//!
//! A [`SelectionSet`] holds the ids currently ticked in a list view. It is
//! never persisted and is cleared whenever the view changes (filter, page,
//! sort) or the user clears it explicitly.
//!
//! Two invariants hold after every mutation:
//! - the set never exceeds the policy's selection cap. A single insert past
//!   the cap is rejected with [`SelectionError::CapReached`]; a bulk apply
//!   reports the overflow through [`BulkSelection::is_capped`];
//! - every id passed the rule table for the set's action when it was added.
//!   Bulk applies run the guard themselves, so there is no way to hand the
//!   set a result computed for another action.

use crate::decision::DenialReason;
use crate::filter::BulkSelection;
use crate::types::{AccessControlled, Action, Principal};
use crate::AccessPolicy;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection is limited to {cap} items")]
    CapReached { cap: usize },

    #[error("resource {id} cannot be selected: {reason}")]
    Denied { id: String, reason: DenialReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Added,
    AlreadySelected,
    Removed,
}

/// View changes that invalidate a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    Filter,
    Page,
    Sort,
    ExplicitClear,
}

/// Ordered, capped set of resource ids selected for one bulk action.
///
/// The set keeps its own copy of the policy it was created under, so every
/// mutation is checked against the same cap and rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    policy: AccessPolicy,
    action: Action,
    ids: Vec<String>,
}

impl SelectionSet {
    /// An empty selection for `action`, capped by the policy.
    pub fn new(policy: &AccessPolicy, action: Action) -> Self {
        Self {
            policy: policy.clone(),
            action,
            ids: Vec::new(),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn cap(&self) -> usize {
        self.policy.selection_cap()
    }

    /// Selected ids in the order they were added.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.cap()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Adds a resource after checking it against the rule table.
    ///
    /// Selecting an id already present is a no-op. A denied resource is
    /// reported before a full set, so the caller sees the more specific
    /// reason first.
    pub fn try_select<R>(
        &mut self,
        principal: Option<&Principal>,
        resource: &R,
    ) -> Result<SelectOutcome, SelectionError>
    where
        R: AccessControlled + ?Sized,
    {
        let id = resource.resource_id();
        if self.contains(id) {
            return Ok(SelectOutcome::AlreadySelected);
        }

        if let Some(reason) = self.policy.check(principal, Some(resource), self.action).reason {
            return Err(SelectionError::Denied {
                id: id.to_string(),
                reason,
            });
        }

        if self.is_full() {
            let cap = self.cap();
            debug!(cap, id, "Selection cap reached");
            return Err(SelectionError::CapReached { cap });
        }

        self.ids.push(id.to_string());
        Ok(SelectOutcome::Added)
    }

    /// Removes an id. Returns whether it was present.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    /// Checkbox semantics: deselects a selected resource, otherwise tries to
    /// select it.
    pub fn toggle<R>(
        &mut self,
        principal: Option<&Principal>,
        resource: &R,
    ) -> Result<SelectOutcome, SelectionError>
    where
        R: AccessControlled + ?Sized,
    {
        if self.deselect(resource.resource_id()) {
            Ok(SelectOutcome::Removed)
        } else {
            self.try_select(principal, resource)
        }
    }

    /// Replaces the contents with the bulk-selection guard's answer for
    /// `requested_ids`, computed for this set's action and cap.
    ///
    /// Returns the guard result so callers can surface the capped flag and
    /// denied ids.
    pub fn apply_bulk<R, S>(
        &mut self,
        principal: Option<&Principal>,
        resources: &[R],
        requested_ids: &[S],
    ) -> BulkSelection
    where
        R: AccessControlled,
        S: AsRef<str>,
    {
        let bulk = self
            .policy
            .select_for_bulk_action(principal, resources, self.action, requested_ids);
        self.ids = bulk.selected().to_vec();
        bulk
    }

    /// "Select all" for this set's action.
    pub fn select_all<R>(&mut self, principal: Option<&Principal>, resources: &[R]) -> BulkSelection
    where
        R: AccessControlled,
    {
        let bulk = self.policy.select_all_accessible(principal, resources, self.action);
        self.ids = bulk.selected().to_vec();
        bulk
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Every view change invalidates the selection.
    pub fn on_view_change(&mut self, change: ViewChange) {
        if !self.ids.is_empty() {
            debug!(?change, dropped = self.ids.len(), "Clearing selection");
        }
        self.clear();
    }
}
