//! Territory view of a principal.
//!
//! [`TerritoryAccess`] answers "which territories may this principal see"
//! independently of any particular resource. It borrows the principal's
//! territory set, so computing it once per collection pass is free of
//! allocation.

use crate::types::{Principal, Role};
use std::collections::BTreeSet;

static NO_TERRITORIES: BTreeSet<String> = BTreeSet::new();

/// What a principal may see, expressed in territories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerritoryAccess<'a> {
    territories: &'a BTreeSet<String>,
    has_full_access: bool,
}

impl<'a> TerritoryAccess<'a> {
    /// Access to nothing.
    pub fn none() -> Self {
        Self {
            territories: &NO_TERRITORIES,
            has_full_access: false,
        }
    }

    pub fn territories(&self) -> &'a BTreeSet<String> {
        self.territories
    }

    /// True iff the principal is an admin.
    pub fn has_full_access(&self) -> bool {
        self.has_full_access
    }

    /// Exact, case-sensitive membership test. Always true with full access.
    pub fn can_access_territory(&self, territory: &str) -> bool {
        self.has_full_access || self.territories.contains(territory)
    }
}

/// Builds the territory view for a principal.
///
/// An absent or unauthenticated principal gets access to nothing.
pub fn territory_access_for(principal: Option<&Principal>) -> TerritoryAccess<'_> {
    match principal {
        Some(p) if p.is_authenticated() => TerritoryAccess {
            territories: p.territories(),
            has_full_access: p.role() == Role::Admin,
        },
        _ => TerritoryAccess::none(),
    }
}
