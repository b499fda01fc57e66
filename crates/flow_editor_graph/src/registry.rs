// SPDX-License-Identifier: MIT OR Apache-2.0
//! Category to match-policy registry.
//!
//! The built-in table is populated lazily on first lookup and cached for
//! the rest of the session. Overrides live in a separate table that is
//! consulted first, so repopulating the built-ins never loses them.

use crate::category::PinCategory;
use crate::rules::{MatchRules, PinTypeMatchPolicy};
use indexmap::IndexMap;
use std::cell::OnceCell;

/// Registry of pin type match policies, keyed by input category
#[derive(Debug, Default)]
pub struct PinTypeRegistry {
    /// Lazily populated built-in policies
    built_in: OnceCell<IndexMap<PinCategory, PinTypeMatchPolicy>>,
    /// Externally registered policies, taking precedence over built-ins
    overrides: IndexMap<PinCategory, PinTypeMatchPolicy>,
}

impl PinTypeRegistry {
    /// Create a registry with only the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given overrides on top of the built-in table
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (PinCategory, PinTypeMatchPolicy)>,
    ) -> Self {
        let mut registry = Self::new();
        for (category, policy) in overrides {
            registry.register_override(category, policy);
        }
        registry
    }

    /// Look up the policy for an input category.
    ///
    /// `None` means the category is unknown and any connection into it
    /// must be disallowed.
    pub fn lookup(&self, category: &PinCategory) -> Option<&PinTypeMatchPolicy> {
        self.overrides
            .get(category)
            .or_else(|| self.built_in().get(category))
    }

    /// Register a policy, replacing any built-in or earlier override
    pub fn register_override(&mut self, category: PinCategory, policy: PinTypeMatchPolicy) {
        if self.built_in().contains_key(&category) {
            tracing::warn!("Overriding built-in pin type policy for {category}");
        }
        self.overrides.insert(category, policy);
    }

    /// Remove an override, falling back to the built-in policy if any
    pub fn remove_override(&mut self, category: &PinCategory) -> Option<PinTypeMatchPolicy> {
        self.overrides.shift_remove(category)
    }

    /// Get the registered overrides
    pub fn overrides(&self) -> impl Iterator<Item = (&PinCategory, &PinTypeMatchPolicy)> {
        self.overrides.iter()
    }

    /// Drop the cached built-in table; it is rebuilt on next access.
    ///
    /// Overrides are untouched.
    pub fn reinitialize(&mut self) {
        self.built_in = OnceCell::new();
    }

    /// Whether the built-in table has been populated yet
    pub fn is_populated(&self) -> bool {
        self.built_in.get().is_some()
    }

    /// All categories with a policy, overrides first
    pub fn categories(&self) -> impl Iterator<Item = &PinCategory> {
        let overrides = &self.overrides;
        overrides.keys().chain(
            self.built_in()
                .keys()
                .filter(move |category| !overrides.contains_key(*category)),
        )
    }

    fn built_in(&self) -> &IndexMap<PinCategory, PinTypeMatchPolicy> {
        self.built_in.get_or_init(|| {
            let table = built_in_policies();
            tracing::trace!("Populated {} built-in pin type policies", table.len());
            table
        })
    }
}

/// Build the built-in policy table
pub fn built_in_policies() -> IndexMap<PinCategory, PinTypeMatchPolicy> {
    use PinCategory as C;

    let numeric_peers = |own: PinCategory| {
        PinTypeMatchPolicy::new(MatchRules::STANDARD)
            .accepting(C::NUMERIC.into_iter().filter(move |c| *c != own))
    };
    let everything_but_string = C::BUILT_IN.into_iter().filter(|c| *c != C::String);

    let mut table = IndexMap::new();
    table.insert(C::Bool, PinTypeMatchPolicy::new(MatchRules::STANDARD));
    table.insert(C::Int, numeric_peers(C::Int));
    table.insert(C::Int64, numeric_peers(C::Int64));
    table.insert(C::Float, numeric_peers(C::Float));
    table.insert(C::Double, numeric_peers(C::Double));
    table.insert(
        C::Enum,
        PinTypeMatchPolicy::new(MatchRules::SUB_CATEGORY_OBJECT_STRICT),
    );
    table.insert(
        C::Name,
        PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting([C::String, C::Text]),
    );
    table.insert(
        C::String,
        PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting(everything_but_string),
    );
    table.insert(
        C::Text,
        PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting([C::String, C::Name]),
    );
    table.insert(C::Vector, PinTypeMatchPolicy::new(MatchRules::STANDARD));
    table.insert(C::Rotator, PinTypeMatchPolicy::new(MatchRules::STANDARD));
    table.insert(C::Transform, PinTypeMatchPolicy::new(MatchRules::STANDARD));
    table.insert(
        C::GameplayTag,
        PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting([C::GameplayTagContainer]),
    );
    table.insert(
        C::GameplayTagContainer,
        PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting([C::GameplayTag]),
    );
    table.insert(
        C::InstancedStruct,
        PinTypeMatchPolicy::new(MatchRules::SUB_CATEGORY_OBJECT_STRICT),
    );
    table.insert(
        C::Object,
        PinTypeMatchPolicy::new(MatchRules::SUB_CATEGORY_OBJECT_STRICT),
    );
    table.insert(
        C::Class,
        PinTypeMatchPolicy::new(MatchRules::SUB_CATEGORY_OBJECT_STRICT),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_population() {
        let registry = PinTypeRegistry::new();
        assert!(!registry.is_populated());
        assert!(registry.lookup(&PinCategory::Bool).is_some());
        assert!(registry.is_populated());
    }

    #[test]
    fn test_every_built_in_has_a_policy() {
        let registry = PinTypeRegistry::new();
        for category in &PinCategory::BUILT_IN {
            assert!(registry.lookup(category).is_some(), "missing {category}");
        }
        assert_eq!(registry.categories().count(), PinCategory::BUILT_IN.len());
    }

    #[test]
    fn test_unknown_categories_have_no_policy() {
        let registry = PinTypeRegistry::new();
        assert!(registry.lookup(&PinCategory::Unknown).is_none());
        assert!(registry.lookup(&PinCategory::Exec).is_none());
        assert!(registry.lookup(&PinCategory::custom("Quest")).is_none());
    }

    #[test]
    fn test_string_asymmetry() {
        let registry = PinTypeRegistry::new();
        let string = registry.lookup(&PinCategory::String).unwrap();
        assert!(string.accepted.contains(&PinCategory::Vector));
        assert!(string.accepted.contains(&PinCategory::Bool));

        let vector = registry.lookup(&PinCategory::Vector).unwrap();
        assert!(!vector.accepted.contains(&PinCategory::String));

        let name = registry.lookup(&PinCategory::Name).unwrap();
        assert!(name.accepted.contains(&PinCategory::String));
    }

    #[test]
    fn test_overrides_survive_reinitialize() {
        let mut registry = PinTypeRegistry::new();
        registry.register_override(
            PinCategory::custom("Quest"),
            PinTypeMatchPolicy::new(MatchRules::STANDARD),
        );
        registry.register_override(
            PinCategory::Vector,
            PinTypeMatchPolicy::new(MatchRules::STANDARD).accepting([PinCategory::Rotator]),
        );

        registry.reinitialize();
        assert!(!registry.is_populated());

        assert!(registry.lookup(&PinCategory::custom("Quest")).is_some());
        let vector = registry.lookup(&PinCategory::Vector).unwrap();
        assert!(vector.accepted.contains(&PinCategory::Rotator));
        assert_eq!(registry.categories().count(), PinCategory::BUILT_IN.len() + 1);
    }

    #[test]
    fn test_remove_override_restores_built_in() {
        let mut registry = PinTypeRegistry::new();
        registry.register_override(PinCategory::Bool, PinTypeMatchPolicy::default());
        registry.remove_override(&PinCategory::Bool);
        assert_eq!(
            registry.lookup(&PinCategory::Bool),
            Some(&PinTypeMatchPolicy::new(MatchRules::STANDARD))
        );
    }
}
