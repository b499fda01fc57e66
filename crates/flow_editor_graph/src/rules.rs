// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin type match rules and per-category match policies.

use crate::category::PinCategory;
use bitflags::bitflags;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Rules applied when matching an output pin type against an input pin type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MatchRules: u8 {
        /// Categories must be equal, or the output category accepted by the policy.
        const REQUIRE_CATEGORY_MATCH = 1 << 0;
        /// Member references must be equal.
        const REQUIRE_MEMBER_REFERENCE_MATCH = 1 << 1;
        /// Container kinds must be equal.
        const REQUIRE_CONTAINER_MATCH = 1 << 2;
        /// Sub-category objects must be compatible.
        const REQUIRE_SUB_CATEGORY_OBJECT_MATCH = 1 << 3;
        /// A subclass sub-category object satisfies its base.
        const ALLOW_SUBCLASS_SUB_CATEGORY = 1 << 4;
        /// Structs with identical field layout are interchangeable.
        const ALLOW_SAME_LAYOUT_SUB_CATEGORY = 1 << 5;
        /// Same-layout structs must also agree on field names.
        const SAME_LAYOUT_REQUIRES_NAME_MATCH = 1 << 6;

        /// Default rules for most categories.
        const STANDARD = Self::REQUIRE_CATEGORY_MATCH.bits()
            | Self::REQUIRE_MEMBER_REFERENCE_MATCH.bits()
            | Self::ALLOW_SUBCLASS_SUB_CATEGORY.bits()
            | Self::ALLOW_SAME_LAYOUT_SUB_CATEGORY.bits();
        /// Standard rules plus sub-category object checking.
        const SUB_CATEGORY_OBJECT_STRICT = Self::STANDARD.bits()
            | Self::REQUIRE_SUB_CATEGORY_OBJECT_MATCH.bits();
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// How pins of one input category accept connections.
///
/// A policy is keyed by the category of the *input* pin. `accepted`
/// lists the *output* categories that may feed it in addition to the
/// input's own category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PinTypeMatchPolicy {
    /// Rules to apply
    pub rules: MatchRules,
    /// Output categories accepted besides an exact match
    #[serde(default)]
    pub accepted: IndexSet<PinCategory>,
}

impl PinTypeMatchPolicy {
    /// Create a policy with no accepted cross-categories
    pub fn new(rules: MatchRules) -> Self {
        Self {
            rules,
            accepted: IndexSet::new(),
        }
    }

    /// Add accepted output categories
    pub fn accepting(mut self, categories: impl IntoIterator<Item = PinCategory>) -> Self {
        self.accepted.extend(categories);
        self
    }

    /// Check if a rule is set
    pub fn has(&self, rule: MatchRules) -> bool {
        self.rules.contains(rule)
    }

    /// Check whether an output category can feed an input of `input` category
    pub fn accepts_category(&self, input: &PinCategory, output: &PinCategory) -> bool {
        input == output || self.accepted.contains(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(MatchRules::STANDARD.contains(MatchRules::REQUIRE_CATEGORY_MATCH));
        assert!(!MatchRules::STANDARD.contains(MatchRules::REQUIRE_SUB_CATEGORY_OBJECT_MATCH));
        assert!(!MatchRules::STANDARD.contains(MatchRules::REQUIRE_CONTAINER_MATCH));
        assert_eq!(
            MatchRules::SUB_CATEGORY_OBJECT_STRICT,
            MatchRules::STANDARD | MatchRules::REQUIRE_SUB_CATEGORY_OBJECT_MATCH
        );
    }

    #[test]
    fn test_accepts_category() {
        let policy = PinTypeMatchPolicy::new(MatchRules::STANDARD)
            .accepting([PinCategory::Int64, PinCategory::Float]);

        assert!(policy.accepts_category(&PinCategory::Int, &PinCategory::Int));
        assert!(policy.accepts_category(&PinCategory::Int, &PinCategory::Int64));
        assert!(!policy.accepts_category(&PinCategory::Int, &PinCategory::String));
    }

    #[test]
    fn test_policy_serialization() {
        let policy = PinTypeMatchPolicy::new(MatchRules::SUB_CATEGORY_OBJECT_STRICT)
            .accepting([PinCategory::Name]);
        let ron_str = ron::to_string(&policy).unwrap();
        let loaded: PinTypeMatchPolicy = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, policy);
    }
}
