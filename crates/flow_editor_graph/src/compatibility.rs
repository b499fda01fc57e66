// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin type compatibility.
//!
//! [`CompatibilityEngine::are_compatible`] decides whether an output pin may
//! feed an input pin. Rules come from the input pin's category policy and are
//! checked in a fixed order so the reported reason is deterministic:
//!
//! 1. category (exact or accepted cross-category)
//! 2. member reference
//! 3. container
//! 4. sub-category object (subclass, same layout, registered conversion)

use crate::category::PinCategory;
use crate::hierarchy::{StructConversions, TypeHierarchy};
use crate::pin::{ContainerType, MemberReference, Pin};
use crate::registry::PinTypeRegistry;
use crate::rules::{MatchRules, PinTypeMatchPolicy};
use crate::types::{TypeDescriptor, TypePath};

/// Reason two pins are not type compatible
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Incompatibility {
    /// Exactly one side is an execution pin
    #[error("Exec pins can only connect to other exec pins")]
    ExecMismatch,

    /// The input category has no match policy
    #[error("No pin type policy for category {0}")]
    NoPolicy(PinCategory),

    /// The output category is not accepted by the input
    #[error("Category {output} is not compatible with {input}")]
    CategoryMismatch {
        /// Output pin category
        output: PinCategory,
        /// Input pin category
        input: PinCategory,
    },

    /// Member references differ
    #[error("Member reference {output} does not match {input}")]
    MemberReferenceMismatch {
        /// Output pin member, or `none`
        output: String,
        /// Input pin member, or `none`
        input: String,
    },

    /// Container kinds differ
    #[error("Container {output:?} does not match {input:?}")]
    ContainerMismatch {
        /// Output pin container
        output: ContainerType,
        /// Input pin container
        input: ContainerType,
    },

    /// Both sides are classes and the output is not a subclass of the input
    #[error("Class {output} is not a subclass of {input}")]
    ClassMismatch {
        /// Output class
        output: TypePath,
        /// Input class
        input: TypePath,
    },

    /// Both sides are structs with no layout match or conversion
    #[error("Struct {output} cannot be converted to {input}")]
    StructMismatch {
        /// Output struct
        output: TypePath,
        /// Input struct
        input: TypePath,
    },

    /// The sub-category objects are of different kinds
    #[error("Sub-category {output} is not compatible with {input}")]
    SubCategoryMismatch {
        /// Output descriptor
        output: TypePath,
        /// Input descriptor
        input: TypePath,
    },
}

/// Result of a compatibility check
pub type Compatibility = Result<(), Incompatibility>;

/// Collaborators the engine consults about types.
///
/// Blanket-implemented for anything that answers both kinds of query.
pub trait TypeOracle: TypeHierarchy + StructConversions {}

impl<T: TypeHierarchy + StructConversions> TypeOracle for T {}

/// Decides whether an output pin may feed an input pin
#[derive(Clone, Copy)]
pub struct CompatibilityEngine<'a> {
    registry: &'a PinTypeRegistry,
    types: &'a dyn TypeOracle,
}

impl<'a> CompatibilityEngine<'a> {
    /// Create an engine over a policy registry and type collaborators
    pub fn new(registry: &'a PinTypeRegistry, types: &'a dyn TypeOracle) -> Self {
        Self { registry, types }
    }

    /// Check whether `output` may feed `input`.
    ///
    /// `context` is the declaring class of the node that owns the pins, used
    /// to scope struct conversions. With `ignore_array_mismatch` a container
    /// mismatch is waived when at least one side is an array.
    pub fn are_compatible(
        &self,
        output: &Pin,
        input: &Pin,
        context: Option<&TypePath>,
        ignore_array_mismatch: bool,
    ) -> Compatibility {
        if output.is_exec() || input.is_exec() {
            return if output.is_exec() && input.is_exec() {
                Ok(())
            } else {
                Err(Incompatibility::ExecMismatch)
            };
        }

        let policy = self
            .registry
            .lookup(&input.category)
            .ok_or_else(|| Incompatibility::NoPolicy(input.category.clone()))?;

        check_category(policy, output, input)?;
        check_member_reference(policy, output, input)?;
        check_container(policy, output, input, ignore_array_mismatch)?;

        if policy.has(MatchRules::REQUIRE_SUB_CATEGORY_OBJECT_MATCH) {
            self.sub_categories_compatible(
                policy.rules,
                output.sub_category_object.as_deref(),
                input.sub_category_object.as_deref(),
                context,
            )?;
        }

        Ok(())
    }

    /// Boolean form of [`Self::are_compatible`]; the reason is logged.
    pub fn is_compatible(
        &self,
        output: &Pin,
        input: &Pin,
        context: Option<&TypePath>,
        ignore_array_mismatch: bool,
    ) -> bool {
        match self.are_compatible(output, input, context, ignore_array_mismatch) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    "{} -> {} rejected: {reason}",
                    output.type_label(),
                    input.type_label()
                );
                false
            }
        }
    }

    /// Check whether an output sub-category object satisfies an input one
    pub fn sub_categories_compatible(
        &self,
        rules: MatchRules,
        output: Option<&TypeDescriptor>,
        input: Option<&TypeDescriptor>,
        context: Option<&TypePath>,
    ) -> Compatibility {
        // A missing input accepts anything; a missing output is a wildcard.
        let (Some(output), Some(input)) = (output, input) else {
            return Ok(());
        };

        let output = self.types.resolve_authoritative(output);
        let input = self.types.resolve_authoritative(input);

        if output.path == input.path {
            return Ok(());
        }

        if rules.contains(MatchRules::ALLOW_SUBCLASS_SUB_CATEGORY)
            && self.types.is_child_of(output, input)
        {
            return Ok(());
        }

        match (output.is_class(), input.is_class(), output.is_struct() && input.is_struct()) {
            (true, true, _) => Err(Incompatibility::ClassMismatch {
                output: output.path.clone(),
                input: input.path.clone(),
            }),
            (_, _, true) => {
                if rules.contains(MatchRules::ALLOW_SAME_LAYOUT_SUB_CATEGORY)
                    && output.same_layout(
                        input,
                        rules.contains(MatchRules::SAME_LAYOUT_REQUIRES_NAME_MATCH),
                    )
                {
                    return Ok(());
                }
                if self.types.has_conversion(&output.path, &input.path, context) {
                    return Ok(());
                }
                Err(Incompatibility::StructMismatch {
                    output: output.path.clone(),
                    input: input.path.clone(),
                })
            }
            _ => Err(Incompatibility::SubCategoryMismatch {
                output: output.path.clone(),
                input: input.path.clone(),
            }),
        }
    }
}

fn check_category(policy: &PinTypeMatchPolicy, output: &Pin, input: &Pin) -> Compatibility {
    if policy.has(MatchRules::REQUIRE_CATEGORY_MATCH)
        && !policy.accepts_category(&input.category, &output.category)
    {
        return Err(Incompatibility::CategoryMismatch {
            output: output.category.clone(),
            input: input.category.clone(),
        });
    }
    Ok(())
}

fn check_member_reference(policy: &PinTypeMatchPolicy, output: &Pin, input: &Pin) -> Compatibility {
    if policy.has(MatchRules::REQUIRE_MEMBER_REFERENCE_MATCH)
        && output.member_reference != input.member_reference
    {
        let describe = |member: &Option<MemberReference>| {
            member
                .as_ref()
                .map_or_else(|| "none".to_string(), ToString::to_string)
        };
        return Err(Incompatibility::MemberReferenceMismatch {
            output: describe(&output.member_reference),
            input: describe(&input.member_reference),
        });
    }
    Ok(())
}

fn check_container(
    policy: &PinTypeMatchPolicy,
    output: &Pin,
    input: &Pin,
    ignore_array_mismatch: bool,
) -> Compatibility {
    if !policy.has(MatchRules::REQUIRE_CONTAINER_MATCH) || output.container == input.container {
        return Ok(());
    }
    if ignore_array_mismatch && (output.is_array() || input.is_array()) {
        return Ok(());
    }
    Err(Incompatibility::ContainerMismatch {
        output: output.container,
        input: input.container,
    })
}
