// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::category::PinCategory;
use crate::types::{TypeDescriptor, TypePath};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

impl PinDirection {
    /// The opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Container kind of a pin value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContainerType {
    /// Single value
    #[default]
    Single,
    /// Array of values
    Array,
}

/// Reference to the class member a pin is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberReference {
    /// Class declaring the member
    pub parent: Option<TypePath>,
    /// Member name
    pub name: String,
}

impl MemberReference {
    /// Create a member reference
    pub fn new(parent: Option<TypePath>, name: impl Into<String>) -> Self {
        Self {
            parent,
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{parent}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A pin on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Pin name
    pub name: String,
    /// Pin direction
    pub direction: PinDirection,
    /// Data category
    pub category: PinCategory,
    /// Type refining the category (class of an object pin, struct of a struct pin)
    #[serde(default)]
    pub sub_category_object: Option<Arc<TypeDescriptor>>,
    /// Container kind
    #[serde(default)]
    pub container: ContainerType,
    /// Bound member, if any
    #[serde(default)]
    pub member_reference: Option<MemberReference>,
    /// Pin no longer declared by its node but kept alive for its links
    #[serde(default)]
    pub orphaned: bool,
}

impl Pin {
    /// Create a new pin
    pub fn new(name: impl Into<String>, category: PinCategory, direction: PinDirection) -> Self {
        Self {
            id: PinId::new(),
            name: name.into(),
            direction,
            category,
            sub_category_object: None,
            container: ContainerType::Single,
            member_reference: None,
            orphaned: false,
        }
    }

    /// Create a new input pin
    pub fn input(name: impl Into<String>, category: PinCategory) -> Self {
        Self::new(name, category, PinDirection::Input)
    }

    /// Create a new output pin
    pub fn output(name: impl Into<String>, category: PinCategory) -> Self {
        Self::new(name, category, PinDirection::Output)
    }

    /// Create an execution input pin
    pub fn exec_input(name: impl Into<String>) -> Self {
        Self::input(name, PinCategory::Exec)
    }

    /// Create an execution output pin
    pub fn exec_output(name: impl Into<String>) -> Self {
        Self::output(name, PinCategory::Exec)
    }

    /// Set the sub-category object
    pub fn with_sub_category(mut self, descriptor: impl Into<Arc<TypeDescriptor>>) -> Self {
        self.sub_category_object = Some(descriptor.into());
        self
    }

    /// Make this an array pin
    pub fn array(mut self) -> Self {
        self.container = ContainerType::Array;
        self
    }

    /// Bind the pin to a class member
    pub fn with_member_reference(mut self, member: MemberReference) -> Self {
        self.member_reference = Some(member);
        self
    }

    /// Whether this is an execution pin
    pub fn is_exec(&self) -> bool {
        self.category.is_exec()
    }

    /// Whether this is an input pin
    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    /// Whether this is an array pin
    pub fn is_array(&self) -> bool {
        self.container == ContainerType::Array
    }

    /// Human readable type, e.g. `Object<Actor>[]`
    pub fn type_label(&self) -> String {
        let mut label = self.category.to_string();
        if let Some(sub) = &self.sub_category_object {
            label.push('<');
            label.push_str(sub.path.as_str());
            label.push('>');
        }
        if self.is_array() {
            label.push_str("[]");
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_builders() {
        let pin = Pin::input("Targets", PinCategory::Object)
            .with_sub_category(TypeDescriptor::class("Actor"))
            .array();

        assert!(pin.is_input());
        assert!(pin.is_array());
        assert!(!pin.is_exec());
        assert_eq!(pin.type_label(), "Object<Actor>[]");
        assert!(Pin::exec_output("Out").is_exec());
    }

    #[test]
    fn test_member_reference_display() {
        let member = MemberReference::new(Some(TypePath::new("FlowNode_Log")), "Message");
        assert_eq!(member.to_string(), "FlowNode_Log::Message");
        assert_eq!(MemberReference::new(None, "Value").to_string(), "Value");
    }
}
