// SPDX-License-Identifier: MIT OR Apache-2.0
//! Type descriptors refining a pin category.
//!
//! A descriptor is what an `Object` pin points at (a class), what an
//! `InstancedStruct` pin holds (a struct), and so on. Descriptors carry
//! their kind and ancestry explicitly; nothing is discovered at runtime.

use crate::category::PinCategory;
use crate::pin::ContainerType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified path of a type, e.g. `/Script/Flow.FlowNode`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypePath(pub String);

impl TypePath {
    /// Create a new type path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Kind of a type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorKind {
    /// Plain value type (enums and the like)
    Scalar,
    /// Class with single-inheritance ancestry
    Class,
    /// Struct with a field layout
    Struct,
}

/// One field of a struct layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Field name
    pub name: String,
    /// Field category
    pub category: PinCategory,
    /// Field container kind
    #[serde(default)]
    pub container: ContainerType,
    /// Nested type, for struct or object fields
    #[serde(default)]
    pub sub_type: Option<TypePath>,
}

impl FieldLayout {
    /// Create a single-value field
    pub fn new(name: impl Into<String>, category: PinCategory) -> Self {
        Self {
            name: name.into(),
            category,
            container: ContainerType::Single,
            sub_type: None,
        }
    }

    /// Whether two fields occupy the same slot type, ignoring names
    fn same_shape(&self, other: &FieldLayout) -> bool {
        self.category == other.category
            && self.container == other.container
            && self.sub_type == other.sub_type
    }
}

/// Descriptor of a class, struct or scalar type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type path
    pub path: TypePath,
    /// Kind tag
    pub kind: DescriptorKind,
    /// Parent type (classes and structs may both inherit)
    #[serde(default)]
    pub parent: Option<TypePath>,
    /// Field layout (structs only)
    #[serde(default)]
    pub fields: Vec<FieldLayout>,
}

impl TypeDescriptor {
    /// Create a class descriptor
    pub fn class(path: impl Into<TypePath>) -> Self {
        Self::with_kind(path, DescriptorKind::Class)
    }

    /// Create a struct descriptor
    pub fn structure(path: impl Into<TypePath>) -> Self {
        Self::with_kind(path, DescriptorKind::Struct)
    }

    /// Create a scalar descriptor
    pub fn scalar(path: impl Into<TypePath>) -> Self {
        Self::with_kind(path, DescriptorKind::Scalar)
    }

    fn with_kind(path: impl Into<TypePath>, kind: DescriptorKind) -> Self {
        Self {
            path: path.into(),
            kind,
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Set the parent type
    pub fn with_parent(mut self, parent: impl Into<TypePath>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Append a field
    pub fn with_field(mut self, name: impl Into<String>, category: PinCategory) -> Self {
        self.fields.push(FieldLayout::new(name, category));
        self
    }

    /// Append a fully described field
    pub fn with_field_layout(mut self, field: FieldLayout) -> Self {
        self.fields.push(field);
        self
    }

    /// Whether this descriptor is a class
    pub fn is_class(&self) -> bool {
        self.kind == DescriptorKind::Class
    }

    /// Whether this descriptor is a struct
    pub fn is_struct(&self) -> bool {
        self.kind == DescriptorKind::Struct
    }

    /// Check if two structs have field-for-field identical layout.
    ///
    /// Field names are compared only when `require_names` is set. Empty
    /// structs never match another struct by layout.
    pub fn same_layout(&self, other: &TypeDescriptor, require_names: bool) -> bool {
        if !self.is_struct() || !other.is_struct() {
            return false;
        }
        if self.fields.is_empty() || self.fields.len() != other.fields.len() {
            return false;
        }

        self.fields.iter().zip(&other.fields).all(|(a, b)| {
            a.same_shape(b) && (!require_names || a.name == b.name)
        })
    }
}
