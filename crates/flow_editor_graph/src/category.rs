// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin categories: the declared data kind of a pin.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data kind carried by a pin
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PinCategory {
    /// Execution flow
    Exec,
    /// Unresolved or unspecified category
    Unknown,
    /// Boolean value
    Bool,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Int64,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Enumeration (refined by its enum descriptor)
    Enum,
    /// Name identifier
    Name,
    /// String value
    String,
    /// Localizable text
    Text,
    /// 3D vector
    Vector,
    /// Rotation
    Rotator,
    /// Location, rotation and scale
    Transform,
    /// Single gameplay tag
    GameplayTag,
    /// Set of gameplay tags
    GameplayTagContainer,
    /// Struct instance of a dynamic struct type
    InstancedStruct,
    /// Object reference (refined by its class descriptor)
    Object,
    /// Class reference (refined by its base class descriptor)
    Class,
    /// User-defined category
    Custom(String),
}

impl PinCategory {
    /// Every built-in data category, in table order
    pub const BUILT_IN: [PinCategory; 17] = [
        PinCategory::Bool,
        PinCategory::Int,
        PinCategory::Int64,
        PinCategory::Float,
        PinCategory::Double,
        PinCategory::Enum,
        PinCategory::Name,
        PinCategory::String,
        PinCategory::Text,
        PinCategory::Vector,
        PinCategory::Rotator,
        PinCategory::Transform,
        PinCategory::GameplayTag,
        PinCategory::GameplayTagContainer,
        PinCategory::InstancedStruct,
        PinCategory::Object,
        PinCategory::Class,
    ];

    /// Numeric categories, freely convertible between each other
    pub const NUMERIC: [PinCategory; 4] = [
        PinCategory::Int,
        PinCategory::Int64,
        PinCategory::Float,
        PinCategory::Double,
    ];

    /// Create a user-defined category
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Whether this is the execution flow category
    pub fn is_exec(&self) -> bool {
        matches!(self, Self::Exec)
    }

    /// Whether this is one of the numeric categories
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Int64 | Self::Float | Self::Double)
    }

    /// Canonical name of the category
    pub fn name(&self) -> &str {
        match self {
            Self::Exec => "Exec",
            Self::Unknown => "Unknown",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Int64 => "Int64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Enum => "Enum",
            Self::Name => "Name",
            Self::String => "String",
            Self::Text => "Text",
            Self::Vector => "Vector",
            Self::Rotator => "Rotator",
            Self::Transform => "Transform",
            Self::GameplayTag => "GameplayTag",
            Self::GameplayTagContainer => "GameplayTagContainer",
            Self::InstancedStruct => "InstancedStruct",
            Self::Object => "Object",
            Self::Class => "Class",
            Self::Custom(name) => name,
        }
    }

    /// Get the color for this category (for UI)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Exec => [255, 255, 255],
            Self::Bool => [146, 0, 0],
            Self::Int => [31, 224, 172],
            Self::Int64 => [172, 224, 172],
            Self::Float | Self::Double => [160, 252, 70],
            Self::Enum => [0, 108, 96],
            Self::Name => [200, 124, 255],
            Self::String => [250, 0, 208],
            Self::Text => [226, 122, 144],
            Self::Vector => [250, 200, 30],
            Self::Rotator => [160, 176, 255],
            Self::Transform => [250, 110, 0],
            Self::GameplayTag | Self::GameplayTagContainer => [80, 160, 220],
            Self::InstancedStruct => [0, 72, 160],
            Self::Object => [0, 160, 240],
            Self::Class => [136, 0, 200],
            Self::Unknown | Self::Custom(_) => [128, 128, 128],
        }
    }
}

impl fmt::Display for PinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PinCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "Exec" => Self::Exec,
            "Unknown" | "" => Self::Unknown,
            "Bool" => Self::Bool,
            "Int" => Self::Int,
            "Int64" => Self::Int64,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "Enum" => Self::Enum,
            "Name" => Self::Name,
            "String" => Self::String,
            "Text" => Self::Text,
            "Vector" => Self::Vector,
            "Rotator" => Self::Rotator,
            "Transform" => Self::Transform,
            "GameplayTag" => Self::GameplayTag,
            "GameplayTagContainer" => Self::GameplayTagContainer,
            "InstancedStruct" => Self::InstancedStruct,
            "Object" => Self::Object,
            "Class" => Self::Class,
            other => Self::Custom(other.to_string()),
        };
        Ok(category)
    }
}
