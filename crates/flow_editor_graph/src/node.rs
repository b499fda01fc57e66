// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for Flow graphs.

use crate::pin::{Pin, PinDirection, PinId};
use crate::types::TypePath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Entry and exit points
    Route,
    /// Branching and sequencing
    FlowControl,
    /// Gameplay tag operations
    GameplayTags,
    /// World interaction
    World,
    /// Debugging helpers
    Developer,
    /// Custom/user-defined
    Custom,
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Class declaring the node, scoping struct conversions
    pub declaring_class: Option<TypePath>,
    /// Default input pins
    pub inputs: Vec<Pin>,
    /// Default output pins
    pub outputs: Vec<Pin>,
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Display name (can be customized)
    pub name: String,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Class declaring the node
    pub declaring_class: Option<TypePath>,
    /// Input pins
    pub inputs: Vec<Pin>,
    /// Output pins
    pub outputs: Vec<Pin>,
}

impl Node {
    /// Create a new node from a type definition.
    ///
    /// Pins get fresh IDs so several nodes of one type never share a pin.
    pub fn new(node_type: &NodeType) -> Self {
        let fresh = |pins: &[Pin]| -> Vec<Pin> {
            pins.iter()
                .map(|pin| Pin {
                    id: PinId::new(),
                    ..pin.clone()
                })
                .collect()
        };

        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            name: node_type.name.clone(),
            position: [0.0, 0.0],
            declaring_class: node_type.declaring_class.clone(),
            inputs: fresh(&node_type.inputs),
            outputs: fresh(&node_type.outputs),
        }
    }

    /// Create an empty node with a name, for hand-built graphs
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: NodeId::new(),
            node_type: name.clone(),
            name,
            position: [0.0, 0.0],
            declaring_class: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the declaring class
    pub fn with_declaring_class(mut self, class: impl Into<TypePath>) -> Self {
        self.declaring_class = Some(class.into());
        self
    }

    /// Add a pin, sorted into inputs or outputs by its direction
    pub fn with_pin(mut self, pin: Pin) -> Self {
        match pin.direction {
            PinDirection::Input => self.inputs.push(pin),
            PinDirection::Output => self.outputs.push(pin),
        }
        self
    }

    /// Get an input pin by index
    pub fn input(&self, index: usize) -> Option<&Pin> {
        self.inputs.get(index)
    }

    /// Get an output pin by index
    pub fn output(&self, index: usize) -> Option<&Pin> {
        self.outputs.get(index)
    }

    /// Find a pin by name and direction
    pub fn find_pin(&self, name: &str, direction: PinDirection) -> Option<&Pin> {
        let pins = match direction {
            PinDirection::Input => &self.inputs,
            PinDirection::Output => &self.outputs,
        };
        pins.iter().find(|p| p.name == name)
    }

    /// Get a pin by ID
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.inputs
            .iter()
            .find(|p| p.id == pin_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == pin_id))
    }

    /// Get a mutable pin by ID
    pub fn pin_mut(&mut self, pin_id: PinId) -> Option<&mut Pin> {
        self.inputs
            .iter_mut()
            .chain(self.outputs.iter_mut())
            .find(|p| p.id == pin_id)
    }

    /// Remove a pin by ID
    pub fn remove_pin(&mut self, pin_id: PinId) -> Option<Pin> {
        if let Some(index) = self.inputs.iter().position(|p| p.id == pin_id) {
            return Some(self.inputs.remove(index));
        }
        let index = self.outputs.iter().position(|p| p.id == pin_id)?;
        Some(self.outputs.remove(index))
    }

    /// Get all pins
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// Registry of available node types
#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}
