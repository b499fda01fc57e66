// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! The graph stores links but never judges them; legality is decided by
//! [`crate::schema::FlowSchema`].

use crate::connection::{Connection, ConnectionId, PinRef};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinId};
use crate::resolver::LinkQuery;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A Flow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get a pin by reference
    pub fn pin(&self, pin: PinRef) -> Option<&Pin> {
        self.node(pin.node)?.pin(pin.pin)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Store a link from `output` to `input` without any validation.
    ///
    /// Returns the existing connection if the two pins are already linked.
    /// Use [`crate::schema::FlowSchema::try_create_connection`] for edits
    /// coming from the user.
    pub fn insert_link(&mut self, output: PinRef, input: PinRef) -> ConnectionId {
        if let Some(existing) = self.find_connection(output.pin, input.pin) {
            return existing.id;
        }
        debug_assert!(self.pin(output).is_some(), "link from unknown pin");
        debug_assert!(self.pin(input).is_some(), "link to unknown pin");

        let connection = Connection::new(output, input);
        let id = connection.id;
        self.connections.insert(id, connection);
        id
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Find the connection joining two pins
    pub fn find_connection(&self, output: PinId, input: PinId) -> Option<&Connection> {
        self.connections.values().find(|c| c.links(output, input))
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections from a specific pin
    pub fn connections_from(&self, pin_id: PinId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from_pin == pin_id)
    }

    /// Get connections to a specific pin
    pub fn connections_to(&self, pin_id: PinId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to_pin == pin_id)
    }

    /// Get connections touching a specific pin
    pub fn connections_for_pin(&self, pin_id: PinId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_pin(pin_id))
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Mark a pin as orphaned: no longer declared but kept for its links.
    ///
    /// Returns `false` if the pin does not exist.
    pub fn orphan_pin(&mut self, pin: PinRef) -> bool {
        match self.node_mut(pin.node).and_then(|n| n.pin_mut(pin.pin)) {
            Some(pin) => {
                pin.orphaned = true;
                true
            }
            None => false,
        }
    }

    /// Remove `pin` if it is orphaned and has no links left
    pub fn remove_orphan_if_unlinked(&mut self, pin: PinRef) -> bool {
        let removable = self.pin(pin).is_some_and(|p| p.orphaned) && !self.has_links(pin.pin);
        if removable {
            if let Some(node) = self.node_mut(pin.node) {
                node.remove_pin(pin.pin);
            }
        }
        removable
    }

    /// Remove every orphaned pin without links, returning what was removed
    pub fn remove_orphaned_pins_without_links(&mut self) -> Vec<PinRef> {
        let candidates: Vec<PinRef> = self
            .nodes
            .values()
            .flat_map(|node| {
                node.pins()
                    .filter(|p| p.orphaned)
                    .map(move |p| PinRef::new(node.id, p.id))
            })
            .collect();

        candidates
            .into_iter()
            .filter(|pin| self.remove_orphan_if_unlinked(*pin))
            .collect()
    }

    /// Find connections whose ends no longer exist or point the wrong way.
    ///
    /// A non-empty result means the graph model is corrupt.
    pub fn dangling_connections(&self) -> Vec<ConnectionId> {
        self.connections
            .values()
            .filter(|c| {
                let from_ok = self.pin(c.source()).is_some_and(|p| !p.is_input());
                let to_ok = self.pin(c.target()).is_some_and(Pin::is_input);
                !(from_ok && to_ok)
            })
            .map(|c| c.id)
            .collect()
    }
}

impl LinkQuery for Graph {
    fn is_linked(&self, output: PinId, input: PinId) -> bool {
        self.find_connection(output, input).is_some()
    }

    fn has_links(&self, pin: PinId) -> bool {
        self.connections_for_pin(pin).next().is_some()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating or breaking a connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Pin not found
    #[error("Pin not found: {0:?}")]
    PinNotFound(PinId),

    /// The schema rejected the connection
    #[error("Connection not allowed: {0}")]
    Disallowed(String),
}
