// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (link) definitions for the graph.

use crate::node::NodeId;
use crate::pin::PinId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One end of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    /// Owning node
    pub node: NodeId,
    /// Pin on that node
    pub pin: PinId,
}

impl PinRef {
    /// Create a pin reference
    pub fn new(node: NodeId, pin: PinId) -> Self {
        Self { node, pin }
    }
}

/// A link from an output pin to an input pin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source (output) pin ID
    pub from_pin: PinId,
    /// Target node ID
    pub to_node: NodeId,
    /// Target (input) pin ID
    pub to_pin: PinId,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: PinRef, to: PinRef) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node: from.node,
            from_pin: from.pin,
            to_node: to.node,
            to_pin: to.pin,
        }
    }

    /// Source end
    pub fn source(&self) -> PinRef {
        PinRef::new(self.from_node, self.from_pin)
    }

    /// Target end
    pub fn target(&self) -> PinRef {
        PinRef::new(self.to_node, self.to_pin)
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Check if this connection involves a specific pin
    pub fn involves_pin(&self, pin_id: PinId) -> bool {
        self.from_pin == pin_id || self.to_pin == pin_id
    }

    /// Check if this connection joins exactly these two pins
    pub fn links(&self, output: PinId, input: PinId) -> bool {
        self.from_pin == output && self.to_pin == input
    }
}

/// Verdict for a proposed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectResponse {
    /// Connect as-is
    Allow,
    /// Connect after breaking the output pin's existing links
    AllowBreakingOutputLinks,
    /// Connect after breaking the input pin's existing links
    AllowBreakingInputLinks,
    /// Do not connect
    Disallow,
}

/// Verdict plus a human readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionResponse {
    /// Verdict
    pub response: ConnectResponse,
    /// Reason shown to the user
    pub message: String,
}

impl ConnectionResponse {
    /// Create a response
    pub fn new(response: ConnectResponse, message: impl Into<String>) -> Self {
        Self {
            response,
            message: message.into(),
        }
    }

    /// Allow without side effects
    pub fn allow() -> Self {
        Self::new(ConnectResponse::Allow, "")
    }

    /// Disallow with a reason
    pub fn disallow(message: impl Into<String>) -> Self {
        Self::new(ConnectResponse::Disallow, message)
    }

    /// Whether the connection may be made
    pub fn is_allowed(&self) -> bool {
        self.response != ConnectResponse::Disallow
    }
}

impl fmt::Display for ConnectionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.response)
        } else {
            write!(f, "{:?}: {}", self.response, self.message)
        }
    }
}
