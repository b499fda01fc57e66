// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection legality and side-effect resolution.
//!
//! The resolver only decides. Applying the verdict (breaking links, making
//! the new one, notifying nodes) is left to the caller, so a rejected or
//! aborted edit never leaves the graph half-modified.

use crate::compatibility::CompatibilityEngine;
use crate::connection::{ConnectResponse, ConnectionResponse};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinId};
use crate::types::TypePath;

/// The node side of a connection query
pub trait PinOwner {
    /// ID of the owning node
    fn node_id(&self) -> NodeId;

    /// Class declaring the node, used to scope struct conversions
    fn declaring_class(&self) -> Option<&TypePath> {
        None
    }

    /// Veto a specific pairing of one of this node's pins with another pin.
    ///
    /// Returns the message to show the user when vetoed.
    fn veto_connection(&self, _own: &Pin, _other: &Pin) -> Option<String> {
        None
    }
}

impl PinOwner for Node {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn declaring_class(&self) -> Option<&TypePath> {
        self.declaring_class.as_ref()
    }
}

/// Existing links the resolver needs to know about
pub trait LinkQuery {
    /// Whether `output` is already linked to `input`
    fn is_linked(&self, output: PinId, input: PinId) -> bool;

    /// Whether a pin has any link at all
    fn has_links(&self, pin: PinId) -> bool;
}

/// Order two pins as `(output, input)`, or `None` if directions do not pair up
pub fn order_pins<'p>(a: &'p Pin, b: &'p Pin) -> Option<(&'p Pin, &'p Pin)> {
    match (a.is_input(), b.is_input()) {
        (false, true) => Some((a, b)),
        (true, false) => Some((b, a)),
        _ => None,
    }
}

/// Decides whether two pins may be linked and what must be broken to do so
#[derive(Clone, Copy)]
pub struct ConnectionResolver<'a> {
    engine: CompatibilityEngine<'a>,
}

impl<'a> ConnectionResolver<'a> {
    /// Create a resolver on top of a compatibility engine
    pub fn new(engine: CompatibilityEngine<'a>) -> Self {
        Self { engine }
    }

    /// Resolve a proposed link between `pin_a` (on `owner_a`) and `pin_b` (on `owner_b`)
    pub fn resolve(
        &self,
        pin_a: &Pin,
        pin_b: &Pin,
        owner_a: &dyn PinOwner,
        owner_b: &dyn PinOwner,
        links: &dyn LinkQuery,
    ) -> ConnectionResponse {
        let response = self.decide(pin_a, pin_b, owner_a, owner_b, links);
        tracing::debug!("Connect {} -> {}: {response}", pin_a.name, pin_b.name);
        response
    }

    fn decide(
        &self,
        pin_a: &Pin,
        pin_b: &Pin,
        owner_a: &dyn PinOwner,
        owner_b: &dyn PinOwner,
        links: &dyn LinkQuery,
    ) -> ConnectionResponse {
        if owner_a.node_id() == owner_b.node_id() {
            return ConnectionResponse::disallow("Both are on the same node");
        }

        if pin_a.orphaned || pin_b.orphaned {
            return ConnectionResponse::disallow("Cannot make new connections to orphaned pin");
        }

        if let Some(message) = owner_a
            .veto_connection(pin_a, pin_b)
            .or_else(|| owner_b.veto_connection(pin_b, pin_a))
        {
            return ConnectionResponse::disallow(message);
        }

        let Some((output, input)) = order_pins(pin_a, pin_b) else {
            return ConnectionResponse::disallow("Directions are not compatible");
        };
        let (output_owner, input_owner) = if output.id == pin_a.id {
            (owner_a, owner_b)
        } else {
            (owner_b, owner_a)
        };

        let context = input_owner
            .declaring_class()
            .or_else(|| output_owner.declaring_class());
        if let Err(reason) = self.engine.are_compatible(output, input, context, false) {
            return ConnectionResponse::disallow(format!("Pins are not compatible: {reason}"));
        }

        if links.is_linked(output.id, input.id) {
            return ConnectionResponse::allow();
        }

        // Exec outputs fan out to a single input; data inputs take a single link.
        // Exec inputs may gather any number of sources.
        if input.is_exec() && links.has_links(output.id) {
            return ConnectionResponse::new(
                ConnectResponse::AllowBreakingOutputLinks,
                "Replace existing output connections",
            );
        }
        if !input.is_exec() && links.has_links(input.id) {
            return ConnectionResponse::new(
                ConnectResponse::AllowBreakingInputLinks,
                "Replace existing input connections",
            );
        }

        ConnectionResponse::allow()
    }
}
