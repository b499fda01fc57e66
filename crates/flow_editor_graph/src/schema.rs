// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flow graph schema.
//!
//! [`FlowSchema`] is built once per editor session and passed by reference
//! wherever pin links are judged or edited. It owns the pin type policies
//! and the type catalog, and applies resolver verdicts to a [`Graph`].

use crate::compatibility::CompatibilityEngine;
use crate::connection::{ConnectResponse, ConnectionId, ConnectionResponse, PinRef};
use crate::graph::{ConnectionError, Graph};
use crate::hierarchy::TypeCatalog;
use crate::node::{Node, NodeId};
use crate::pin::Pin;
use crate::registry::PinTypeRegistry;
use crate::resolver::{order_pins, ConnectionResolver};

/// Receives change notifications when links are made or broken
pub trait GraphObserver {
    /// The links of `pin` on `node` changed
    fn on_pin_links_changed(&mut self, node: NodeId, pin: PinRef);

    /// An orphaned pin lost its last link and was removed
    fn on_orphan_removed(&mut self, _pin: PinRef) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GraphObserver for NoopObserver {
    fn on_pin_links_changed(&mut self, _node: NodeId, _pin: PinRef) {}
}

/// Outcome of applying a connection edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedConnection {
    /// The verdict that was applied
    pub response: ConnectionResponse,
    /// The connection now joining the two pins
    pub connection: ConnectionId,
    /// Links broken to make room for it
    pub broken: Vec<(PinRef, PinRef)>,
}

/// Schema for Flow graphs
#[derive(Debug, Default)]
pub struct FlowSchema {
    registry: PinTypeRegistry,
    types: TypeCatalog,
}

impl FlowSchema {
    /// Create a schema from a policy registry and a type catalog
    pub fn new(registry: PinTypeRegistry, types: TypeCatalog) -> Self {
        Self { registry, types }
    }

    /// Get the policy registry
    pub fn registry(&self) -> &PinTypeRegistry {
        &self.registry
    }

    /// Get the policy registry for test injection or extension
    pub fn registry_mut(&mut self) -> &mut PinTypeRegistry {
        &mut self.registry
    }

    /// Get the type catalog
    pub fn types(&self) -> &TypeCatalog {
        &self.types
    }

    /// Get the type catalog for redirects and new types
    pub fn types_mut(&mut self) -> &mut TypeCatalog {
        &mut self.types
    }

    /// Compatibility engine bound to this schema
    pub fn compatibility(&self) -> CompatibilityEngine<'_> {
        CompatibilityEngine::new(&self.registry, &self.types)
    }

    /// Connection resolver bound to this schema
    pub fn resolver(&self) -> ConnectionResolver<'_> {
        ConnectionResolver::new(self.compatibility())
    }

    /// Decide whether pins `a` and `b` of `graph` may be linked
    pub fn can_create_connection(
        &self,
        graph: &Graph,
        a: PinRef,
        b: PinRef,
    ) -> Result<ConnectionResponse, ConnectionError> {
        let (node_a, pin_a) = lookup(graph, a)?;
        let (node_b, pin_b) = lookup(graph, b)?;
        Ok(self.resolver().resolve(pin_a, pin_b, node_a, node_b, graph))
    }

    /// Decide and, if allowed, link pins `a` and `b`.
    ///
    /// The verdict is computed before anything is touched; a disallowed edit
    /// leaves the graph unchanged. Nodes whose links change are notified
    /// through `observer`, and orphaned pins left without links are removed.
    pub fn try_create_connection(
        &self,
        graph: &mut Graph,
        a: PinRef,
        b: PinRef,
        observer: &mut dyn GraphObserver,
    ) -> Result<AppliedConnection, ConnectionError> {
        let response = self.can_create_connection(graph, a, b)?;
        if !response.is_allowed() {
            return Err(ConnectionError::Disallowed(response.message));
        }

        let (output, input) = {
            let pin_a = graph.pin(a).ok_or(ConnectionError::PinNotFound(a.pin))?;
            let pin_b = graph.pin(b).ok_or(ConnectionError::PinNotFound(b.pin))?;
            match order_pins(pin_a, pin_b) {
                Some((output, _)) if output.id == a.pin => (a, b),
                Some(_) => (b, a),
                None => return Err(ConnectionError::Disallowed(response.message)),
            }
        };

        let broken = match response.response {
            ConnectResponse::AllowBreakingOutputLinks => {
                break_links_of(graph, output, observer)
            }
            ConnectResponse::AllowBreakingInputLinks => break_links_of(graph, input, observer),
            ConnectResponse::Allow | ConnectResponse::Disallow => Vec::new(),
        };

        let already_linked = graph.find_connection(output.pin, input.pin).map(|c| c.id);
        let connection = match already_linked {
            Some(id) => id,
            None => {
                let id = graph.insert_link(output, input);
                observer.on_pin_links_changed(output.node, output);
                observer.on_pin_links_changed(input.node, input);
                tracing::debug!("Linked {:?} -> {:?}", output.pin, input.pin);
                id
            }
        };

        Ok(AppliedConnection {
            response,
            connection,
            broken,
        })
    }

    /// Break every link of a pin
    pub fn break_pin_links(
        &self,
        graph: &mut Graph,
        pin: PinRef,
        observer: &mut dyn GraphObserver,
    ) -> Result<Vec<(PinRef, PinRef)>, ConnectionError> {
        lookup(graph, pin)?;
        Ok(break_links_of(graph, pin, observer))
    }

    /// Break the single link between two pins, if any
    pub fn break_single_link(
        &self,
        graph: &mut Graph,
        a: PinRef,
        b: PinRef,
        observer: &mut dyn GraphObserver,
    ) -> Result<bool, ConnectionError> {
        lookup(graph, a)?;
        lookup(graph, b)?;

        let found = graph
            .find_connection(a.pin, b.pin)
            .or_else(|| graph.find_connection(b.pin, a.pin))
            .map(|c| c.id);
        let Some(id) = found else {
            return Ok(false);
        };

        if let Some(connection) = graph.disconnect(id) {
            notify_broken(graph, connection.source(), connection.target(), observer);
        }
        Ok(true)
    }
}

fn lookup(graph: &Graph, pin: PinRef) -> Result<(&Node, &Pin), ConnectionError> {
    let node = graph
        .node(pin.node)
        .ok_or(ConnectionError::NodeNotFound(pin.node))?;
    let found = node.pin(pin.pin).ok_or(ConnectionError::PinNotFound(pin.pin))?;
    Ok((node, found))
}

/// Break all links of `pin`, notifying both ends of each
fn break_links_of(
    graph: &mut Graph,
    pin: PinRef,
    observer: &mut dyn GraphObserver,
) -> Vec<(PinRef, PinRef)> {
    let ids: Vec<ConnectionId> = graph.connections_for_pin(pin.pin).map(|c| c.id).collect();

    let mut broken = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(connection) = graph.disconnect(id) else {
            continue;
        };
        let (from, to) = (connection.source(), connection.target());
        notify_broken(graph, from, to, observer);
        broken.push((from, to));
    }
    broken
}

fn notify_broken(
    graph: &mut Graph,
    from: PinRef,
    to: PinRef,
    observer: &mut dyn GraphObserver,
) {
    for end in [from, to] {
        debug_assert!(
            graph.node(end.node).is_some(),
            "link to a node that is not in the graph"
        );
        if graph.node(end.node).is_none() {
            tracing::error!("Broken link referenced missing node {:?}", end.node);
            continue;
        }
        observer.on_pin_links_changed(end.node, end);
        if graph.remove_orphan_if_unlinked(end) {
            observer.on_orphan_removed(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PinCategory;

    #[derive(Default)]
    struct Recorder {
        changed: Vec<PinRef>,
        orphans: Vec<PinRef>,
    }

    impl GraphObserver for Recorder {
        fn on_pin_links_changed(&mut self, _node: NodeId, pin: PinRef) {
            self.changed.push(pin);
        }

        fn on_orphan_removed(&mut self, pin: PinRef) {
            self.orphans.push(pin);
        }
    }

    fn add(graph: &mut Graph, pin: Pin) -> PinRef {
        let node = Node::named(pin.name.clone()).with_pin(pin);
        let pin_ref = PinRef::new(node.id, node.pins().next().unwrap().id);
        graph.add_node(node);
        pin_ref
    }

    #[test]
    fn test_disallowed_edit_leaves_graph_untouched() {
        let schema = FlowSchema::default();
        let mut graph = Graph::default();
        let output = add(&mut graph, Pin::output("Location", PinCategory::Vector));
        let input = add(&mut graph, Pin::input("Rotation", PinCategory::Rotator));

        let mut recorder = Recorder::default();
        let result = schema.try_create_connection(&mut graph, output, input, &mut recorder);
        assert!(matches!(result, Err(ConnectionError::Disallowed(_))));
        assert_eq!(graph.connection_count(), 0);
        assert!(recorder.changed.is_empty());
    }

    #[test]
    fn test_missing_pin() {
        let schema = FlowSchema::default();
        let mut graph = Graph::default();
        let output = add(&mut graph, Pin::output("Value", PinCategory::Int));
        let bogus = PinRef::new(output.node, crate::pin::PinId::new());

        assert_eq!(
            schema.can_create_connection(&graph, output, bogus),
            Err(ConnectionError::PinNotFound(bogus.pin))
        );
    }

    #[test]
    fn test_replacing_input_link_notifies_old_ends() {
        let schema = FlowSchema::default();
        let mut graph = Graph::default();
        let first = add(&mut graph, Pin::output("A", PinCategory::Float));
        let second = add(&mut graph, Pin::output("B", PinCategory::Int));
        let input = add(&mut graph, Pin::input("Value", PinCategory::Double));

        let mut recorder = Recorder::default();
        schema
            .try_create_connection(&mut graph, first, input, &mut recorder)
            .unwrap();
        recorder.changed.clear();

        let applied = schema
            .try_create_connection(&mut graph, input, second, &mut recorder)
            .unwrap();
        assert_eq!(applied.response.response, ConnectResponse::AllowBreakingInputLinks);
        assert_eq!(applied.broken, vec![(first, input)]);
        assert!(recorder.changed.contains(&first));
        assert!(recorder.changed.contains(&second));
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.find_connection(second.pin, input.pin).is_some());
    }

    #[test]
    fn test_breaking_removes_unlinked_orphan() {
        let schema = FlowSchema::default();
        let mut graph = Graph::default();
        let output = add(&mut graph, Pin::output("Value", PinCategory::Int));
        let input = add(&mut graph, Pin::input("Value", PinCategory::Int));
        graph.insert_link(output, input);
        graph.orphan_pin(output);

        let mut recorder = Recorder::default();
        let broken = schema
            .break_pin_links(&mut graph, input, &mut recorder)
            .unwrap();
        assert_eq!(broken, vec![(output, input)]);
        assert_eq!(recorder.orphans, vec![output]);
        assert!(graph.pin(output).is_none());
        assert!(graph.pin(input).is_some());
    }

    #[test]
    fn test_break_single_link_either_order() {
        let schema = FlowSchema::default();
        let mut graph = Graph::default();
        let output = add(&mut graph, Pin::exec_output("Out"));
        let input = add(&mut graph, Pin::exec_input("In"));
        graph.insert_link(output, input);

        let mut observer = NoopObserver;
        assert_eq!(schema.break_single_link(&mut graph, input, output, &mut observer), Ok(true));
        assert_eq!(schema.break_single_link(&mut graph, input, output, &mut observer), Ok(false));
    }
}
