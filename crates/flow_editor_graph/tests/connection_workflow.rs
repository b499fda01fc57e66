//! Integration tests for connection editing
//!
//! These tests build Flow graphs from the node library and edit links
//! through the schema:
//! - Replacing links on single-input pins
//! - Replacing links on exec outputs
//! - Self-loop and idempotency guarantees
//! - Class covariance with redirected types

use flow_editor_graph::library::{create_flow_registry, ACTOR_CLASS};
use flow_editor_graph::pin::PinDirection;
use flow_editor_graph::schema::NoopObserver;
use flow_editor_graph::{
    ConnectResponse, ConnectionError, FlowSchema, Graph, GraphObserver, Node, NodeId, Pin,
    PinCategory, PinRef, PinTypeRegistry, SchemaConfig, TypeCatalog, TypeDescriptor,
};

#[derive(Default)]
struct Recorder {
    changed: Vec<(NodeId, PinRef)>,
}

impl GraphObserver for Recorder {
    fn on_pin_links_changed(&mut self, node: NodeId, pin: PinRef) {
        self.changed.push((node, pin));
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pin(node: &Node, name: &str, direction: PinDirection) -> PinRef {
    let found = node
        .find_pin(name, direction)
        .unwrap_or_else(|| panic!("{} has no pin {name}", node.name));
    PinRef::new(node.id, found.id)
}

fn spawn(graph: &mut Graph, type_id: &str) -> Node {
    let node = create_flow_registry().create_node(type_id).unwrap();
    graph.add_node(node.clone());
    node
}

#[test]
fn test_second_source_replaces_first_on_data_input() {
    init_logging();
    let schema = FlowSchema::default();
    let mut graph = Graph::new("Quest");

    let first = spawn(&mut graph, "has_tags");
    let second = spawn(&mut graph, "has_tags");
    let branch = spawn(&mut graph, "branch");

    let l1_from = pin(&first, "Result", PinDirection::Output);
    let l2_from = pin(&second, "Result", PinDirection::Output);
    let condition = pin(&branch, "Condition", PinDirection::Input);

    let mut recorder = Recorder::default();
    schema
        .try_create_connection(&mut graph, l1_from, condition, &mut recorder)
        .unwrap();

    let verdict = schema.can_create_connection(&graph, l2_from, condition).unwrap();
    assert_eq!(verdict.response, ConnectResponse::AllowBreakingInputLinks);

    recorder.changed.clear();
    let applied = schema
        .try_create_connection(&mut graph, l2_from, condition, &mut recorder)
        .unwrap();

    assert_eq!(applied.broken, vec![(l1_from, condition)]);
    assert_eq!(graph.connection_count(), 1);
    assert!(graph.find_connection(l2_from.pin, condition.pin).is_some());
    assert!(graph.find_connection(l1_from.pin, condition.pin).is_none());

    // Both ends of the broken link were told
    assert!(recorder.changed.contains(&(first.id, l1_from)));
    assert!(recorder.changed.contains(&(branch.id, condition)));
}

#[test]
fn test_exec_output_has_single_target() {
    let schema = FlowSchema::default();
    let mut graph = Graph::new("Route");

    let start = spawn(&mut graph, "start");
    let log = spawn(&mut graph, "log");
    let finish = spawn(&mut graph, "finish");

    let out = pin(&start, "Out", PinDirection::Output);
    let log_in = pin(&log, "In", PinDirection::Input);
    let finish_in = pin(&finish, "In", PinDirection::Input);

    let mut observer = NoopObserver;
    schema
        .try_create_connection(&mut graph, out, log_in, &mut observer)
        .unwrap();
    let applied = schema
        .try_create_connection(&mut graph, finish_in, out, &mut observer)
        .unwrap();

    assert_eq!(applied.response.response, ConnectResponse::AllowBreakingOutputLinks);
    assert_eq!(graph.connections_from(out.pin).count(), 1);
    assert!(graph.find_connection(out.pin, finish_in.pin).is_some());

    // The log's exec input can still gather several sources
    let log_out = pin(&log, "Out", PinDirection::Output);
    schema
        .try_create_connection(&mut graph, log_out, finish_in, &mut observer)
        .unwrap();
    assert_eq!(graph.connections_to(finish_in.pin).count(), 2);
}

#[test]
fn test_repeating_a_connection_changes_nothing() {
    let schema = FlowSchema::default();
    let mut graph = Graph::new("Repeat");

    let start = spawn(&mut graph, "start");
    let finish = spawn(&mut graph, "finish");
    let out = pin(&start, "Out", PinDirection::Output);
    let input = pin(&finish, "In", PinDirection::Input);

    let mut recorder = Recorder::default();
    let first = schema
        .try_create_connection(&mut graph, out, input, &mut recorder)
        .unwrap();
    let notified = recorder.changed.len();

    let second = schema
        .try_create_connection(&mut graph, out, input, &mut recorder)
        .unwrap();

    assert_eq!(first.connection, second.connection);
    assert_eq!(second.response.response, ConnectResponse::Allow);
    assert!(second.broken.is_empty());
    assert_eq!(recorder.changed.len(), notified);
    assert_eq!(graph.connection_count(), 1);
}

#[test]
fn test_self_loop_is_always_rejected() {
    let schema = FlowSchema::default();
    let mut graph = Graph::new("Loop");

    let node = Node::named("Relay")
        .with_pin(Pin::exec_input("In"))
        .with_pin(Pin::exec_output("Out"))
        .with_pin(Pin::input("Value", PinCategory::Int))
        .with_pin(Pin::output("Value", PinCategory::Int));
    graph.add_node(node.clone());

    for (output, input) in [("Out", "In"), ("Value", "Value")] {
        let result = schema.try_create_connection(
            &mut graph,
            pin(&node, output, PinDirection::Output),
            pin(&node, input, PinDirection::Input),
            &mut NoopObserver,
        );
        assert!(matches!(result, Err(ConnectionError::Disallowed(m)) if m.contains("same node")));
    }
    assert_eq!(graph.connection_count(), 0);
}

#[test]
fn test_spawned_pawn_feeds_actor_input_but_not_reverse() {
    let catalog = TypeCatalog::new()
        .with_type(TypeDescriptor::class(ACTOR_CLASS))
        .with_type(TypeDescriptor::class("/Script/Engine.Pawn").with_parent(ACTOR_CLASS));
    let schema = FlowSchema::new(PinTypeRegistry::new(), catalog);
    let mut graph = Graph::new("Spawn");

    let pawn_source = Node::named("Get Pawn").with_pin(
        Pin::output("Pawn", PinCategory::Object)
            .with_sub_category(TypeDescriptor::class("/Script/Engine.Pawn")),
    );
    let pawn_sink = Node::named("Possess").with_pin(
        Pin::input("Pawn", PinCategory::Object)
            .with_sub_category(TypeDescriptor::class("/Script/Engine.Pawn")),
    );
    graph.add_node(pawn_source.clone());
    graph.add_node(pawn_sink.clone());
    let has_tags = spawn(&mut graph, "has_tags");
    let spawner = spawn(&mut graph, "spawn_actor");

    let pawn_out = pin(&pawn_source, "Pawn", PinDirection::Output);
    let actor_in = pin(&has_tags, "Actor", PinDirection::Input);
    let verdict = schema.can_create_connection(&graph, pawn_out, actor_in).unwrap();
    assert_eq!(verdict.response, ConnectResponse::Allow);

    let actor_out = pin(&spawner, "Actor", PinDirection::Output);
    let pawn_in = pin(&pawn_sink, "Pawn", PinDirection::Input);
    let verdict = schema.can_create_connection(&graph, actor_out, pawn_in).unwrap();
    assert_eq!(verdict.response, ConnectResponse::Disallow);
    assert!(verdict.message.contains("not a subclass"));
}

#[test]
fn test_recompiled_class_is_matched_through_redirect() {
    let config = SchemaConfig::from_ron(&format!(
        r#"(
            types: [
                (path: "{ACTOR_CLASS}", kind: Class),
                (path: "/Game/Guard.Guard_C_2", kind: Class, parent: Some("{ACTOR_CLASS}")),
            ],
            redirects: {{ "/Game/Guard.Guard_C_1": "/Game/Guard.Guard_C_2" }},
        )"#
    ))
    .unwrap();
    let schema = FlowSchema::from_config(&config).unwrap();
    let mut graph = Graph::new("Guards");

    // Pin still carries the stale descriptor from before the recompile
    let stale = Node::named("Find Guard").with_pin(
        Pin::output("Guard", PinCategory::Object)
            .with_sub_category(TypeDescriptor::class("/Game/Guard.Guard_C_1")),
    );
    graph.add_node(stale.clone());
    let has_tags = spawn(&mut graph, "has_tags");

    let verdict = schema
        .can_create_connection(
            &graph,
            pin(&stale, "Guard", PinDirection::Output),
            pin(&has_tags, "Actor", PinDirection::Input),
        )
        .unwrap();
    assert_eq!(verdict.response, ConnectResponse::Allow);
}
