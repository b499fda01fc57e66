// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in Flow node templates.
//!
//! Supports execution flow and data flow.

use crate::category::PinCategory;
use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::pin::Pin;
use crate::types::{TypeDescriptor, TypePath};
use std::sync::Arc;

/// Type path of the base actor class
pub const ACTOR_CLASS: &str = "/Script/Engine.Actor";

/// Create the Flow node registry
pub fn create_flow_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    let actor = Arc::new(TypeDescriptor::class(ACTOR_CLASS));

    registry.register(NodeType {
        id: "start".to_string(),
        name: "Start".to_string(),
        category: NodeCategory::Route,
        description: "Entry point of the graph".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_Start")),
        inputs: vec![],
        outputs: vec![Pin::exec_output("Out")],
    });

    registry.register(NodeType {
        id: "finish".to_string(),
        name: "Finish".to_string(),
        category: NodeCategory::Route,
        description: "Finishes the graph".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_Finish")),
        inputs: vec![Pin::exec_input("In")],
        outputs: vec![],
    });

    // Flow control
    registry.register(NodeType {
        id: "branch".to_string(),
        name: "Branch".to_string(),
        category: NodeCategory::FlowControl,
        description: "If/else branching".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_Branch")),
        inputs: vec![
            Pin::exec_input("In"),
            Pin::input("Condition", PinCategory::Bool),
        ],
        outputs: vec![Pin::exec_output("True"), Pin::exec_output("False")],
    });

    registry.register(NodeType {
        id: "sequence".to_string(),
        name: "Sequence".to_string(),
        category: NodeCategory::FlowControl,
        description: "Fire outputs one after another".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_ExecutionSequence")),
        inputs: vec![Pin::exec_input("In")],
        outputs: vec![Pin::exec_output("0"), Pin::exec_output("1")],
    });

    registry.register(NodeType {
        id: "has_tags".to_string(),
        name: "Has Gameplay Tags".to_string(),
        category: NodeCategory::GameplayTags,
        description: "Check an actor's owned gameplay tags".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_HasTags")),
        inputs: vec![
            Pin::exec_input("In"),
            Pin::input("Actor", PinCategory::Object).with_sub_category(Arc::clone(&actor)),
            Pin::input("Tags", PinCategory::GameplayTagContainer),
        ],
        outputs: vec![
            Pin::exec_output("Out"),
            Pin::output("Result", PinCategory::Bool),
        ],
    });

    registry.register(NodeType {
        id: "spawn_actor".to_string(),
        name: "Spawn Actor".to_string(),
        category: NodeCategory::World,
        description: "Spawn an actor at a transform".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_SpawnActor")),
        inputs: vec![
            Pin::exec_input("In"),
            Pin::input("Class", PinCategory::Class).with_sub_category(Arc::clone(&actor)),
            Pin::input("Transform", PinCategory::Transform),
        ],
        outputs: vec![
            Pin::exec_output("Out"),
            Pin::output("Actor", PinCategory::Object).with_sub_category(actor),
        ],
    });

    // Print string (for debugging)
    registry.register(NodeType {
        id: "log".to_string(),
        name: "Log".to_string(),
        category: NodeCategory::Developer,
        description: "Print a message to the log".to_string(),
        declaring_class: Some(TypePath::new("/Script/Flow.FlowNode_Log")),
        inputs: vec![
            Pin::exec_input("In"),
            Pin::input("Message", PinCategory::String),
        ],
        outputs: vec![Pin::exec_output("Out")],
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinDirection;

    #[test]
    fn test_registry_contents() {
        let registry = create_flow_registry();
        assert_eq!(registry.types().count(), 7);
        assert_eq!(registry.types_in_category(NodeCategory::Route).count(), 2);
    }

    #[test]
    fn test_every_data_pin_has_a_known_category() {
        let registry = create_flow_registry();
        let policies = crate::registry::PinTypeRegistry::new();
        for node_type in registry.types() {
            for pin in node_type.inputs.iter().chain(&node_type.outputs) {
                assert!(
                    pin.is_exec() || policies.lookup(&pin.category).is_some(),
                    "{} pin {} has no policy",
                    node_type.id,
                    pin.name
                );
            }
        }
    }

    #[test]
    fn test_spawned_actor_pin_is_typed() {
        let registry = create_flow_registry();
        let node = registry.create_node("spawn_actor").unwrap();
        let actor = node.find_pin("Actor", PinDirection::Output).unwrap();
        assert_eq!(actor.type_label(), format!("Object<{ACTOR_CLASS}>"));
    }
}
