// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flow graph schema for the editor.
//!
//! This crate decides which pins of a Flow graph may be linked:
//! - Pin categories and their match policies
//! - Sub-category objects (classes, structs) with explicit ancestry
//! - Type compatibility checks with deterministic reasons
//! - Connection resolution: legality plus which links must be broken
//!
//! ## Architecture
//!
//! Data flows one way:
//!
//! ```text
//! PinTypeRegistry -> CompatibilityEngine -> ConnectionResolver -> FlowSchema (applies to Graph)
//! ```
//!
//! A [`FlowSchema`] is built once per editor session, optionally from a RON
//! [`SchemaConfig`], and passed by reference to whatever edits graphs.

pub mod category;
pub mod rules;
pub mod registry;
pub mod types;
pub mod hierarchy;
pub mod pin;
pub mod compatibility;
pub mod connection;
pub mod resolver;
pub mod node;
pub mod graph;
pub mod schema;
pub mod config;
pub mod library;

pub use category::PinCategory;
pub use rules::{MatchRules, PinTypeMatchPolicy};
pub use registry::PinTypeRegistry;
pub use types::{DescriptorKind, FieldLayout, TypeDescriptor, TypePath};
pub use hierarchy::{StructConversion, StructConversions, TypeCatalog, TypeHierarchy};
pub use pin::{ContainerType, MemberReference, Pin, PinDirection, PinId};
pub use compatibility::{CompatibilityEngine, Incompatibility};
pub use connection::{ConnectResponse, Connection, ConnectionId, ConnectionResponse, PinRef};
pub use resolver::{ConnectionResolver, LinkQuery, PinOwner};
pub use node::{Node, NodeId, NodeType};
pub use graph::{ConnectionError, Graph};
pub use schema::{FlowSchema, GraphObserver};
pub use config::{ConfigError, SchemaConfig};
