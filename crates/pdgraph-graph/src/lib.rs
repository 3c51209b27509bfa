//! # pdgraph Graph
//!
//! Resolver sets that expose PagerDuty as a navigable object graph:
//!
//! ```text
//! root
//! ├── incidents            (descender)
//! │   ├── one(id)          -> Incident
//! │   │   ├── gref
//! │   │   ├── acknowledged(email?) / resolved(email?)
//! │   │   └── alerts       (descender)
//! │   │       ├── one(alert_id) -> Alert
//! │   │       │   ├── gref
//! │   │       │   └── triggered(email?) / resolved(email?)
//! │   │       └── page(limit?, offset?, ...)
//! │   └── page(limit?, offset?, ...)
//! ├── status / configure
//! └── sendEvent
//! ```
//!
//! Identity is always taken from the [`PathContext`](pdgraph_core::PathContext)
//! that reached a node, and `one` skips the provider call when only identity
//! fields were requested.

pub mod alerts;
pub mod graph;
pub mod incidents;
pub mod node;
pub mod resolver;
pub mod root;

pub use alerts::{AlertCollectionResolver, AlertResolver};
pub use graph::Graph;
pub use incidents::{IncidentCollectionResolver, IncidentResolver};
pub use node::{NodeKind, Resolved};
pub use resolver::{ActorArgs, NodeResolver, ResolveContext};
pub use root::RootResolver;

/// Fields of an entity that can be answered from its arguments alone.
pub const SIMPLE_FIELDS: &[&str] = &["id"];
