//! # pdgraph Core
//!
//! Shared building blocks for the PagerDuty object graph: the error taxonomy,
//! the process-wide configuration store, domain models, and the path context
//! used to re-derive node identity from the arguments that reached it.

pub mod config;
pub mod error;
pub mod fields;
pub mod model;
pub mod reference;

pub use config::{Config, ConfigStore, ConfigUpdate, Status, StatusChanged};
pub use error::{PdgError, PdgResult};
pub use fields::RequestedFields;
pub use model::{Alert, Continuation, EntityReference, EntityStatus, Incident, Listing, Page, PageArgs};
pub use reference::{Frame, GraphRef, PathContext};
