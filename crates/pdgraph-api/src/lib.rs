//! # pdgraph API
//!
//! Single chokepoint for calls to PagerDuty: request construction, credential
//! injection and normalization of failures into [`pdgraph_core::PdgError`].

pub mod gateway;
pub mod query;

pub use gateway::{ApiCall, Gateway, Host, Hosts, DEFAULT_API_URL, DEFAULT_EVENTS_URL};
pub use query::QueryParams;
