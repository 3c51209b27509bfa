//! Node kinds and resolver results.

use pdgraph_core::reference::{ALERTS, INCIDENTS, ONE};
use pdgraph_core::{GraphRef, Page, PathContext, PdgError, PdgResult};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// The resolver set responsible for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    IncidentCollection,
    Incident,
    AlertCollection,
    Alert,
}

impl NodeKind {
    /// Kind of the node a path leads to.
    pub fn at(path: &PathContext) -> PdgResult<Self> {
        match path.fields().as_slice() {
            [] => Ok(Self::Root),
            [INCIDENTS] => Ok(Self::IncidentCollection),
            [INCIDENTS, ONE] => Ok(Self::Incident),
            [INCIDENTS, ONE, ALERTS] => Ok(Self::AlertCollection),
            [INCIDENTS, ONE, ALERTS, ONE] => Ok(Self::Alert),
            _ => Err(PdgError::UnknownPath(path.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::IncidentCollection => "IncidentCollection",
            Self::Incident => "Incident",
            Self::AlertCollection => "AlertCollection",
            Self::Alert => "Alert",
        }
    }

    /// Argument naming an item of this collection in `one`.
    pub fn item_key(&self) -> Option<&'static str> {
        match self {
            Self::IncidentCollection => Some("id"),
            Self::AlertCollection => Some("alert_id"),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The field is itself a traversable node; nothing was fetched.
    Node,
    /// A scalar, record or mutation acknowledgement.
    Value(Value),
    /// One slice of a collection with its continuation.
    Page(Page<Value>),
    /// A durable reference to an entity node.
    Ref(GraphRef),
}

impl Resolved {
    pub fn into_json(self) -> Value {
        match self {
            Self::Node => Value::Object(Map::new()),
            Self::Value(value) => value,
            Self::Page(page) => serde_json::to_value(page).unwrap_or(Value::Null),
            Self::Ref(gref) => Value::String(gref.to_string()),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_page(self) -> Option<Page<Value>> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }
}

impl Serialize for Resolved {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Node => Map::new().serialize(serializer),
            Self::Value(value) => value.serialize(serializer),
            Self::Page(page) => page.serialize(serializer),
            Self::Ref(gref) => gref.serialize(serializer),
        }
    }
}
