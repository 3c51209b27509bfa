//! Provider entity models and pagination shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reference::PathContext;

/// Lifecycle status shared by incidents and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Triggered,
    Acknowledged,
    Resolved,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triggered => "triggered",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

/// A PagerDuty incident. Fields the model does not name are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Incident {
    /// Node built from identity alone, without a fetch.
    pub fn partial(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
            incident_number: None,
            title: None,
            urgency: None,
            created_at: None,
            html_url: None,
            extra: Map::new(),
        }
    }
}

/// A PagerDuty alert, always scoped under one incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Alert {
    /// Node built from identity alone, without a fetch.
    pub fn partial(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
            summary: None,
            severity: None,
            created_at: None,
            html_url: None,
            extra: Map::new(),
        }
    }
}

/// Typed reference submitted in a status transition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: EntityStatus,
}

impl EntityReference {
    pub fn incident(id: impl Into<String>, status: EntityStatus) -> Self {
        Self {
            id: id.into(),
            kind: "incident_reference".to_string(),
            status,
        }
    }

    pub fn alert(id: impl Into<String>, status: EntityStatus) -> Self {
        Self {
            id: id.into(),
            kind: "alert".to_string(),
            status,
        }
    }

    /// Wrap into the provider's bulk-update body, e.g. `{"incidents": [ref]}`.
    pub fn into_body(self, collection: &str) -> Value {
        let mut body = Map::new();
        body.insert(collection.to_string(), Value::Array(vec![serde_json::json!(self)]));
        Value::Object(body)
    }
}

/// Arguments of a `page` call. Anything besides `limit`/`offset` is
/// forwarded to the provider as a query filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

impl PageArgs {
    /// Arguments for the slice after the one the provider described.
    ///
    /// The provider's echoed `limit`/`offset` win over whatever the caller sent.
    pub fn advanced_from(&self, limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset.saturating_add(1)),
            filters: self.filters.clone(),
        }
    }
}

/// Provider list response. Items arrive under the collection's own key.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    #[serde(alias = "incidents", alias = "alerts")]
    pub items: Vec<T>,
    pub limit: u64,
    pub offset: u64,
    #[serde(default)]
    pub more: bool,
    #[serde(default)]
    pub total: Option<u64>,
}

/// An unevaluated request for the next slice of a collection.
///
/// Following it means invoking `page` on the collection at `path` with `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    pub path: PathContext,
    pub args: PageArgs,
}

/// One slice of a collection plus the continuation to the next one.
///
/// `next` is always present; an exhausted collection shows up as an empty
/// `items` on the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Continuation,
}
