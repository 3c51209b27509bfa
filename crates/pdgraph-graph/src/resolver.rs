//! The resolver contract shared by every node kind.

use async_trait::async_trait;
use pdgraph_core::reference::ONE;
use pdgraph_core::{Frame, GraphRef, Page, PathContext, PdgError, PdgResult, RequestedFields};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::node::{NodeKind, Resolved};

/// Per-invocation context handed down by the hosting runtime.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Argument chain that reached the node being resolved.
    pub path: &'a PathContext,
    /// Fields the traversal asks for on the result.
    pub requested: &'a RequestedFields,
}

/// A resolver set: maps a field name on one node kind to a result.
#[async_trait]
pub trait NodeResolver: Send + Sync {
    fn kind(&self) -> NodeKind;

    async fn resolve(&self, field: &str, args: &Value, cx: &ResolveContext<'_>) -> PdgResult<Resolved>;

    fn unknown(&self, field: &str) -> PdgError {
        PdgError::unknown_field(self.kind().as_str(), field)
    }
}

/// Optional acting user for mutations, sent as the `From` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActorArgs {
    #[serde(default)]
    pub email: Option<String>,
}

/// Decode a field's argument record. `null` reads as an empty record.
pub fn parse_args<T: DeserializeOwned>(field: &str, args: &Value) -> PdgResult<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(args).map_err(|e| PdgError::invalid_arguments(field, e))
}

/// Reference to the item `id` of the collection at `collection`.
pub fn item_ref(collection: &PathContext, id: &str) -> PdgResult<GraphRef> {
    let key = NodeKind::at(collection)?
        .item_key()
        .ok_or_else(|| PdgError::UnknownPath(collection.to_string()))?;
    GraphRef::from_path(collection.child(Frame::with_arg(ONE, key, id)))
}

/// Convert a page to JSON, giving each item a `gref` reachable from the
/// collection the page came from.
pub fn referenced_page<T: Serialize>(page: Page<T>) -> PdgResult<Page<Value>> {
    let Page { items, next } = page;
    let items = items
        .into_iter()
        .map(|item| -> PdgResult<Value> {
            let mut value = serde_json::to_value(item)?;
            if let Some(id) = value.get("id").and_then(Value::as_str).map(str::to_owned) {
                let gref = item_ref(&next.path, &id)?;
                if let Value::Object(map) = &mut value {
                    map.insert("gref".to_string(), Value::String(gref.to_string()));
                }
            }
            Ok(value)
        })
        .collect::<PdgResult<Vec<_>>>()?;
    Ok(Page { items, next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_ref_uses_collection_key() {
        let alerts = GraphRef::incident("X").into_path().child(Frame::new("alerts"));
        let gref = item_ref(&alerts, "Y").unwrap();
        assert_eq!(gref, GraphRef::alert("X", "Y"));
    }

    #[test]
    fn test_null_args_read_as_empty() {
        let actor: ActorArgs = parse_args("resolved", &Value::Null).unwrap();
        assert_eq!(actor, ActorArgs::default());
    }

    #[test]
    fn test_bad_args_name_the_field() {
        #[derive(Debug, Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            id: String,
        }

        let err = parse_args::<Needs>("one", &json!({})).unwrap_err();
        assert!(matches!(err, PdgError::InvalidArguments { ref field, .. } if field == "one"));
    }
}
