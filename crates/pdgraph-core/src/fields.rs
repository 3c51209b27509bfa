//! Field selections supplied by the caller for a single resolver invocation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const WILDCARD: &str = "*";

/// The set of field names a traversal asks for on the node being resolved.
///
/// Used for fetch elision: when every requested field can be answered from
/// the arguments that reached the node, no provider call is made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestedFields(BTreeSet<String>);

impl RequestedFields {
    /// Empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Selection that always requires the full entity.
    pub fn all() -> Self {
        Self::from_iter([WILDCARD])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// True when at least one requested field lies outside `simple`.
    ///
    /// `simple` lists the fields obtainable without fetching the entity.
    pub fn requires_fetch(&self, simple: &[&str]) -> bool {
        self.0.iter().any(|field| !simple.contains(&field.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for RequestedFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
