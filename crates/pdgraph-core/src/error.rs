//! Centralized error types for pdgraph.

use thiserror::Error;

/// Main error type for graph resolution and provider calls.
#[derive(Error, Debug)]
pub enum PdgError {
    /// Non-success HTTP response. Displays the provider's body verbatim.
    #[error("{body}")]
    Remote { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid arguments for '{field}': {source}")]
    InvalidArguments {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No ancestor '{0}' in the current path")]
    MissingAncestor(String),

    #[error("Ancestor '{operation}' was reached without argument '{argument}'")]
    MissingArgument { operation: String, argument: String },

    #[error("Unknown field '{field}' on {node}")]
    UnknownField { node: String, field: String },

    #[error("Path does not lead to a graph node: {0}")]
    UnknownPath(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Configuration IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for pdgraph operations.
pub type PdgResult<T> = Result<T, PdgError>;

impl PdgError {
    /// Create an unknown field error.
    pub fn unknown_field(node: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            node: node.into(),
            field: field.into(),
        }
    }

    /// Create an invalid arguments error.
    pub fn invalid_arguments(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidArguments {
            field: field.into(),
            source,
        }
    }

    /// Whether this error came back from the provider rather than from the caller.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Transport(_) | Self::Decode(_))
    }
}
