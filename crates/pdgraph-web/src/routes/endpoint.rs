//! Passthrough endpoint for requests outside the API.

use axum::http::Uri;
use tracing::debug;

/// Echo the requested path.
pub async fn endpoint(uri: Uri) -> String {
    debug!(path = %uri.path(), "Endpoint request");
    format!("Path: {}", uri.path())
}
