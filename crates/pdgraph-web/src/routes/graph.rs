//! Graph resolution handlers.

use axum::{extract::State, http::StatusCode, Json};
use pdgraph_core::{GraphRef, PathContext, RequestedFields};
use serde::Deserialize;
use serde_json::Value;

use super::error_response;
use crate::state::AppState;

/// `field(args)` on the node reached by `path`.
///
/// A page's `next` continuation is itself a valid request once `field` is
/// set to `page`.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub path: PathContext,
    pub field: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub select: RequestedFields,
}

#[derive(Debug, Deserialize)]
pub struct RefRequest {
    pub gref: GraphRef,
    #[serde(default)]
    pub select: RequestedFields,
}

pub async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let resolved = state
        .graph
        .resolve(&req.path, &req.field, &req.args, &req.select)
        .await
        .map_err(error_response)?;
    Ok(Json(resolved.into_json()))
}

pub async fn resolve_ref(
    State(state): State<AppState>,
    Json(req): Json<RefRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let resolved = state
        .graph
        .resolve_ref(&req.gref, &req.select)
        .await
        .map_err(error_response)?;
    Ok(Json(resolved.into_json()))
}
