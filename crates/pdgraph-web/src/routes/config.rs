//! Status and configuration handlers.

use axum::{extract::State, http::StatusCode, Json};
use pdgraph_core::{ConfigUpdate, Status};
use serde::Serialize;

use super::error_response;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: Status,
    pub message: &'static str,
}

impl From<Status> for StatusResponse {
    fn from(status: Status) -> Self {
        Self {
            status,
            message: status.message(),
        }
    }
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.graph.root().status().into())
}

pub async fn configure(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let status = state.graph.root().configure(update).map_err(error_response)?;
    Ok(Json(status.into()))
}
