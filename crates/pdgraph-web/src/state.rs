//! Application state.

use pdgraph_core::ConfigStore;
use pdgraph_graph::Graph;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
}

impl AppState {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        self.graph.gateway().config()
    }
}
