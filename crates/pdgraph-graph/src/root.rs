//! Root resolvers: the entry point of the graph.

use async_trait::async_trait;
use pdgraph_api::{ApiCall, Gateway, Host};
use pdgraph_core::reference::INCIDENTS;
use pdgraph_core::{ConfigUpdate, PdgResult, Status};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::node::{NodeKind, Resolved};
use crate::resolver::{parse_args, NodeResolver, ResolveContext};

/// Resolvers for the root node.
#[derive(Clone)]
pub struct RootResolver {
    gateway: Arc<Gateway>,
}

impl RootResolver {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn status(&self) -> Status {
        self.gateway.config().status()
    }

    /// Merge new credentials into the store. Emits a status-changed signal.
    pub fn configure(&self, update: ConfigUpdate) -> PdgResult<Status> {
        self.gateway.config().configure(update)?;
        Ok(self.status())
    }

    /// Forward a provider-native event to the Events API as-is.
    pub async fn send_event(&self, payload: Value) -> PdgResult<Value> {
        debug!("Forwarding event to Events API");
        self.gateway
            .call(ApiCall::post("v2/enqueue").host(Host::Events).body(payload))
            .await
    }
}

#[async_trait]
impl NodeResolver for RootResolver {
    fn kind(&self) -> NodeKind {
        NodeKind::Root
    }

    async fn resolve(&self, field: &str, args: &Value, _cx: &ResolveContext<'_>) -> PdgResult<Resolved> {
        match field {
            INCIDENTS => Ok(Resolved::Node),
            "status" => Ok(Resolved::Value(Value::String(self.status().to_string()))),
            "configure" => {
                self.configure(parse_args(field, args)?)?;
                Ok(Resolved::Value(Value::Null))
            }
            "sendEvent" => Ok(Resolved::Value(self.send_event(args.clone()).await?)),
            _ => Err(self.unknown(field)),
        }
    }
}
