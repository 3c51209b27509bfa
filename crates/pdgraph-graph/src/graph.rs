//! Dispatch from a path context to the resolver set that owns the node.

use pdgraph_api::Gateway;
use pdgraph_core::reference::PAGE;
use pdgraph_core::{Continuation, GraphRef, PathContext, PdgError, PdgResult, RequestedFields};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::alerts::{AlertCollectionResolver, AlertResolver};
use crate::incidents::{IncidentCollectionResolver, IncidentResolver};
use crate::node::{NodeKind, Resolved};
use crate::resolver::{self, NodeResolver, ResolveContext};
use crate::root::RootResolver;

/// The whole object graph.
#[derive(Clone)]
pub struct Graph {
    gateway: Arc<Gateway>,
    root: RootResolver,
    incidents: IncidentCollectionResolver,
    incident: IncidentResolver,
    alerts: AlertCollectionResolver,
    alert: AlertResolver,
}

impl Graph {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            root: RootResolver::new(gateway.clone()),
            incidents: IncidentCollectionResolver::new(gateway.clone()),
            incident: IncidentResolver::new(gateway.clone()),
            alerts: AlertCollectionResolver::new(gateway.clone()),
            alert: AlertResolver::new(gateway.clone()),
            gateway,
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn root(&self) -> &RootResolver {
        &self.root
    }

    pub fn incidents(&self) -> &IncidentCollectionResolver {
        &self.incidents
    }

    pub fn incident(&self) -> &IncidentResolver {
        &self.incident
    }

    pub fn alerts(&self) -> &AlertCollectionResolver {
        &self.alerts
    }

    pub fn alert(&self) -> &AlertResolver {
        &self.alert
    }

    pub fn resolver(&self, kind: NodeKind) -> &dyn NodeResolver {
        match kind {
            NodeKind::Root => &self.root,
            NodeKind::IncidentCollection => &self.incidents,
            NodeKind::Incident => &self.incident,
            NodeKind::AlertCollection => &self.alerts,
            NodeKind::Alert => &self.alert,
        }
    }

    /// Resolve `field(args)` on the node reached by `path`.
    pub async fn resolve(
        &self,
        path: &PathContext,
        field: &str,
        args: &Value,
        requested: &RequestedFields,
    ) -> PdgResult<Resolved> {
        let kind = NodeKind::at(path)?;
        debug!(path = %path, node = %kind, field, "Resolving field");

        let cx = ResolveContext { path, requested };
        self.resolver(kind).resolve(field, args, &cx).await
    }

    /// Resolve the entity a reference points at.
    pub async fn resolve_ref(&self, gref: &GraphRef, requested: &RequestedFields) -> PdgResult<Resolved> {
        let (last, parent) = gref
            .path()
            .split_last()
            .ok_or_else(|| PdgError::InvalidReference(gref.to_string()))?;
        self.resolve(&parent, &last.field, &Value::Object(last.args.clone()), requested)
            .await
    }

    /// Request the slice a continuation describes.
    pub async fn follow(&self, next: &Continuation) -> PdgResult<Resolved> {
        let args = serde_json::to_value(&next.args)?;
        self.resolve(&next.path, PAGE, &args, &RequestedFields::all()).await
    }

    /// Reference to item `id` of the collection at `collection`.
    pub fn item_ref(collection: &PathContext, id: &str) -> PdgResult<GraphRef> {
        resolver::item_ref(collection, id)
    }
}
