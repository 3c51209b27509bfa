//! Alert collection and alert resolvers, scoped under one incident.
//!
//! Every resolver here re-derives the owning incident from the path context
//! before composing `incidents/{id}/alerts/...`, so alert nodes never hold a
//! back-reference to a live incident.

use async_trait::async_trait;
use pdgraph_api::{ApiCall, Gateway, QueryParams};
use pdgraph_core::reference::{ALERT_OP, INCIDENT_OP, ONE, PAGE};
use pdgraph_core::{
    Alert, Continuation, EntityReference, EntityStatus, GraphRef, Listing, Page, PageArgs,
    PathContext, PdgResult, RequestedFields,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::node::{NodeKind, Resolved};
use crate::resolver::{parse_args, referenced_page, ActorArgs, NodeResolver, ResolveContext};
use crate::SIMPLE_FIELDS;

/// Arguments of `alerts.one`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertArgs {
    pub alert_id: String,
}

#[derive(Deserialize)]
struct AlertEnvelope {
    alert: Alert,
}

fn incident_of(path: &PathContext) -> PdgResult<String> {
    path.arg_at(INCIDENT_OP, "id")
}

/// Resolvers for `incidents.one(..).alerts`.
#[derive(Clone)]
pub struct AlertCollectionResolver {
    gateway: Arc<Gateway>,
}

impl AlertCollectionResolver {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// One alert, or just its identity when nothing else was requested.
    pub async fn one(
        &self,
        args: AlertArgs,
        collection: &PathContext,
        requested: &RequestedFields,
    ) -> PdgResult<Alert> {
        let incident = incident_of(collection)?;
        if !requested.requires_fetch(SIMPLE_FIELDS) {
            debug!(incident = %incident, alert = %args.alert_id, "Alert fetch elided");
            return Ok(Alert::partial(args.alert_id));
        }

        let envelope: AlertEnvelope = self
            .gateway
            .call_as(ApiCall::get(format!("incidents/{}/alerts/{}", incident, args.alert_id)))
            .await?;
        Ok(envelope.alert)
    }

    /// One slice of the incident's alerts.
    pub async fn page(&self, args: PageArgs, collection: &PathContext) -> PdgResult<Page<Alert>> {
        let incident = incident_of(collection)?;
        let listing: Listing<Alert> = self
            .gateway
            .call_as(ApiCall::get(format!("incidents/{}/alerts", incident)).query(QueryParams::from(&args)))
            .await?;

        debug!(
            incident = %incident,
            count = listing.items.len(),
            offset = listing.offset,
            "Fetched alert page"
        );

        Ok(Page {
            next: Continuation {
                path: collection.clone(),
                args: args.advanced_from(listing.limit, listing.offset),
            },
            items: listing.items,
        })
    }
}

#[async_trait]
impl NodeResolver for AlertCollectionResolver {
    fn kind(&self) -> NodeKind {
        NodeKind::AlertCollection
    }

    async fn resolve(&self, field: &str, args: &Value, cx: &ResolveContext<'_>) -> PdgResult<Resolved> {
        match field {
            ONE => {
                let alert = self.one(parse_args(field, args)?, cx.path, cx.requested).await?;
                Ok(Resolved::Value(serde_json::to_value(alert)?))
            }
            PAGE => {
                let page = self.page(parse_args(field, args)?, cx.path).await?;
                Ok(Resolved::Page(referenced_page(page)?))
            }
            _ => Err(self.unknown(field)),
        }
    }
}

/// Resolvers for a single alert node.
#[derive(Clone)]
pub struct AlertResolver {
    gateway: Arc<Gateway>,
}

impl AlertResolver {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Reference to the alert at `path`, built from its arguments only.
    pub fn gref(path: &PathContext) -> PdgResult<GraphRef> {
        Ok(GraphRef::alert(incident_of(path)?, path.arg_at(ALERT_OP, "alert_id")?))
    }

    pub async fn triggered(&self, path: &PathContext, actor: ActorArgs) -> PdgResult<Value> {
        self.transition(path, EntityStatus::Triggered, actor).await
    }

    pub async fn resolved(&self, path: &PathContext, actor: ActorArgs) -> PdgResult<Value> {
        self.transition(path, EntityStatus::Resolved, actor).await
    }

    async fn transition(&self, path: &PathContext, status: EntityStatus, actor: ActorArgs) -> PdgResult<Value> {
        let incident = incident_of(path)?;
        let alert = path.arg_at(ALERT_OP, "alert_id")?;
        debug!(incident = %incident, alert = %alert, status = status.as_str(), "Submitting alert transition");

        let body = EntityReference::alert(alert, status).into_body("alerts");
        self.gateway
            .call(
                ApiCall::put(format!("incidents/{}/alerts", incident))
                    .body(body)
                    .actor(actor.email.as_deref()),
            )
            .await
    }
}

#[async_trait]
impl NodeResolver for AlertResolver {
    fn kind(&self) -> NodeKind {
        NodeKind::Alert
    }

    async fn resolve(&self, field: &str, args: &Value, cx: &ResolveContext<'_>) -> PdgResult<Resolved> {
        match field {
            "gref" => Ok(Resolved::Ref(Self::gref(cx.path)?)),
            "triggered" => Ok(Resolved::Value(self.triggered(cx.path, parse_args(field, args)?).await?)),
            "resolved" => Ok(Resolved::Value(self.resolved(cx.path, parse_args(field, args)?).await?)),
            _ => Err(self.unknown(field)),
        }
    }
}
