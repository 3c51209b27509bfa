//! Incident collection and incident resolvers.

use async_trait::async_trait;
use pdgraph_api::{ApiCall, Gateway, QueryParams};
use pdgraph_core::reference::{INCIDENT_OP, ONE, PAGE};
use pdgraph_core::{
    Continuation, EntityReference, EntityStatus, GraphRef, Incident, Listing, Page, PageArgs,
    PathContext, PdgResult, RequestedFields,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::node::{NodeKind, Resolved};
use crate::resolver::{parse_args, referenced_page, ActorArgs, NodeResolver, ResolveContext};
use crate::SIMPLE_FIELDS;

/// Arguments of `incidents.one`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentArgs {
    pub id: String,
}

#[derive(Deserialize)]
struct IncidentEnvelope {
    incident: Incident,
}

/// Resolvers for `root.incidents`.
#[derive(Clone)]
pub struct IncidentCollectionResolver {
    gateway: Arc<Gateway>,
}

impl IncidentCollectionResolver {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// One incident, or just its identity when nothing else was requested.
    pub async fn one(&self, args: IncidentArgs, requested: &RequestedFields) -> PdgResult<Incident> {
        if !requested.requires_fetch(SIMPLE_FIELDS) {
            debug!(incident = %args.id, "Incident fetch elided");
            return Ok(Incident::partial(args.id));
        }

        let envelope: IncidentEnvelope = self
            .gateway
            .call_as(ApiCall::get(format!("incidents/{}", args.id)))
            .await?;
        Ok(envelope.incident)
    }

    /// One slice of incidents. `collection` is the path of this collection node.
    pub async fn page(&self, args: PageArgs, collection: &PathContext) -> PdgResult<Page<Incident>> {
        let listing: Listing<Incident> = self
            .gateway
            .call_as(ApiCall::get("incidents").query(QueryParams::from(&args)))
            .await?;

        debug!(
            count = listing.items.len(),
            offset = listing.offset,
            limit = listing.limit,
            more = listing.more,
            "Fetched incident page"
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
impl NodeResolver for IncidentCollectionResolver {
    fn kind(&self) -> NodeKind {
        NodeKind::IncidentCollection
    }

    async fn resolve(&self, field: &str, args: &Value, cx: &ResolveContext<'_>) -> PdgResult<Resolved> {
        match field {
            ONE => {
                let incident = self.one(parse_args(field, args)?, cx.requested).await?;
                Ok(Resolved::Value(serde_json::to_value(incident)?))
            }
            PAGE => {
                let page = self.page(parse_args(field, args)?, cx.path).await?;
                Ok(Resolved::Page(referenced_page(page)?))
            }
            _ => Err(self.unknown(field)),
        }
    }
}

/// Resolvers for a single incident node.
#[derive(Clone)]
pub struct IncidentResolver {
    gateway: Arc<Gateway>,
}

impl IncidentResolver {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Reference to the incident at `path`, built from its arguments only.
    pub fn gref(path: &PathContext) -> PdgResult<GraphRef> {
        Ok(GraphRef::incident(path.arg_at(INCIDENT_OP, "id")?))
    }

    pub async fn acknowledged(&self, path: &PathContext, actor: ActorArgs) -> PdgResult<Value> {
        self.transition(path, EntityStatus::Acknowledged, actor).await
    }

    pub async fn resolved(&self, path: &PathContext, actor: ActorArgs) -> PdgResult<Value> {
        self.transition(path, EntityStatus::Resolved, actor).await
    }

    /// Submit a status transition and return the provider's acknowledgement.
    async fn transition(&self, path: &PathContext, status: EntityStatus, actor: ActorArgs) -> PdgResult<Value> {
        let incident = path.arg_at(INCIDENT_OP, "id")?;
        debug!(incident = %incident, status = status.as_str(), "Submitting incident transition");

        let body = EntityReference::incident(incident, status).into_body("incidents");
        self.gateway
            .call(ApiCall::put("incidents").body(body).actor(actor.email.as_deref()))
            .await
    }
}

#[async_trait]
impl NodeResolver for IncidentResolver {
    fn kind(&self) -> NodeKind {
        NodeKind::Incident
    }

    async fn resolve(&self, field: &str, args: &Value, cx: &ResolveContext<'_>) -> PdgResult<Resolved> {
        match field {
            "gref" => Ok(Resolved::Ref(Self::gref(cx.path)?)),
            "alerts" => Ok(Resolved::Node),
            "acknowledged" => Ok(Resolved::Value(self.acknowledged(cx.path, parse_args(field, args)?).await?)),
            "resolved" => Ok(Resolved::Value(self.resolved(cx.path, parse_args(field, args)?).await?)),
            _ => Err(self.unknown(field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdgraph_api::Hosts;
    use pdgraph_core::{Config, ConfigStore, Frame, PdgError};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> Arc<Gateway> {
        let config = ConfigStore::with_config(Config {
            api_key: Some("secret".into()),
            routing_key: None,
        });
        Arc::new(Gateway::new(Arc::new(config), Hosts::single(server.uri())))
    }

    fn collection() -> PathContext {
        PathContext::root().child(Frame::new("incidents"))
    }

    #[tokio::test]
    async fn test_one_with_identity_only_skips_fetch() {
        let server = MockServer::start().await;
        let resolver = IncidentCollectionResolver::new(gateway(&server));

        let incident = resolver
            .one(IncidentArgs { id: "X".into() }, &RequestedFields::from_iter(["id"]))
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(incident).unwrap(), json!({ "id": "X" }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_with_extra_fields_fetches_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incidents/X"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incident": { "id": "X", "status": "triggered", "title": "db down" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = IncidentCollectionResolver::new(gateway(&server));
        let incident = resolver
            .one(IncidentArgs { id: "X".into() }, &RequestedFields::from_iter(["id", "title"]))
            .await
            .unwrap();

        assert_eq!(incident.status, Some(EntityStatus::Triggered));
        assert_eq!(incident.title.as_deref(), Some("db down"));
    }

    #[tokio::test]
    async fn test_page_continuation_uses_echoed_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incidents"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [{ "id": "A" }],
                "limit": 25,
                "offset": 5,
                "more": true
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/incidents"))
            .and(query_param("offset", "6"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [],
                "limit": 25,
                "offset": 20,
                "more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = IncidentCollectionResolver::new(gateway(&server));
        let first = resolver.page(PageArgs::default(), &collection()).await.unwrap();
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.next.args.offset, Some(6));
        assert_eq!(first.next.path, collection());

        let second = resolver.page(first.next.args.clone(), &first.next.path).await.unwrap();
        assert!(second.items.is_empty());
        assert_eq!(second.next.args.offset, Some(21));
    }

    #[tokio::test]
    async fn test_page_items_carry_references() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incidents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [{ "id": "A" }],
                "limit": 1,
                "offset": 0
            })))
            .mount(&server)
            .await;

        let resolver = IncidentCollectionResolver::new(gateway(&server));
        let cx = ResolveContext {
            path: &collection(),
            requested: &RequestedFields::all(),
        };
        let page = resolver.resolve(PAGE, &json!({}), &cx).await.unwrap().into_page().unwrap();
        assert_eq!(page.items[0]["gref"], json!(r#"root.incidents.one(id: "A")"#));
    }

    #[tokio::test]
    async fn test_resolved_sends_transition_and_actor() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/incidents"))
            .and(header("from", "a@b.com"))
            .and(body_json(json!({
                "incidents": [{ "id": "X", "type": "incident_reference", "status": "resolved" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "incidents": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = IncidentResolver::new(gateway(&server));
        let ack = resolver
            .resolved(
                GraphRef::incident("X").path(),
                ActorArgs {
                    email: Some("a@b.com".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(ack, json!({ "incidents": [] }));
    }

    #[tokio::test]
    async fn test_acknowledged_failure_propagates_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid"))
            .mount(&server)
            .await;

        let resolver = IncidentResolver::new(gateway(&server));
        let err = resolver
            .acknowledged(GraphRef::incident("X").path(), ActorArgs::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid");
    }

    #[tokio::test]
    async fn test_gref_and_descender_need_no_network() {
        let server = MockServer::start().await;
        let resolver = IncidentResolver::new(gateway(&server));
        let path = GraphRef::incident("X").into_path();
        let cx = ResolveContext {
            path: &path,
            requested: &RequestedFields::none(),
        };

        let gref = resolver.resolve("gref", &Value::Null, &cx).await.unwrap();
        assert_eq!(gref, Resolved::Ref(GraphRef::incident("X")));
        assert_eq!(resolver.resolve("alerts", &Value::Null, &cx).await.unwrap(), Resolved::Node);
        assert!(matches!(
            resolver.resolve("escalated", &Value::Null, &cx).await,
            Err(PdgError::UnknownField { .. })
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
