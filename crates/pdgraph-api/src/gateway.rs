//! HTTP gateway to the PagerDuty APIs.
//!
//! Every outbound call goes through [`Gateway::call`]. The gateway builds the
//! URL, merges headers, attaches the stored credential, performs the request
//! once and turns any non-success status into [`PdgError::Remote`] carrying
//! the provider's body verbatim. There is no retry and no timeout.

use pdgraph_core::{ConfigStore, PdgError, PdgResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::query::QueryParams;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.pagerduty.com";

/// Default Events API base URL.
pub const DEFAULT_EVENTS_URL: &str = "https://events.pagerduty.com";

/// Which provider host a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Host {
    #[default]
    Api,
    Events,
}

/// Base URLs for each provider host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hosts {
    pub api: String,
    pub events: String,
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_string(),
            events: DEFAULT_EVENTS_URL.to_string(),
        }
    }
}

impl Hosts {
    /// Point both hosts at one base URL.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api: base.clone(),
            events: base,
        }
    }

    pub fn base(&self, host: Host) -> &str {
        match host {
            Host::Api => &self.api,
            Host::Events => &self.events,
        }
    }
}

/// Everything needed to issue one outbound request.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: QueryParams,
    pub headers: Vec<(String, String)>,
    pub host: Host,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
            headers: Vec::new(),
            host: Host::Api,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a `From` header naming the acting user, when one is given.
    pub fn actor(self, email: Option<&str>) -> Self {
        match email {
            Some(email) => self.header("From", email),
            None => self,
        }
    }

    pub fn host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }
}

/// Outbound client shared by all resolvers.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    hosts: Hosts,
    config: Arc<ConfigStore>,
}

impl Gateway {
    /// Create a gateway reading credentials from `config`.
    pub fn new(config: Arc<ConfigStore>, hosts: Hosts) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pdgraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            hosts,
            config,
        }
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Full URL for a call, query string included.
    pub fn url_for(&self, call: &ApiCall) -> PdgResult<Url> {
        let raw = format!(
            "{}/{}",
            self.hosts.base(call.host).trim_end_matches('/'),
            call.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| PdgError::InvalidUrl(format!("{}: {}", raw, e)))?;
        call.query.apply(&mut url);
        Ok(url)
    }

    /// Base headers, then call-site headers applied on top.
    ///
    /// The credential is read here, so a concurrent configure is observed by
    /// whichever calls build their headers after it lands.
    pub fn headers_for(&self, call: &ApiCall) -> PdgResult<HeaderMap> {
        let api_key = self.config.api_key().unwrap_or_else(|| {
            warn!("No PagerDuty API key configured, sending request without credential");
            String::new()
        });

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, header_value(&format!("Token token={}", api_key))?);

        for (name, value) in &call.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PdgError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }

    /// Perform one call and decode the JSON response.
    pub async fn call(&self, call: ApiCall) -> PdgResult<Value> {
        let url = self.url_for(&call)?;
        let headers = self.headers_for(&call)?;

        debug!(method = %call.method, url = %url, "Calling PagerDuty");

        let mut request = self.client.request(call.method.clone(), url.clone()).headers(headers);
        if let Some(body) = &call.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(method = %call.method, url = %url, status = %status, "PagerDuty call failed");
            return Err(PdgError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Perform one call and decode the response into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, call: ApiCall) -> PdgResult<T> {
        let value = self.call(call).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn header_value(value: &str) -> PdgResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| PdgError::InvalidHeader(format!("{}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdgraph_core::Config;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> Gateway {
        let config = ConfigStore::with_config(Config {
            api_key: Some("secret".into()),
            routing_key: None,
        });
        Gateway::new(Arc::new(config), Hosts::single(server.uri()))
    }

    #[test]
    fn test_url_targets_selected_host() {
        let gateway = Gateway::new(Arc::new(ConfigStore::in_memory()), Hosts::default());

        let api = gateway.url_for(&ApiCall::get("incidents/X")).unwrap();
        assert_eq!(api.as_str(), "https://api.pagerduty.com/incidents/X");

        let events = gateway
            .url_for(&ApiCall::post("v2/enqueue").host(Host::Events))
            .unwrap();
        assert_eq!(events.as_str(), "https://events.pagerduty.com/v2/enqueue");
    }

    #[test]
    fn test_call_site_headers_are_merged_on_top() {
        let gateway = Gateway::new(
            Arc::new(ConfigStore::with_config(Config {
                api_key: Some("k".into()),
                routing_key: None,
            })),
            Hosts::default(),
        );

        let call = ApiCall::put("incidents").actor(Some("a@b.com"));
        let headers = gateway.headers_for(&call).unwrap();

        assert_eq!(headers["from"], "a@b.com");
        assert_eq!(headers[AUTHORIZATION], "Token token=k");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn test_actor_is_optional() {
        let call = ApiCall::put("incidents").actor(None);
        assert!(call.headers.is_empty());
    }

    #[tokio::test]
    async fn test_call_sends_credential_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incidents"))
            .and(header("authorization", "Token token=secret"))
            .and(header("accept", "application/json"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "incidents": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let call = ApiCall::get("incidents").query(
            QueryParams::new()
                .with("limit", Some("10"))
                .with("offset", None::<String>),
        );
        let value = gateway(&server).call(call).await.unwrap();
        assert_eq!(value, json!({ "incidents": [] }));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("limit=10"));
    }

    #[tokio::test]
    async fn test_body_is_sent_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/enqueue"))
            .and(body_json(json!({ "event_action": "trigger" })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "status": "success" })))
            .expect(1)
            .mount(&server)
            .await;

        let call = ApiCall::post("v2/enqueue")
            .host(Host::Events)
            .body(json!({ "event_action": "trigger" }));
        let value = gateway(&server).call(call).await.unwrap();
        assert_eq!(value["status"], "success");
    }

    #[tokio::test]
    async fn test_failure_surfaces_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid"))
            .mount(&server)
            .await;

        let err = gateway(&server).call(ApiCall::put("incidents")).await.unwrap_err();
        assert!(matches!(err, PdgError::Remote { status: 422, .. }));
        assert_eq!(err.to_string(), "invalid");
    }

    #[tokio::test]
    async fn test_missing_key_still_calls_and_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incidents/X"))
            .and(header("authorization", "Token token="))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"Unauthorized"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(Arc::new(ConfigStore::in_memory()), Hosts::single(server.uri()));
        let err = gateway.call(ApiCall::get("incidents/X")).await.unwrap_err();

        assert!(matches!(err, PdgError::Remote { status: 401, .. }));
        assert_eq!(err.to_string(), r#"{"error":"Unauthorized"}"#);
    }

    #[test]
    fn test_empty_key_sends_empty_token() {
        let config = ConfigStore::with_config(Config {
            api_key: Some(String::new()),
            routing_key: None,
        });
        let gateway = Gateway::new(Arc::new(config), Hosts::default());

        let headers = gateway.headers_for(&ApiCall::get("incidents")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Token token=");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).call(ApiCall::get("incidents")).await.unwrap_err();
        assert!(matches!(err, PdgError::Decode(_)));
    }
}
