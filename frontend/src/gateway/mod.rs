//! Request gateway: the only way the dashboard talks to its API.
//!
//! Every call goes through the same pipeline:
//! 1. merge the session's common search parameters with the caller's
//!    (query string for GET/DELETE, JSON body for POST/PUT), dropping
//!    `null` and empty values;
//! 2. attach `Content-Type: application/json` and, when the session holds a
//!    token, `Authorization: Bearer <token>`; caller headers win;
//! 3. dispatch through a [`Transport`];
//! 4. fail non-2xx responses with [`GatewayError::RequestFailed`], otherwise
//!    decode the body by its content type.
//!
//! Errors are logged, passed to the registered [`ErrorInterceptor`]s and
//! returned; the gateway itself never retries or navigates.

mod params;
mod request;
mod response;
mod transport;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(test)]
pub(crate) mod mock;

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::GatewayError;
use crate::session::SessionContext;

pub use params::{append_query, encode_query};
pub use request::{Method, RequestDescriptor};
pub use response::{RawResponse, Payload};
pub use transport::Transport;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeTransport;

/// Named request parameters, kept in insertion order.
pub type Params = serde_json::Map<String, Value>;

/// Converts any struct that serializes to a JSON object into [`Params`].
pub fn to_params<T: Serialize>(value: &T) -> Result<Params, GatewayError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GatewayError::InvalidParams(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(GatewayError::InvalidParams(e.to_string())),
    }
}

/// Per-call extras.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Replace default headers of the same (case-insensitive) name.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Observer for failed calls. The UI uses it for cross-cutting reactions
/// such as sending the user back to the login view on `401`/`403`.
pub trait ErrorInterceptor {
    fn on_error(&self, request: &RequestDescriptor, error: &GatewayError);
}

/// Runs a callback for `401` and `403` failures only.
pub struct OnUnauthorized<F>(pub F);

impl<F> ErrorInterceptor for OnUnauthorized<F>
where
    F: Fn(&GatewayError),
{
    fn on_error(&self, _request: &RequestDescriptor, error: &GatewayError) {
        if error.is_unauthorized() {
            (self.0)(error);
        }
    }
}

/// Cheap to clone; clones share transport, session and interceptors.
#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    transport: Rc<dyn Transport>,
    session: Rc<dyn SessionContext>,
    interceptors: Vec<Rc<dyn ErrorInterceptor>>,
}

impl Gateway {
    pub fn new(
        base_url: impl Into<String>,
        transport: Rc<dyn Transport>,
        session: Rc<dyn SessionContext>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
            interceptors: Vec::new(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: &ClientConfig, session: Rc<dyn SessionContext>) -> Self {
        Self::new(config.api_base_url.clone(), Rc::new(BrowserTransport), session)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn native(config: &ClientConfig, session: Rc<dyn SessionContext>) -> Self {
        Self::new(
            config.api_base_url.clone(),
            Rc::new(NativeTransport::new()),
            session,
        )
    }

    pub fn with_interceptor(mut self, interceptor: Rc<dyn ErrorInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/admin/users`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Builds the request without sending it.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        params: Params,
        options: &RequestOptions,
    ) -> RequestDescriptor {
        let common = self.session.common_params().to_params();
        let (url, body) = match method {
            Method::Get | Method::Delete => {
                let merged = params::merge_for_query(common, params);
                (append_query(&self.url(path), &encode_query(&merged)), None)
            }
            Method::Post | Method::Put => {
                let merged = params::merge_for_body(params, common);
                (self.url(path), Some(Value::Object(merged).to_string()))
            }
        };
        let token = self.session.access_token();
        RequestDescriptor {
            method,
            url,
            headers: request::build_headers(token.as_deref(), &options.headers),
            body,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        params: Params,
        options: &RequestOptions,
    ) -> Result<Payload, GatewayError> {
        let request = self.build(method, path, params, options);
        log::debug!("{} {}", request.method, request.url);

        let result = self.dispatch(&request).await;
        if let Err(err) = &result {
            log::error!("{} {} failed: {}", request.method, request.url, err);
            for interceptor in &self.interceptors {
                interceptor.on_error(&request, err);
            }
        }
        result
    }

    async fn dispatch(&self, request: &RequestDescriptor) -> Result<Payload, GatewayError> {
        let response = self.transport.send(request.clone()).await?;
        if !response.is_success() {
            return Err(GatewayError::RequestFailed {
                status: response.status,
                body: response.text_lossy(),
            });
        }
        response::decode(response)
    }

    pub async fn get(&self, path: &str, params: Params) -> Result<Payload, GatewayError> {
        self.send(Method::Get, path, params, &RequestOptions::default())
            .await
    }

    pub async fn get_with(
        &self,
        path: &str,
        params: Params,
        options: &RequestOptions,
    ) -> Result<Payload, GatewayError> {
        self.send(Method::Get, path, params, options).await
    }

    pub async fn del(&self, path: &str, params: Params) -> Result<Payload, GatewayError> {
        self.send(Method::Delete, path, params, &RequestOptions::default())
            .await
    }

    pub async fn del_with(
        &self,
        path: &str,
        params: Params,
        options: &RequestOptions,
    ) -> Result<Payload, GatewayError> {
        self.send(Method::Delete, path, params, options).await
    }

    pub async fn post(&self, path: &str, data: Params) -> Result<Payload, GatewayError> {
        self.send(Method::Post, path, data, &RequestOptions::default())
            .await
    }

    pub async fn post_with(
        &self,
        path: &str,
        data: Params,
        options: &RequestOptions,
    ) -> Result<Payload, GatewayError> {
        self.send(Method::Post, path, data, options).await
    }

    pub async fn put(&self, path: &str, data: Params) -> Result<Payload, GatewayError> {
        self.send(Method::Put, path, data, &RequestOptions::default())
            .await
    }

    pub async fn put_with(
        &self,
        path: &str,
        data: Params,
        options: &RequestOptions,
    ) -> Result<Payload, GatewayError> {
        self.send(Method::Put, path, data, options).await
    }

    /// GET and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> Result<T, GatewayError> {
        self.get(path, params).await?.into_model()
    }

    /// POST and decode the JSON body into `T`.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Params,
    ) -> Result<T, GatewayError> {
        self.post(path, data).await?.into_model()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::mock::{json_response, ScriptedTransport};
    use super::*;
    use crate::session::MemorySession;

    const BASE: &str = "http://localhost:5000/api";

    fn obj(value: Value) -> Params {
        to_params(&value).unwrap()
    }

    fn setup(session: MemorySession) -> (Rc<ScriptedTransport>, Gateway) {
        let transport = Rc::new(ScriptedTransport::new());
        let gateway = Gateway::new(BASE, transport.clone(), Rc::new(session));
        (transport, gateway)
    }

    fn scenario_session() -> MemorySession {
        let session = MemorySession::with_token("abc123");
        session.update_search(|s| {
            s.set_search_type("user");
            s.set_search_by("");
            s.set_search_value("");
        });
        session
    }

    #[tokio::test]
    async fn get_sends_only_present_common_params() {
        let (transport, gateway) = setup(scenario_session());
        transport.json(200, json!([]));

        gateway.get("/admin/users", Params::new()).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url, "http://localhost:5000/api/admin/users?searchType=user");
        assert_eq!(sent.header("Authorization"), Some("Bearer abc123"));
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn caller_params_override_common_params_in_query() {
        let session = scenario_session();
        session.update_search(|s| s.set_date_range(Some("2024-01-01".into()), None));
        let (transport, gateway) = setup(session);
        transport.json(200, json!({}));

        gateway
            .del("/admin/reminders/7", obj(json!({"searchType": "reminder"})))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(
            sent.url,
            "http://localhost:5000/api/admin/reminders/7?searchType=reminder&startDate=2024-01-01"
        );
    }

    #[tokio::test]
    async fn post_body_is_caller_data_plus_common_params() {
        let (transport, gateway) = setup(scenario_session());
        transport.json(200, json!({"results": []}));

        gateway
            .post("/admin/search", obj(json!({"q": "alice"})))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://localhost:5000/api/admin/search");
        assert_eq!(sent.body.as_deref(), Some(r#"{"q":"alice","searchType":"user"}"#));
    }

    #[tokio::test]
    async fn put_never_sends_empty_or_null_values() {
        let (transport, gateway) = setup(scenario_session());
        transport.json(200, json!({}));

        gateway
            .put("/admin/lots/3", obj(json!({"name": "North", "remarks": "", "price": null})))
            .await
            .unwrap();

        let body: Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "North", "searchType": "user"}));
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let (transport, gateway) = setup(MemorySession::new());
        transport.json(200, json!({}));

        gateway.get("/lots", Params::new()).await.unwrap();

        let sent = &transport.requests()[0];
        assert!(sent.header("Authorization").is_none());
    }

    #[tokio::test]
    async fn caller_headers_override_defaults() {
        let (transport, gateway) = setup(scenario_session());
        transport.json(200, json!({}));

        let options = RequestOptions::default().header("content-type", "text/plain");
        gateway
            .post_with("/admin/notes", Params::new(), &options)
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.header("Content-Type"), Some("text/plain"));
        assert_eq!(sent.header("Authorization"), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn server_error_is_request_failed() {
        let (transport, gateway) = setup(scenario_session());
        transport.json(500, json!({"error": "boom"}));

        let err = gateway.get("/admin/users", Params::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, GatewayError::RequestFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_request_failed() {
        let (transport, gateway) = setup(scenario_session());
        transport.reply(Err(GatewayError::Transport("connection reset".into())));

        let err = gateway.get("/admin/users", Params::new()).await.unwrap_err();
        assert_eq!(err, GatewayError::Transport("connection reset".into()));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn pdf_response_is_binary() {
        let (transport, gateway) = setup(scenario_session());
        transport.reply(Ok(RawResponse {
            status: 200,
            content_type: "application/pdf".into(),
            body: b"%PDF-1.7".to_vec(),
        }));

        let payload = gateway.get("/admin/reports/1", Params::new()).await.unwrap();
        assert_eq!(payload, Payload::Binary(b"%PDF-1.7".to_vec()));
    }

    #[tokio::test]
    async fn json_response_round_trips_through_post_body() {
        let session = MemorySession::new();
        session.update_search(|s| s.set_search_type(""));
        let (transport, gateway) = setup(session);
        let original = json!({"id": 9, "name": "Lot A", "spots": [1, 2], "meta": {"open": true}});
        transport.json(200, original.clone());
        transport.json(200, json!({}));

        let fetched = gateway.get("/admin/lots/9", Params::new()).await.unwrap();
        let fetched = fetched.as_json().cloned().unwrap();
        gateway.post("/admin/lots", obj(fetched.clone())).await.unwrap();

        let resent: Value =
            serde_json::from_str(transport.requests()[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(resent, original);
        assert_eq!(fetched, original);
    }

    #[tokio::test]
    async fn unauthorized_interceptor_fires_only_on_401_and_403() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let (transport, gateway) = setup(scenario_session());
        let gateway = gateway.with_interceptor(Rc::new(OnUnauthorized(move |err: &GatewayError| {
            sink.borrow_mut().push(err.status());
        })));
        transport
            .reply(Ok(json_response(401, json!({"msg": "expired"}))))
            .reply(Ok(json_response(500, json!({}))))
            .reply(Ok(json_response(403, json!({}))));

        for _ in 0..3 {
            assert!(gateway.get("/admin/users", Params::new()).await.is_err());
        }
        assert_eq!(*seen.borrow(), vec![Some(401), Some(403)]);
    }

    #[tokio::test]
    async fn get_json_decodes_typed_model() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Lot {
            id: i64,
            name: String,
        }
        let (transport, gateway) = setup(MemorySession::new());
        transport.json(200, json!({"id": 1, "name": "Central"}));

        let lot: Lot = gateway.get_json("/admin/lots/1", Params::new()).await.unwrap();
        assert_eq!(lot, Lot { id: 1, name: "Central".into() });
    }

    #[test]
    fn to_params_rejects_non_objects() {
        assert!(matches!(
            to_params(&json!([1, 2])),
            Err(GatewayError::InvalidParams(_))
        ));
    }
}
