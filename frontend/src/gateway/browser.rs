use async_trait::async_trait;
use gloo_net::http::{Method as HttpMethod, RequestBuilder};

use super::request::{Method, RequestDescriptor};
use super::response::RawResponse;
use super::transport::Transport;
use crate::error::GatewayError;

/// `fetch`-backed transport for the wasm build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

fn http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Delete => HttpMethod::DELETE,
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse, GatewayError> {
        let mut builder = RequestBuilder::new(&request.url).method(http_method(request.method));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get("content-type").unwrap_or_default();
        let body = response
            .binary()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
