use async_trait::async_trait;

use super::request::RequestDescriptor;
use super::response::RawResponse;
use crate::error::GatewayError;

/// Sends one request and returns the raw response, whatever its status.
///
/// Implementations only fail with [`GatewayError::Transport`]; status
/// handling and decoding belong to the gateway.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse, GatewayError>;
}
