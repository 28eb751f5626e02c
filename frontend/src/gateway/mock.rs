//! Scripted transport for tests: replies are served in order, every request is recorded.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::request::RequestDescriptor;
use super::response::RawResponse;
use super::transport::Transport;
use crate::error::GatewayError;
use crate::platform;

struct Scripted {
    delay: Option<Duration>,
    reply: Result<RawResponse, GatewayError>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: RefCell<Vec<RequestDescriptor>>,
    replies: RefCell<VecDeque<Scripted>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, reply: Result<RawResponse, GatewayError>) -> &Self {
        self.replies.borrow_mut().push_back(Scripted { delay: None, reply });
        self
    }

    pub(crate) fn reply_after(
        &self,
        delay: Duration,
        reply: Result<RawResponse, GatewayError>,
    ) -> &Self {
        self.replies.borrow_mut().push_back(Scripted {
            delay: Some(delay),
            reply,
        });
        self
    }

    pub(crate) fn json(&self, status: u16, body: Value) -> &Self {
        self.reply(Ok(json_response(status, body)))
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.borrow().clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

pub(crate) fn json_response(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        content_type: "application/json".to_string(),
        body: body.to_string().into_bytes(),
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse, GatewayError> {
        self.requests.borrow_mut().push(request);
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Scripted { delay, reply }) => {
                if let Some(delay) = delay {
                    platform::sleep(delay).await;
                }
                reply
            }
            None => Err(GatewayError::Transport("no scripted reply".to_string())),
        }
    }
}
