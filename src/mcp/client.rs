// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP client for JSON-RPC 2.0 calls against an MCP endpoint.
//!
//! One call is one POST. There are no retries and no pooled connections;
//! every exchange is bounded by a deadline and resolves exactly once.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::mcp::endpoint::Endpoint;
use crate::mcp::transport::RpcTransport;
use crate::rpc::constants::transport;
use crate::rpc::{ClientError, ConfigError, Correlation, JsonRpcRequest, Reply, RequestId};

/// HTTP transport for JSON-RPC 2.0 requests.
pub struct HttpRpcClient {
    http_client: Client,
    endpoint: Endpoint,
    default_timeout: Duration,
}

impl HttpRpcClient {
    /// Create a client with the 5000 ms default deadline.
    pub fn new(endpoint: Endpoint) -> Result<Self, ConfigError> {
        Self::with_timeout(
            endpoint,
            Duration::from_millis(transport::DEFAULT_TIMEOUT_MS),
        )
    }

    /// Create a client with a custom default deadline.
    ///
    /// # Arguments
    /// * `endpoint` - Target URL for every POST
    /// * `default_timeout` - Deadline used when `send` is given `None`
    pub fn with_timeout(endpoint: Endpoint, default_timeout: Duration) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .pool_max_idle_per_host(0) // One connection per call
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
            default_timeout,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one JSON-RPC message.
    ///
    /// `id: None` makes it a notification. Empty `params` are left off the wire.
    pub async fn send(
        &self,
        method: &str,
        params: Map<String, Value>,
        id: Option<RequestId>,
        timeout: Option<Duration>,
    ) -> Result<Reply, ClientError> {
        let request = JsonRpcRequest::new(method, params, id);
        self.send_request(&request, timeout.unwrap_or(self.default_timeout))
            .await
    }

    /// GET the endpoint root and return the HTTP status code.
    pub async fn check_health(&self, timeout: Option<Duration>) -> Result<u16, ClientError> {
        const METHOD: &str = "GET /";
        let timeout = timeout.unwrap_or(self.default_timeout);
        let url = self.endpoint.base_url();

        let fut = async {
            let response = self.http_client.get(url.clone()).send().await?;
            Ok::<_, reqwest::Error>(response.status())
        };

        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(status)) => {
                info!(url = %url, status = %status, "Health check answered");
                Ok(status.as_u16())
            }
            Ok(Err(e)) if e.is_timeout() => Err(ClientError::Timeout {
                method: METHOD.to_string(),
                after: timeout,
            }),
            Ok(Err(e)) => Err(ClientError::Transport {
                method: METHOD.to_string(),
                source: e,
            }),
            Err(_) => Err(ClientError::Timeout {
                method: METHOD.to_string(),
                after: timeout,
            }),
        }
    }

    /// POST the payload. With `read_body` false the call returns as soon as
    /// the status line and headers are in, and the response is dropped unread.
    async fn post(
        &self,
        payload: Vec<u8>,
        read_body: bool,
    ) -> Result<(StatusCode, Option<String>), reqwest::Error> {
        // A Vec body gives reqwest an exact Content-Length.
        let response = self
            .http_client
            .post(self.endpoint.url().clone())
            .header(CONTENT_TYPE, transport::CONTENT_TYPE_JSON)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !read_body {
            return Ok((status, None));
        }
        let body = response.text().await?;
        Ok((status, Some(body)))
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send_request(
        &self,
        request: &JsonRpcRequest,
        timeout: Duration,
    ) -> Result<Reply, ClientError> {
        let payload = serde_json::to_vec(request).map_err(|source| ClientError::Encode {
            method: request.method.clone(),
            source,
        })?;

        let pending = PendingCall::open(request, self.endpoint.url().as_str());

        // A notification's body is never looked at, so it is never waited for either:
        // servers may answer 202 with a stream that stays open.
        let read_body = !request.is_notification();

        // Dropping the future on expiry aborts the connection; nothing partial is kept.
        match tokio::time::timeout(timeout, self.post(payload, read_body)).await {
            Ok(Ok((status, None))) => Ok(pending.acknowledge(status)),
            Ok(Ok((status, Some(body)))) => pending.complete(status, body),
            Ok(Err(e)) if e.is_timeout() => Err(pending.timed_out(timeout)),
            Ok(Err(e)) => Err(pending.transport_failed(e)),
            Err(_) => Err(pending.timed_out(timeout)),
        }
    }

    fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

/// A request that has been sent and not yet resolved.
///
/// Every resolving method consumes the call, so a call moves
/// `Sent -> Completed | TimedOut | TransportFailed` exactly once.
struct PendingCall<'a> {
    method: &'a str,
    id: Option<&'a RequestId>,
    started: Instant,
}

impl<'a> PendingCall<'a> {
    fn open(request: &'a JsonRpcRequest, url: &str) -> Self {
        debug!(
            url = %url,
            method = %request.method,
            id = ?request.id,
            "Sending JSON-RPC request"
        );
        Self {
            method: &request.method,
            id: request.id.as_ref(),
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn acknowledge(self, status: StatusCode) -> Reply {
        debug!(
            method = %self.method,
            status = %status,
            elapsed_ms = self.elapsed_ms(),
            "Notification acknowledged"
        );
        Reply::Acknowledged {
            status: status.as_u16(),
        }
    }

    fn complete(self, status: StatusCode, body: String) -> Result<Reply, ClientError> {
        // Notifications are never correlated, whatever the server sends back.
        let Some(expected) = self.id else {
            return Ok(self.acknowledge(status));
        };
        let elapsed_ms = self.elapsed_ms();

        match serde_json::from_str::<Value>(&body) {
            Ok(decoded) => {
                let correlation = Correlation::of(expected, &decoded);
                if let Correlation::Mismatched { received, .. } = &correlation {
                    warn!(
                        method = %self.method,
                        expected = %expected,
                        received = %received,
                        "Response id does not match request id"
                    );
                }
                debug!(method = %self.method, status = %status, elapsed_ms, "Response received");
                Ok(Reply::Response {
                    body: decoded,
                    correlation,
                })
            }
            Err(e) => {
                warn!(method = %self.method, status = %status, error = %e, "Response body is not JSON");
                Err(ClientError::MalformedResponse {
                    method: self.method.to_string(),
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    fn timed_out(self, after: Duration) -> ClientError {
        warn!(method = %self.method, timeout_ms = after.as_millis() as u64, "Request timed out");
        ClientError::Timeout {
            method: self.method.to_string(),
            after,
        }
    }

    fn transport_failed(self, source: reqwest::Error) -> ClientError {
        warn!(
            method = %self.method,
            elapsed_ms = self.elapsed_ms(),
            error = %source,
            "Transport failure"
        );
        ClientError::Transport {
            method: self.method.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: Option<RequestId>) -> JsonRpcRequest {
        JsonRpcRequest::new("tools/list", Map::new(), id)
    }

    #[test]
    fn test_client_default_timeout() {
        let client = HttpRpcClient::new(Endpoint::parse("http://localhost:8080/mcp").unwrap()).unwrap();
        assert_eq!(client.default_timeout(), Duration::from_millis(5000));
        assert_eq!(client.endpoint().url().path(), "/mcp");
    }

    #[test]
    fn test_client_custom_timeout() {
        let client = HttpRpcClient::with_timeout(
            Endpoint::parse("http://localhost:8080/mcp").unwrap(),
            Duration::from_millis(250),
        )
        .unwrap();
        assert_eq!(client.default_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_pending_call_decodes_response() {
        let request = call(Some(RequestId::from(2)));
        let pending = PendingCall::open(&request, "http://test");
        let reply = pending
            .complete(StatusCode::OK, r#"{"jsonrpc":"2.0","id":2,"result":{}}"#.to_string())
            .unwrap();
        assert_eq!(
            reply,
            Reply::Response {
                body: json!({"jsonrpc": "2.0", "id": 2, "result": {}}),
                correlation: Correlation::Matched,
            }
        );
    }

    #[test]
    fn test_pending_call_keeps_raw_body_on_malformed() {
        let request = call(Some(RequestId::from(2)));
        let pending = PendingCall::open(&request, "http://test");
        let err = pending
            .complete(StatusCode::OK, "not-json".to_string())
            .unwrap_err();
        match err {
            ClientError::MalformedResponse { method, status, body } => {
                assert_eq!(method, "tools/list");
                assert_eq!(status, 200);
                assert_eq!(body, "not-json");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_pending_notification_skips_decoding() {
        let request = call(None);
        let pending = PendingCall::open(&request, "http://test");
        let reply = pending
            .complete(StatusCode::ACCEPTED, "not-json".to_string())
            .unwrap();
        assert_eq!(reply, Reply::Acknowledged { status: 202 });
        assert!(reply.body().is_none());
    }

    #[test]
    fn test_pending_call_timeout_error() {
        let request = call(Some(RequestId::from(9)));
        let pending = PendingCall::open(&request, "http://test");
        let err = pending.timed_out(Duration::from_millis(50));
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.method(), "tools/list");
    }
}
