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

//! JSON-RPC 2.0 data model.
//!
//! Pure data structures for requests, responses and call outcomes.
//! Nothing in this module performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::rpc::constants::jsonrpc;

/// Correlation id of a call. A request without one is a notification.
///
/// Numbers are kept as `serde_json::Number`, so integers, large unsigned
/// values and fractions all go back on the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl RequestId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => n.as_i64(),
            RequestId::String(_) => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(Number::from(id))
    }
}

impl From<Number> for RequestId {
    fn from(id: Number) -> Self {
        RequestId::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Outgoing JSON-RPC request.
///
/// `params` is left off the wire when empty and `id` when absent, so a
/// notification serializes as `{"jsonrpc":"2.0","method":...}` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Map<String, Value>, id: Option<RequestId>) -> Self {
        Self {
            jsonrpc: jsonrpc::VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    pub fn call(method: impl Into<String>, params: Map<String, Value>, id: impl Into<RequestId>) -> Self {
        Self::new(method, params, Some(id.into()))
    }

    pub fn notification(method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self::new(method, params, None)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Human name of a standard error code.
    pub fn code_name(&self) -> &'static str {
        match self.code {
            jsonrpc::ERROR_PARSE => "Parse error",
            jsonrpc::ERROR_INVALID_REQUEST => "Invalid request",
            jsonrpc::ERROR_METHOD_NOT_FOUND => "Method not found",
            jsonrpc::ERROR_INVALID_PARAMS => "Invalid params",
            jsonrpc::ERROR_INTERNAL => "Internal error",
            -32099..=-32000 => "Server error",
            _ => "Application error",
        }
    }
}

/// Lenient reading of a decoded response body.
///
/// The client never enforces the envelope; this is only used to describe
/// what came back.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Response {
    Result {
        id: Option<RequestId>,
        result: Value,
    },
    Error {
        id: Option<RequestId>,
        error: JsonRpcError,
    },
}

impl Response {
    /// Returns `None` when the body is neither a result nor an error object.
    pub fn classify(body: &Value) -> Option<Response> {
        let obj = body.as_object()?;
        let id = obj
            .get("id")
            .and_then(|v| RequestId::deserialize(v).ok());

        if let Some(error) = obj.get("error") {
            if let Ok(error) = JsonRpcError::deserialize(error) {
                return Some(Response::Error { id, error });
            }
        }

        obj.get("result").map(|result| Response::Result {
            id,
            result: result.clone(),
        })
    }
}

/// How a response's `id` lines up with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    Matched,
    Mismatched { expected: RequestId, received: Value },
    /// Response carried no usable `id` (absent, null, or not an object)
    Missing,
}

impl Correlation {
    pub fn of(expected: &RequestId, body: &Value) -> Self {
        match body.get("id") {
            None | Some(Value::Null) => Correlation::Missing,
            Some(received) => match RequestId::deserialize(received) {
                Ok(ref id) if id == expected => Correlation::Matched,
                _ => Correlation::Mismatched {
                    expected: expected.clone(),
                    received: received.clone(),
                },
            },
        }
    }
}

/// Successful outcome of a single exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Decoded body of a call, returned verbatim
    Response { body: Value, correlation: Correlation },
    /// Notification accepted by the transport. Resolved on the status line;
    /// the body is never read.
    Acknowledged { status: u16 },
}

impl Reply {
    pub fn body(&self) -> Option<&Value> {
        match self {
            Reply::Response { body, .. } => Some(body),
            Reply::Acknowledged { .. } => None,
        }
    }
}
