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

//! Probe suites: ordered lists of JSON-RPC calls to run against a server.
//!
//! The standard suite walks the MCP handshake and list endpoints. Custom
//! suites are loaded from YAML:
//!
//! ```yaml
//! cases:
//!   - name: List Tools
//!     method: tools/list
//!     id: 1
//!   - name: Initialized
//!     method: notifications/initialized
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::rpc::constants::{mcp, methods};
use crate::rpc::{ConfigError, JsonRpcRequest, RequestId};

/// One call in a suite. A case without `id` is sent as a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeCase {
    pub name: String,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub id: Option<RequestId>,
    /// Per-case deadline; the client default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ProbeCase {
    pub fn new(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            params: Map::new(),
            id: None,
            timeout_ms: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RequestId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    pub fn request(&self) -> JsonRpcRequest {
        JsonRpcRequest::new(self.method.clone(), self.params.clone(), self.id.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeSuite {
    pub cases: Vec<ProbeCase>,
}

impl ProbeSuite {
    /// Handshake, the three list calls, then the `initialized` notification.
    pub fn standard() -> Self {
        let init_params = json!({
            "protocolVersion": mcp::PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": mcp::CLIENT_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }
        });

        Self {
            cases: vec![
                ProbeCase::new("Initialize", methods::INITIALIZE)
                    .with_params(as_params(init_params))
                    .with_id(1),
                ProbeCase::new("List Tools", methods::TOOLS_LIST).with_id(2),
                ProbeCase::new("List Resources", methods::RESOURCES_LIST).with_id(3),
                ProbeCase::new("List Prompts", methods::PROMPTS_LIST).with_id(4),
                ProbeCase::new("Notifications/Initialized", methods::NOTIFICATION_INITIALIZED),
            ],
        }
    }

    /// Appends a `tools/call` case numbered after the highest numeric id in the suite.
    pub fn with_tool_call(mut self, tool: &str, arguments: Value) -> Self {
        let next_id = self
            .cases
            .iter()
            .filter_map(|c| c.id.as_ref().and_then(RequestId::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        let params = as_params(json!({ "name": tool, "arguments": arguments }));
        self.cases.push(
            ProbeCase::new(format!("Call Tool {}", tool), methods::TOOLS_CALL)
                .with_params(params)
                .with_id(next_id),
        );
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(yaml)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SuiteRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::SuiteParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Parses `--tool-args`. Tool arguments must be a JSON object.
pub fn parse_tool_arguments(raw: &str) -> Result<Value, ConfigError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ConfigError::ToolArgs(e.to_string()))?;
    if !value.is_object() {
        return Err(ConfigError::ToolArgs(format!(
            "expected a JSON object, got {}",
            value
        )));
    }
    Ok(value)
}

fn as_params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
