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

//! mcp-probe Constants - Single source of truth for protocol and configuration values.

/// JSON-RPC 2.0 wire constants
pub mod jsonrpc {
    /// Value of the `jsonrpc` member on every request
    pub const VERSION: &str = "2.0";
    /// Parse error (standard JSON-RPC)
    pub const ERROR_PARSE: i64 = -32700;
    /// Invalid request (standard JSON-RPC)
    pub const ERROR_INVALID_REQUEST: i64 = -32600;
    /// Method not found (standard JSON-RPC)
    pub const ERROR_METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid params (standard JSON-RPC)
    pub const ERROR_INVALID_PARAMS: i64 = -32602;
    /// Internal error (standard JSON-RPC)
    pub const ERROR_INTERNAL: i64 = -32603;
}

/// HTTP transport defaults
pub mod transport {
    /// Reference MCP endpoint
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/mcp";
    /// Per-call deadline when the caller does not supply one
    pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_ENDPOINT: &str = "MCP_PROBE_URL";
    pub const ENV_TIMEOUT_MS: &str = "MCP_PROBE_TIMEOUT_MS";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
}

/// MCP Protocol Methods
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const PROMPTS_LIST: &str = "prompts/list";
    pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
}

/// MCP handshake values sent by the standard probe suite
pub mod mcp {
    pub const PROTOCOL_VERSION: &str = "2024-11-05";
    pub const CLIENT_NAME: &str = "mcp-probe";
}
