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

//! mcp-probe: a JSON-RPC 2.0 over HTTP probe for MCP servers.
//!
//! The library sends single, deadline-bounded JSON-RPC calls and
//! notifications to an endpoint and hands back the decoded response or a
//! typed failure. The `probe` module runs ordered suites of such calls and
//! reports each outcome independently.

pub mod config;
pub mod mcp;
pub mod probe;
pub mod rpc;

pub use mcp::{Endpoint, HttpRpcClient, RpcTransport};
pub use rpc::{ClientError, ConfigError, JsonRpcRequest, Reply, RequestId};
