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

//! JSON-RPC 2.0 transport seam.
//!
//! The probe runner talks to a server through `RpcTransport`. The HTTP
//! client in `mcp::client` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::rpc::{ClientError, JsonRpcRequest, Reply};

#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Performs exactly one exchange for `request`, bounded by `timeout`.
    ///
    /// A request with an `id` resolves to `Reply::Response`; a notification
    /// resolves to `Reply::Acknowledged` without any response decoding.
    async fn send_request(
        &self,
        request: &JsonRpcRequest,
        timeout: Duration,
    ) -> Result<Reply, ClientError>;

    /// Deadline applied when a caller does not pick one.
    fn default_timeout(&self) -> Duration;
}
