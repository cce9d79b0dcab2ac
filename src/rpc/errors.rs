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

// Error types for the probe client. Every variant names the method it belongs to.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single JSON-RPC exchange. All variants are terminal for the call.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// Connection-level failure (refused, reset, DNS)
    #[error("{method}: transport error: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// No complete response within the deadline
    #[error("{method}: request timed out after {}ms", after.as_millis())]
    Timeout { method: String, after: Duration },

    /// Response body is not valid JSON; the raw text is kept for diagnosis
    #[error("{method}: invalid JSON response (HTTP {status}): {body}")]
    MalformedResponse {
        method: String,
        status: u16,
        body: String,
    },

    /// Request payload could not be serialized. Requests built from JSON
    /// values always serialize, so this is not expected in practice.
    #[error("{method}: failed to encode request: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Stable short label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "transport",
            ClientError::Timeout { .. } => "timeout",
            ClientError::MalformedResponse { .. } => "malformed_response",
            ClientError::Encode { .. } => "encode",
        }
    }

    pub fn method(&self) -> &str {
        match self {
            ClientError::Transport { method, .. }
            | ClientError::Timeout { method, .. }
            | ClientError::MalformedResponse { method, .. }
            | ClientError::Encode { method, .. } => method,
        }
    }
}

/// Setup errors: raised before any call is issued.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Failed to read suite file {}: {source}", path.display())]
    SuiteRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid suite file {}: {source}", path.display())]
    SuiteParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid tool arguments: {0}")]
    ToolArgs(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
