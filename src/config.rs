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

use crate::mcp::Endpoint;
use crate::rpc::constants::{config, transport};
use crate::rpc::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse_safe(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_ms = match env::var(config::ENV_TIMEOUT_MS) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: config::ENV_TIMEOUT_MS,
                    value: raw,
                })?,
            Err(_) => defaults.timeout_ms,
        };

        Ok(Self {
            endpoint: env::var(config::ENV_ENDPOINT).unwrap_or(defaults.endpoint),
            timeout_ms,
            log_level: env::var(config::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: env::var(config::ENV_LOG_FORMAT)
                .map(|s| LogFormat::parse_safe(&s))
                .unwrap_or(defaults.log_format),
        })
    }

    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        Endpoint::parse(&self.endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: transport::DEFAULT_ENDPOINT.to_string(),
            timeout_ms: transport::DEFAULT_TIMEOUT_MS,
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
        }
    }
}
