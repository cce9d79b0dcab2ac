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

//! Sequential probe runner.
//!
//! Cases run one at a time. Each case is isolated: its failure is recorded
//! in its outcome and the next case still runs.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::mcp::RpcTransport;
use crate::probe::suite::{ProbeCase, ProbeSuite};
use crate::rpc::{ClientError, JsonRpcError, JsonRpcRequest, Reply, Response};

/// Result of running one case.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub name: String,
    pub request: JsonRpcRequest,
    pub elapsed: Duration,
    pub result: Result<Reply, ClientError>,
}

impl ProbeOutcome {
    /// True when the exchange completed. A JSON-RPC error body still counts.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The error object, if the server answered with one.
    pub fn rpc_error(&self) -> Option<JsonRpcError> {
        let body = self.result.as_ref().ok()?.body()?;
        match Response::classify(body)? {
            Response::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ProbeSummary {
    pub outcomes: Vec<ProbeOutcome>,
}

impl ProbeSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn rpc_errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.rpc_error().is_some()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

pub struct ProbeRunner<'a, T: RpcTransport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: RpcTransport + ?Sized> ProbeRunner<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub async fn run_case(&self, case: &ProbeCase) -> ProbeOutcome {
        let request = case.request();
        let timeout = case
            .timeout()
            .unwrap_or_else(|| self.transport.default_timeout());

        let start = Instant::now();
        let result = self.transport.send_request(&request, timeout).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => info!(
                case = %case.name,
                method = %request.method,
                elapsed_ms = elapsed.as_millis() as u64,
                "Probe case completed"
            ),
            Err(e) => warn!(
                case = %case.name,
                method = %request.method,
                kind = e.kind(),
                error = %e,
                "Probe case failed"
            ),
        }

        ProbeOutcome {
            name: case.name.clone(),
            request,
            elapsed,
            result,
        }
    }

    /// Runs every case in order, handing each outcome to `on_outcome` as soon
    /// as it is available.
    pub async fn run<F>(&self, suite: &ProbeSuite, mut on_outcome: F) -> ProbeSummary
    where
        F: FnMut(&ProbeOutcome),
    {
        let mut summary = ProbeSummary::default();
        for case in &suite.cases {
            let outcome = self.run_case(case).await;
            on_outcome(&outcome);
            summary.outcomes.push(outcome);
        }

        info!(
            total = summary.outcomes.len(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Probe suite finished"
        );
        summary
    }
}
