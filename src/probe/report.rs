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

//! Console report for probe outcomes.
//!
//! Text output is for people; JSON output emits one object per line.

use std::io::{self, Write};

use clap::ValueEnum;
use serde_json::{json, Value};

use crate::probe::runner::{ProbeOutcome, ProbeSummary};
use crate::rpc::{ClientError, Correlation, Reply};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

pub struct Reporter<W: Write> {
    out: W,
    format: ReportFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn health(&mut self, url: &str, result: &Result<u16, ClientError>) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => match result {
                Ok(status) => writeln!(self.out, "Health {}: HTTP {}\n", url, status),
                Err(e) => writeln!(self.out, "Health {}: FAILED [{}] {}\n", url, e.kind(), e),
            },
            ReportFormat::Json => {
                let line = match result {
                    Ok(status) => json!({"health": url, "status": "ok", "http_status": status}),
                    Err(e) => json!({"health": url, "status": "error", "error": error_json(e)}),
                };
                writeln!(self.out, "{}", line)
            }
        }
    }

    pub fn outcome(&mut self, outcome: &ProbeOutcome) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => self.outcome_text(outcome),
            ReportFormat::Json => writeln!(self.out, "{}", outcome_json(outcome)),
        }
    }

    fn outcome_text(&mut self, outcome: &ProbeOutcome) -> io::Result<()> {
        let elapsed_ms = outcome.elapsed.as_millis();
        let request = serde_json::to_string(&outcome.request).unwrap_or_default();

        writeln!(self.out, ">> {}", outcome.name)?;
        writeln!(self.out, "   Request: {}", request)?;

        match &outcome.result {
            Ok(Reply::Response { body, correlation }) => {
                let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                writeln!(self.out, "<< Response ({}ms):", elapsed_ms)?;
                for line in pretty.lines() {
                    writeln!(self.out, "   {}", line)?;
                }
                match correlation {
                    Correlation::Matched => {}
                    Correlation::Mismatched { expected, received } => writeln!(
                        self.out,
                        "   Note: response id {} does not match request id {}",
                        received, expected
                    )?,
                    Correlation::Missing => {
                        writeln!(self.out, "   Note: response carries no id")?
                    }
                }
                if let Some(error) = outcome.rpc_error() {
                    writeln!(
                        self.out,
                        "   JSON-RPC error {} ({}): {}",
                        error.code,
                        error.code_name(),
                        error.message
                    )?;
                }
                writeln!(self.out, "   OK\n")
            }
            Ok(Reply::Acknowledged { status }) => {
                writeln!(self.out, "<< Acknowledged ({}ms): HTTP {}", elapsed_ms, status)?;
                writeln!(self.out, "   OK\n")
            }
            Err(e) => writeln!(
                self.out,
                "<< Error ({}ms) [{}]: {}\n",
                elapsed_ms,
                e.kind(),
                e
            ),
        }
    }

    pub fn summary(&mut self, summary: &ProbeSummary) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(
                self.out,
                "{} cases: {} ok, {} failed, {} JSON-RPC errors",
                summary.outcomes.len(),
                summary.succeeded(),
                summary.failed(),
                summary.rpc_errors()
            ),
            ReportFormat::Json => writeln!(
                self.out,
                "{}",
                json!({
                    "summary": {
                        "total": summary.outcomes.len(),
                        "succeeded": summary.succeeded(),
                        "failed": summary.failed(),
                        "rpc_errors": summary.rpc_errors(),
                    }
                })
            ),
        }
    }
}

fn error_json(e: &ClientError) -> Value {
    json!({ "kind": e.kind(), "message": e.to_string() })
}

fn outcome_json(outcome: &ProbeOutcome) -> Value {
    let mut line = json!({
        "name": outcome.name,
        "method": outcome.request.method,
        "request": outcome.request,
        "elapsed_ms": outcome.elapsed.as_millis() as u64,
    });

    let fields = match &outcome.result {
        Ok(Reply::Response { body, correlation }) => json!({
            "status": "ok",
            "response": body,
            "correlation": match correlation {
                Correlation::Matched => "matched",
                Correlation::Mismatched { .. } => "mismatched",
                Correlation::Missing => "missing",
            },
        }),
        Ok(Reply::Acknowledged { status, .. }) => json!({
            "status": "ok",
            "acknowledged": { "http_status": status },
        }),
        Err(e) => json!({ "status": "error", "error": error_json(e) }),
    };

    if let (Value::Object(line), Value::Object(fields)) = (&mut line, fields) {
        line.extend(fields);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{JsonRpcRequest, RequestId};
    use serde_json::Map;
    use std::time::Duration;

    fn outcome(result: Result<Reply, ClientError>, id: Option<RequestId>) -> ProbeOutcome {
        ProbeOutcome {
            name: "List Tools".to_string(),
            request: JsonRpcRequest::new("tools/list", Map::new(), id),
            elapsed: Duration::from_millis(12),
            result,
        }
    }

    fn render(format: ReportFormat, outcome: &ProbeOutcome) -> String {
        let mut reporter = Reporter::new(Vec::new(), format);
        reporter.outcome(outcome).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_text_response() {
        let o = outcome(
            Ok(Reply::Response {
                body: json!({"jsonrpc": "2.0", "id": 2, "result": {"tools": []}}),
                correlation: Correlation::Matched,
            }),
            Some(RequestId::from(2)),
        );
        let text = render(ReportFormat::Text, &o);
        assert!(text.contains(">> List Tools"));
        assert!(text.contains(r#"Request: {"jsonrpc":"2.0","method":"tools/list","id":2}"#));
        assert!(text.contains("<< Response (12ms):"));
        assert!(text.contains("\"tools\": []"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn test_text_mismatch_note() {
        let o = outcome(
            Ok(Reply::Response {
                body: json!({"id": 9, "result": {}}),
                correlation: Correlation::Mismatched {
                    expected: RequestId::from(2),
                    received: json!(9),
                },
            }),
            Some(RequestId::from(2)),
        );
        let text = render(ReportFormat::Text, &o);
        assert!(text.contains("response id 9 does not match request id 2"));
    }

    #[test]
    fn test_text_error_keeps_raw_body() {
        let o = outcome(
            Err(ClientError::MalformedResponse {
                method: "tools/list".to_string(),
                status: 200,
                body: "not-json".to_string(),
            }),
            Some(RequestId::from(2)),
        );
        let text = render(ReportFormat::Text, &o);
        assert!(text.contains("[malformed_response]"));
        assert!(text.contains("not-json"));
    }

    #[test]
    fn test_json_lines() {
        let o = outcome(
            Ok(Reply::Acknowledged { status: 202 }),
            None,
        );
        let line: Value = serde_json::from_str(render(ReportFormat::Json, &o).trim()).unwrap();
        assert_eq!(line["status"], "ok");
        assert_eq!(line["acknowledged"]["http_status"], 202);
        assert_eq!(line["request"], json!({"jsonrpc": "2.0", "method": "tools/list"}));

        let o = outcome(
            Err(ClientError::Timeout {
                method: "tools/list".to_string(),
                after: Duration::from_millis(50),
            }),
            Some(RequestId::from(2)),
        );
        let line: Value = serde_json::from_str(render(ReportFormat::Json, &o).trim()).unwrap();
        assert_eq!(line["status"], "error");
        assert_eq!(line["error"]["kind"], "timeout");
    }

    #[test]
    fn test_summary_line() {
        let summary = ProbeSummary {
            outcomes: vec![outcome(
                Err(ClientError::Timeout {
                    method: "tools/list".to_string(),
                    after: Duration::from_millis(50),
                }),
                Some(RequestId::from(2)),
            )],
        };
        let mut reporter = Reporter::new(Vec::new(), ReportFormat::Text);
        reporter.summary(&summary).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text.trim(), "1 cases: 0 ok, 1 failed, 0 JSON-RPC errors");
    }
}
