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

// Main entry point for the mcp-probe CLI
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use mcp_probe::config::{Config, LogFormat};
use mcp_probe::mcp::HttpRpcClient;
use mcp_probe::probe::suite::parse_tool_arguments;
use mcp_probe::probe::{ProbeRunner, ProbeSuite, ReportFormat, Reporter};

#[derive(Parser, Debug)]
#[command(name = "mcp-probe", version, about = "mcp-probe: send JSON-RPC probes to an MCP server over HTTP", long_about = None)]
struct Cli {
    /// MCP endpoint URL (overrides MCP_PROBE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Per-call deadline in milliseconds (overrides MCP_PROBE_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// YAML suite to run instead of the standard MCP sequence
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Append a tools/call probe for this tool
    #[arg(long)]
    tool: Option<String>,

    /// JSON object passed as the tool's arguments
    #[arg(long, requires = "tool")]
    tool_args: Option<String>,

    /// GET the endpoint root before running the suite
    #[arg(long)]
    health: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config from env, using defaults: {}", e);
        Config::default()
    });

    init_tracing(&config);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every probe completed.
async fn run(cli: Cli, mut config: Config) -> Result<bool> {
    if let Some(url) = cli.url {
        config.endpoint = url;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }

    let endpoint = config.endpoint().context("Invalid endpoint")?;
    let client = HttpRpcClient::with_timeout(endpoint, config.timeout())?;

    let mut suite = match &cli.suite {
        Some(path) => ProbeSuite::from_yaml_file(path)?,
        None => ProbeSuite::standard(),
    };
    if let Some(tool) = &cli.tool {
        let arguments = match &cli.tool_args {
            Some(raw) => parse_tool_arguments(raw)?,
            None => serde_json::json!({}),
        };
        suite = suite.with_tool_call(tool, arguments);
    }

    info!(
        endpoint = %client.endpoint(),
        cases = suite.len(),
        timeout_ms = config.timeout_ms,
        "Starting probe run"
    );

    let stdout = std::io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), cli.format);

    if cli.health {
        let result = client.check_health(None).await;
        reporter.health(client.endpoint().base_url().as_str(), &result)?;
    }

    let runner = ProbeRunner::new(&client);
    let mut write_result = Ok(());
    let summary = runner
        .run(&suite, |outcome| {
            if write_result.is_ok() {
                write_result = reporter.outcome(outcome);
            }
        })
        .await;
    write_result.context("Failed to write report")?;

    reporter.summary(&summary)?;
    reporter.into_inner().flush()?;

    Ok(summary.all_succeeded())
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("mcp_probe=warn"));

    // stdout carries the report; logs go to stderr.
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        _ => subscriber.init(),
    }
}
