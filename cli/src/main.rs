//! `restreq`: send an HTTP request from the command line.
//!
//! ```text
//! restreq POST http://localhost:3000/echo name=alice admin:=true age:=42 -H 'X-Token: abc'
//! ```
//!
//! Trailing items are JSON body fields: `key=value` for strings and
//! `key:=value` for booleans, integers and floats. Items that do not parse
//! are skipped.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use restreq_core::{Cookie, DebugFlags, HttpMethod, HttpResponse, Request, UreqTransport};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "restreq", version, about = "Send an HTTP request with JSON fields built from key=value items")]
struct Cli {
    /// HTTP method: GET, POST, PUT, PATCH or DELETE
    #[arg(value_parser = parse_method)]
    method: HttpMethod,

    /// Absolute target URL
    url: String,

    /// Body fields: `key=value` (string) or `key:=value` (bool, integer, float)
    items: Vec<String>,

    /// Request header as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Cookie as name=value (repeatable)
    #[arg(short = 'b', long = "cookie", value_parser = parse_cookie)]
    cookies: Vec<Cookie>,

    /// Basic auth credentials as user:pass
    #[arg(short, long, value_parser = parse_auth)]
    auth: Option<(String, String)>,

    /// Total timeout in seconds; 0 means no limit
    #[arg(long, env = "RESTREQ_TIMEOUT")]
    timeout: Option<u64>,

    #[arg(long, env = "RESTREQ_USER_AGENT", default_value = concat!("restreq/", env!("CARGO_PKG_VERSION")))]
    user_agent: String,

    /// Send Content-Type: application/json even without body items
    #[arg(long)]
    json: bool,

    /// Exit with an error on non-2xx responses
    #[arg(long)]
    check_status: bool,

    /// Print the status line and response headers before the body
    #[arg(short, long)]
    include: bool,

    /// Log request and response details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let request = build_request(&cli);
    tracing::debug!(method = %cli.method, url = %cli.url, fields = request.json().len(), "sending request");
    let response = request
        .send(cli.method, &UreqTransport::new())
        .with_context(|| format!("{} {}", cli.method, cli.url))?;

    tracing::debug!(status = response.status, bytes = response.body.len(), "received response");
    print!("{}", render(&response, cli.include));

    if cli.check_status {
        response.error_for_status()?;
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "restreq=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_request(cli: &Cli) -> Request {
    let mut request = Request::new(cli.url.as_str())
        .user_agent(cli.user_agent.as_str())
        .json_tokens(&cli.items);

    if cli.json || !request.json().is_empty() {
        request = request.content_type_json();
    }
    for (name, value) in &cli.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    for cookie in &cli.cookies {
        request = request.cookie(cookie.clone());
    }
    if let Some((user, pass)) = &cli.auth {
        request = request.basic_auth(user.as_str(), pass.as_str());
    }
    if let Some(secs) = cli.timeout {
        request = request.timeout(Duration::from_secs(secs));
    }
    if cli.verbose {
        request = request.debug(DebugFlags::ALL);
    }
    request
}

/// Response as printed to stdout. JSON bodies are pretty-printed.
fn render(response: &HttpResponse, include: bool) -> String {
    let mut out = String::new();
    if include {
        out.push_str(&format!("HTTP {}\n", response.status));
        for (k, v) in &response.headers {
            out.push_str(&format!("{k}: {v}\n"));
        }
        out.push('\n');
    }

    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(json) => {
            out.push_str(&serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.text()));
        }
        _ => out.push_str(&response.text()),
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    HttpMethod::parse(s).ok_or_else(|| format!("unsupported method {s:?}"))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_cookie(s: &str) -> Result<Cookie, String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok(Cookie::new(name, value)),
        _ => Err(format!("expected name=value, got {s:?}")),
    }
}

fn parse_auth(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(u, p)| (u.to_string(), p.to_string()))
        .ok_or_else(|| format!("expected user:pass, got {s:?}"))
}
