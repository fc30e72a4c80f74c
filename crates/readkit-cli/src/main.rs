//! Readkit CLI - Read a web page as bounded plain text
//!
//! Usage:
//!   readkit example.com                    # Print page text
//!   readkit --json https://example.com/a   # Print the result as JSON
//!   RUST_LOG=readkit=debug readkit example.com
//!
//! Exit codes: 0 on success, 2 when the input is rejected locally,
//! 1 when the fetch itself fails.

use anyhow::{Context, Result};
use clap::Parser;
use readkit::{Error, ErrorKind, FetchConfig, LogConfig, Reader};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Readkit - Guarded URL-to-text reader
#[derive(Parser, Debug)]
#[command(name = "readkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL or bare domain to read
    url: String,

    /// Extraction service base URL
    #[arg(long, env = "READKIT_ENDPOINT", default_value = readkit::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Total request timeout in seconds
    #[arg(long, env = "READKIT_TIMEOUT_SECS", default_value_t = readkit::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Maximum upstream body size in bytes
    #[arg(long, env = "READKIT_MAX_BYTES", default_value_t = readkit::DEFAULT_MAX_CONTENT_LENGTH)]
    max_bytes: u64,

    /// Maximum returned text length in characters
    #[arg(long, env = "READKIT_MAX_CHARS", default_value_t = readkit::DEFAULT_MAX_CONTENT_CHARS)]
    max_chars: usize,

    /// Print the result (or error) as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new()
            .endpoint(self.endpoint.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_content_length(self.max_bytes)
            .max_content_chars(self.max_chars)
    }

    /// Endpoint as it may appear in logs: no userinfo, query or fragment.
    fn redacted_endpoint(&self) -> String {
        LogConfig::new().redact_url(&self.endpoint).into_owned()
    }
}

#[derive(Serialize)]
struct ErrorReport {
    kind: ErrorKind,
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let reader = Reader::builder()
        .config(args.fetch_config())
        .build()
        .context("Failed to configure reader")?;

    tracing::debug!(
        endpoint = %args.redacted_endpoint(),
        timeout_secs = args.timeout_secs,
        json = args.json,
        "reading url"
    );

    match reader.read_url_text(&args.url).await {
        Ok(page) => {
            let mut stdout = std::io::stdout().lock();
            if args.json {
                serde_json::to_writer_pretty(&mut stdout, &page)
                    .context("Failed to write JSON")?;
                writeln!(stdout)?;
            } else {
                writeln!(stdout, "{}", page.content).context("Failed to write output")?;
            }
            Ok(())
        }
        Err(err) => {
            report(&err, args.json)?;
            std::process::exit(exit_code(&err));
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &Error, json: bool) -> Result<()> {
    if json {
        let report = ErrorReport {
            kind: err.kind(),
            message: err.to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("readkit: {err}");
    }
    Ok(())
}

fn exit_code(err: &Error) -> i32 {
    if err.is_local() { 2 } else { 1 }
}
