//! `smard` - download one SMARD series and print it as JSON lines or CSV

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use smard_market_data::transformations::to_local_time_point;
use smard_market_data::{ClientConfig, Record, Series, SmardClient, TimePoint};

/// Accepted `--from` / `--to` format (local time)
const CLI_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "smard", version, about = "Download German electricity market data from SMARD")]
struct Cli {
    /// Series to download: production, production-forecast or consumption
    series: Series,

    /// Start of the range, local time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_local_time)]
    from: TimePoint,

    /// End of the range, local time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_local_time)]
    to: TimePoint,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Override the download endpoint (default: SMARD_ENDPOINT or the public endpoint)
    #[arg(long)]
    endpoint: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn parse_local_time(value: &str) -> std::result::Result<TimePoint, String> {
    let naive = NaiveDateTime::parse_from_str(value, CLI_TIME_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM, got '{}': {}", value, e))?;
    to_local_time_point(naive).ok_or_else(|| format!("'{}' does not exist in local time", value))
}

fn write_records<W: Write>(mut out: W, records: &[Record], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for record in records {
                serde_json::to_writer(&mut out, record)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid SMARD_* environment")?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            return Err(anyhow!("--timeout must be at least 1 second"));
        }
        config.timeout_secs = timeout;
    }

    let client = SmardClient::with_config(&config)?;
    let records = client
        .get_series(cli.series, cli.from, cli.to)
        .with_context(|| format!("failed to download {} data", cli.series))?;

    info!(series = %cli.series, records = records.len(), "writing output");
    write_records(io::stdout().lock(), &records, cli.format)
}
