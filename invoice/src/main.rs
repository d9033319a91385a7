//! `invoice` - render a YAML billing file to a PDF invoice.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use invoice::{bill, parse_billing_date, BillingConfig};

#[derive(Parser, Debug)]
#[command(name = "invoice", version, about = "Generate a PDF invoice from a YAML billing file")]
struct Cli {
    /// Billing file to render.
    #[arg(env = "INVOICE_CONFIG", default_value = "billing.yaml")]
    config: PathBuf,

    /// Billing date: YYYY-MM-DD, YYYY-MM, YYYY/MM/DD or RFC 3339.
    /// Defaults to today.
    #[arg(short, long, env = "INVOICE_DATE", value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Directory the PDF is written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the parsed configuration before rendering.
    #[arg(long)]
    print_config: bool,
}

fn parse_date_arg(input: &str) -> std::result::Result<NaiveDate, String> {
    parse_billing_date(input).map_err(|e| e.to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let billing_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let config = BillingConfig::load(&cli.config, billing_date)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
    }

    let path = bill::write_invoice(&config, &cli.output_dir, Utc::now())
        .context("rendering invoice")?;
    println!("{}", path.display());
    Ok(())
}
