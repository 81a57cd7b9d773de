//! stockwatch CLI
//!
//! Command-line interface for sales reporting and inventory alerts.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stockwatch::alerting::{
    AlertEvaluator, AlertOrchestrator, DeliveryChannel, EmailChannel, WhatsAppChannel,
};
use stockwatch::analysis::monthly_revenue;
use stockwatch::chart::render_monthly_chart;
use stockwatch::config::LoggingConfig;
use stockwatch::models::{MonthlyRevenue, RunSummary};
use stockwatch::source::load_transactions;
use stockwatch::Config;

/// stockwatch - Retail inventory analysis and alerting
#[derive(Parser)]
#[command(name = "stockwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "STOCKWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum ChannelKind {
    #[default]
    Email,
    Whatsapp,
}

#[derive(Subcommand)]
enum Commands {
    /// Chart monthly sales, then run inventory alerts over email
    Report {
        /// Transactions CSV
        #[arg(long)]
        transactions: Option<PathBuf>,

        /// Inventory CSV used for alerts
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Directory for the chart
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Chart file name
        #[arg(long)]
        chart_name: Option<String>,
    },

    /// Run the inventory alert pipeline once
    Alerts {
        /// Inventory CSV
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Delivery channel
        #[arg(long, value_enum, default_value = "email")]
        channel: ChannelKind,
    },

    /// Send a test email through the configured SMTP server
    TestAlert,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    monthly_revenue: &'a MonthlyRevenue,
    chart: Option<PathBuf>,
    alerts: Option<RunSummary>,
}

/// Load `.env` through `load_env`, then parse `args`. The environment is
/// populated first so `env` fallbacks such as `STOCKWATCH_CONFIG` see it.
fn parse_args<I, T>(load_env: impl FnOnce(), args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    load_env();
    Cli::parse_from(args)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = parse_args(
        || {
            dotenvy::dotenv().ok();
        },
        std::env::args_os(),
    );

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, &config.logging);

    // Execute command
    let result = match cli.command {
        Commands::Report {
            transactions,
            inventory,
            output_dir,
            chart_name,
        } => {
            let mut config = config;
            if let Some(path) = transactions {
                config.report.transactions_path = path;
            }
            if let Some(path) = inventory {
                config.report.inventory_path = path;
            }
            if let Some(dir) = output_dir {
                config.report.output_dir = dir;
            }
            if let Some(name) = chart_name {
                config.report.chart_name = name;
            }
            run_report(config, cli.format).await
        }
        Commands::Alerts { inventory, channel } => {
            let path = inventory.unwrap_or_else(|| config.report.inventory_path.clone());
            run_alerts(config, path, channel, cli.format).await
        }
        Commands::TestAlert => run_test_alert(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let log_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_channel(
    config: &Config,
    kind: ChannelKind,
) -> anyhow::Result<(Box<dyn DeliveryChannel>, Vec<String>)> {
    let channel: Box<dyn DeliveryChannel> = match kind {
        ChannelKind::Email => Box::new(EmailChannel::new(config.smtp.clone())),
        ChannelKind::Whatsapp => Box::new(WhatsAppChannel::new(config.whatsapp.clone())?),
    };
    let recipients = match kind {
        ChannelKind::Email => config.recipients.emails.clone(),
        ChannelKind::Whatsapp => config.recipients.whatsapp.clone(),
    };
    Ok((channel, recipients))
}

async fn run_report(config: Config, format: OutputFormat) -> anyhow::Result<()> {
    let report = &config.report;
    info!(path = %report.transactions_path.display(), "Loading transactions");

    let transactions = match load_transactions(&report.transactions_path) {
        Ok(transactions) => transactions,
        Err(e) => {
            error!(path = %report.transactions_path.display(), error = %e, "Failed to load transactions");
            Vec::new()
        }
    };

    let series = monthly_revenue(&transactions);
    let chart = render_monthly_chart(&series, &report.output_dir, &report.chart_name)?;

    let alerts = if config.recipients.emails.is_empty() {
        info!("No alert recipients configured (ALERT_EMAILS)");
        None
    } else {
        let (channel, recipients) = build_channel(&config, ChannelKind::Email)?;
        let orchestrator =
            AlertOrchestrator::new(AlertEvaluator::new(config.alerting), channel);
        let summary = orchestrator.run(&report.inventory_path, &recipients).await;
        info!(?summary, "Alert results");
        Some(summary)
    };

    match format {
        OutputFormat::Json => {
            let output = ReportOutput {
                monthly_revenue: &series,
                chart,
                alerts,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("Monthly sales performance:");
            if series.is_empty() {
                println!("  (no sales data)");
            }
            for (month, revenue) in &series {
                println!("  {month}  {revenue:>12.2}");
            }
            if let Some(path) = chart {
                println!("Chart: {}", path.display());
            }
            if let Some(summary) = alerts {
                print_summary(&summary);
            }
        }
    }

    Ok(())
}

async fn run_alerts(
    config: Config,
    inventory: PathBuf,
    kind: ChannelKind,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (channel, recipients) = build_channel(&config, kind)?;
    let orchestrator = AlertOrchestrator::new(AlertEvaluator::new(config.alerting), channel);

    let summary = orchestrator.run(&inventory, &recipients).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(&summary),
    }
    Ok(())
}

async fn run_test_alert(config: Config) -> anyhow::Result<()> {
    let recipients = if config.recipients.emails.is_empty() {
        vec!["test@stockwatch.local".to_string()]
    } else {
        config.recipients.emails.clone()
    };

    let channel = EmailChannel::new(config.smtp);
    let sent = channel.send("Test Alert", "Test body", &recipients).await;

    println!("Sent? {sent}");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Inventory alerts:");
    println!("  Close to expiration: {}", summary.expiration_matches);
    println!("  Idle too long:       {}", summary.idle_matches);
    println!("  Delivered:           {}", summary.delivered);
}
