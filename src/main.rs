use analytics::{AnalyticsEngine, DashboardReport};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, LoggingSettings};
use core_types::RfmDimension;
use dataset::Dataset;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use web_server::AppState;

/// The main entry point for the Storefront dashboard application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = init_tracing(&config.logging)?;

    let dataset = Dataset::load(&config.data).context("Failed to load the order tables")?;
    let engine = AnalyticsEngine::new(config.dashboard.clone());

    match cli.command {
        Commands::Report(args) => handle_report(args, &config, &dataset, &engine),
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or(config.server.bind_addr);
            tracing::info!(%addr, "Starting dashboard API.");
            let state = AppState {
                dataset: Arc::new(dataset),
                engine,
            };
            web_server::run_server(addr, state).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Customer and sales analytics over an e-commerce order export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML configuration file. A missing file means all defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the dashboard for one date window and print it.
    Report(ReportArgs),
    /// Serve the dashboard as a JSON API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// First day of the window (format: YYYY-MM-DD). Defaults to the first purchase day.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the window, inclusive (format: YYYY-MM-DD). Defaults to the last purchase day.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on. Overrides `server.bind_addr`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Console logging filtered by `RUST_LOG` (falling back to the configured level),
/// plus a daily-rolling log file when a directory is configured.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level `{}`", settings.level))?;

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "storefront.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(
    args: ReportArgs,
    config: &Config,
    dataset: &Dataset,
    engine: &AnalyticsEngine,
) -> anyhow::Result<()> {
    let range = dataset.resolve_range(args.from, args.to)?;
    tracing::debug!(start = %range.start(), end = %range.end(), "Report window resolved.");
    let report = engine.calculate(dataset.all_orders(), dataset.raw_orders(), range)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.dashboard.top_cities);
    }
    Ok(())
}

fn print_report(report: &DashboardReport, top_cities: usize) {
    println!(
        "Orders from {} to {} ({} rows)\n",
        report.range.start(),
        report.range.end(),
        report.filtered_rows
    );

    let mut categories = Table::new();
    categories.set_header(vec!["Product Category", "Number of Sales"]);
    for entry in &report.top_categories {
        categories.add_row(vec![entry.category.clone(), entry.count.to_string()]);
    }
    println!("Top {} product categories\n{categories}\n", report.top_categories.len());

    let mut cities = Table::new();
    cities.set_header(vec!["City", "Customers"]);
    for entry in report.top_cities(top_cities) {
        cities.add_row(vec![entry.city.clone(), entry.customer_count.to_string()]);
    }
    println!("Top {top_cities} cities by customers\n{cities}\n");

    let mut yearly = Table::new();
    yearly.set_header(vec!["Year", "Orders"]);
    for entry in &report.yearly_sales {
        yearly.add_row(vec![entry.year.to_string(), entry.order_count.to_string()]);
    }
    println!("Sales per year\n{yearly}\n");

    let undefined = || "-".to_string();
    let summary = &report.rfm_summary;
    let mut averages = Table::new();
    averages.set_header(vec!["Average Recency (days)", "Average Frequency", "Average Monetary"]);
    averages.add_row(vec![
        summary.average_recency.map_or_else(undefined, |v| v.to_string()),
        summary.average_frequency.map_or_else(undefined, |v| v.to_string()),
        summary.average_monetary.map_or_else(undefined, |v| v.to_string()),
    ]);
    println!("RFM analysis ({} customers)\n{averages}\n", report.rfm.len());

    for dimension in RfmDimension::ALL {
        let mut best = Table::new();
        best.set_header(vec!["Customer", "Recency", "Frequency", "Monetary"]);
        for record in report.best_customers_by(dimension) {
            best.add_row(vec![
                record.customer_unique_id.clone(),
                record.recency.to_string(),
                record.frequency.to_string(),
                record.monetary.to_string(),
            ]);
        }
        println!("{}\n{best}\n", dimension.label());
    }
}
