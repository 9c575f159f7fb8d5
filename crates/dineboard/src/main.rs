//! dineboard - Restaurant analytics dashboard in the terminal

mod cli;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cli::{CustomerData, DeliveryData, OperationalData};
use dineboard_core::client::Endpoint;
use dineboard_core::models::{
    CancellationMetrics, CustomerMetrics, CustomerSegment, DeliveryOverview, DeliveryPlatform,
    DeliveryRegion, DeliveryTiming, HourlyLoad, Metrics, OperationalMetrics, PaymentMethod,
    RevenuePoint, TopCustomer,
};
use dineboard_core::views::ai_query::save_csv;
use dineboard_core::views::customers::{customer_urls, CustomerTab};
use dineboard_core::views::delivery::{delivery_tab_url, DeliveryTab};
use dineboard_core::views::operational::{operational_urls, OperationalTab};
use dineboard_core::views::revenue::{revenue_url, ChartKind, RevenueMode};
use dineboard_core::views::{kpi_panel, kpi_url};
use dineboard_core::{
    ApiClient, DashboardConfig, DashboardSession, ExportEvent, ExportFormat, ExportPipeline,
    FilterState, ProgressBus,
};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dineboard",
    version,
    about = "Restaurant analytics dashboard in the terminal",
    long_about = "Renders the panels of the restaurant analytics dashboard as terminal tables\n\
                  and writes full sales reports to disk.\n\
                  \n\
                  Examples:\n\
                    dineboard kpi --period 7                 # Headline metrics, last 7 days\n\
                    dineboard revenue --mode both --chart bar\n\
                    dineboard customers --tab payments\n\
                    dineboard delivery --tab regions --channel iFood\n\
                    dineboard operational --tab shifts\n\
                    dineboard ask \"revenue by store\" --csv\n\
                    dineboard export html --open           # Full report as HTML\n\
                  \n\
                  Environment Variables:\n\
                    DINEBOARD_API_URL                        # Analytics API base URL\n\
                    DINEBOARD_CONFIG                         # Config file path\n\
                    DINEBOARD_OUTPUT_DIR                     # Where exports are written\n\
                    DINEBOARD_NO_COLOR                       # Disable ANSI colors\n\
                    RUST_LOG                                 # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    filters: FilterArgs,

    /// Analytics API base URL (including the /api prefix)
    #[arg(long, global = true, env = "DINEBOARD_API_URL")]
    api_url: Option<String>,

    /// Config file (default: <config dir>/dineboard/config.toml)
    #[arg(long, global = true, env = "DINEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for export files
    #[arg(long, global = true, env = "DINEBOARD_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "DINEBOARD_NO_COLOR")]
    no_color: bool,

    /// Retry a failed panel request this many times
    #[arg(long, global = true, default_value = "0")]
    retries: u32,

    /// Debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Look-back period in days (7, 30, 90, ...)
    #[arg(long, global = true)]
    period: Option<String>,

    /// Custom range start (YYYY-MM-DD)
    #[arg(long, global = true)]
    start_date: Option<String>,

    /// Custom range end (YYYY-MM-DD)
    #[arg(long, global = true)]
    end_date: Option<String>,

    /// Sales channel name ("todos" for all)
    #[arg(long, global = true)]
    channel: Option<String>,

    /// Channel type: P (in-person) or D (delivery)
    #[arg(long, global = true)]
    channel_type: Option<String>,

    /// Store name ("todas" for all)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Sub-brand name
    #[arg(long, global = true)]
    sub_brand: Option<String>,
}

impl FilterArgs {
    fn into_state(self, default_period: &str) -> FilterState {
        FilterState {
            period: self.period.or_else(|| Some(default_period.to_string())),
            start_date: self.start_date,
            end_date: self.end_date,
            channel: self.channel,
            channel_type: self.channel_type,
            store: self.store,
            sub_brand: self.sub_brand,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Headline metrics with growth vs the previous period
    Kpi,
    /// Daily revenue timeline
    Revenue {
        /// Series to show: revenue, orders, both
        #[arg(long, default_value = "revenue")]
        mode: RevenueMode,
        /// Chart style: line, area, bar
        #[arg(long, default_value = "line")]
        chart: ChartKind,
    },
    /// Customer analytics
    Customers {
        /// Tab: overview, segmentation, top, payments
        #[arg(long, default_value = "overview")]
        tab: CustomerTab,
    },
    /// Delivery metrics (only the selected tab is fetched)
    Delivery {
        /// Tab: overview, regions, platforms, timing
        #[arg(long, default_value = "overview")]
        tab: DeliveryTab,
    },
    /// Operational efficiency
    Operational {
        /// Tab: overview, shifts, cancellations
        #[arg(long, default_value = "overview")]
        tab: OperationalTab,
    },
    /// Ask a question in plain language
    Ask {
        /// The question
        question: String,
        /// Also save the rows as CSV in the output directory
        #[arg(long)]
        csv: bool,
    },
    /// Export the full report
    Export {
        /// Format: csv, excel (detailed CSV), html (printable)
        format: ExportFormat,
        /// Open the file when done
        #[arg(long)]
        open: bool,
    },
    /// List the API endpoints used
    Endpoints,
}

/// Everything a command needs after flags and config are merged
struct App {
    session: DashboardSession,
    filters: FilterState,
    output_dir: PathBuf,
    json: bool,
    no_color: bool,
    retries: u32,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))
    };
    let filter = filter.context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<DashboardConfig> {
    let path = match path {
        Some(path) => path,
        None => match dirs::config_dir() {
            Some(dir) => DashboardConfig::default_path(&dir),
            None => return Ok(DashboardConfig::default()),
        },
    };
    debug!(path = %path.display(), "loading config");
    DashboardConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut config = load_config(cli.config)?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let session = DashboardSession::from_config(&config).context("Invalid API base URL")?;
    let ctx = App {
        session,
        filters: cli.filters.into_state(&config.default_period),
        output_dir: config.output_dir.clone(),
        json: cli.json,
        no_color: cli.no_color,
        retries: cli.retries,
    };

    match cli.command {
        Command::Kpi => run_kpi(&ctx).await,
        Command::Revenue { mode, chart } => run_revenue(&ctx, mode, chart).await,
        Command::Customers { tab } => run_customers(&ctx, tab).await,
        Command::Delivery { tab } => run_delivery(&ctx, tab).await,
        Command::Operational { tab } => run_operational(&ctx, tab).await,
        Command::Ask { question, csv } => run_ask(&ctx, &question, csv).await,
        Command::Export { format, open } => run_export(&ctx, format, open).await,
        Command::Endpoints => {
            println!(
                "{}",
                cli::format_endpoints(ctx.session.client().base_url(), ctx.no_color)
            );
            Ok(())
        }
    }
}

/// Load one slot, retrying on failure; None when `url` is None
///
/// A failing slot prints its error with a retry hint and fails the command.
async fn load_panel<T: DeserializeOwned + Default>(
    ctx: &App,
    name: &str,
    url: Option<String>,
) -> Result<Option<T>> {
    let slot = ctx.session.slot(name);
    let mut state = slot.refresh(url.as_deref(), &ctx.filters).await;

    let mut attempts = 0;
    while state.error.is_some() && attempts < ctx.retries {
        attempts += 1;
        info!(slot = name, attempt = attempts, "retrying panel request");
        state = slot.retry().await;
    }

    if let Some(error) = state.error {
        eprintln!("✗ {}: {}", name, error);
        eprintln!("  Retry with --retries 2, or check the API with: dineboard endpoints");
        bail!("failed to load '{}'", name);
    }

    if url.is_none() {
        return Ok(None);
    }
    Ok(Some(slot.typed::<T>().unwrap_or_default()))
}

async fn load_required<T: DeserializeOwned + Default>(
    ctx: &App,
    name: &str,
    url: String,
) -> Result<T> {
    Ok(load_panel(ctx, name, Some(url)).await?.unwrap_or_default())
}

async fn run_kpi(ctx: &App) -> Result<()> {
    let url = kpi_url(ctx.session.client(), &ctx.filters);
    let metrics: Metrics = load_required(ctx, "kpi", url).await?;
    println!(
        "{}",
        cli::format_kpi(&kpi_panel(&metrics), ctx.json, ctx.no_color)
    );
    Ok(())
}

async fn run_revenue(ctx: &App, mode: RevenueMode, chart: ChartKind) -> Result<()> {
    let url = revenue_url(ctx.session.client(), &ctx.filters);
    let points: Vec<RevenuePoint> = load_required(ctx, "revenue", url).await?;
    println!(
        "{}",
        cli::format_revenue(&points, mode, chart, ctx.json, ctx.no_color)
    );
    Ok(())
}

async fn run_customers(ctx: &App, tab: CustomerTab) -> Result<()> {
    let urls = customer_urls(ctx.session.client(), &ctx.filters);
    let (metrics, top, segments, payments) = tokio::join!(
        load_required::<CustomerMetrics>(ctx, "customer-metrics", urls.metrics),
        load_required::<Vec<TopCustomer>>(ctx, "top-customers", urls.top_customers),
        load_required::<Vec<CustomerSegment>>(ctx, "customer-segmentation", urls.segmentation),
        load_required::<Vec<PaymentMethod>>(ctx, "payment-methods", urls.payment_methods),
    );
    let data = CustomerData {
        metrics: metrics?,
        top_customers: top?,
        segments: segments?,
        payment_methods: payments?,
    };
    println!(
        "{}",
        cli::format_customers(&data, tab, ctx.json, ctx.no_color)
    );
    Ok(())
}

async fn run_delivery(ctx: &App, active: DeliveryTab) -> Result<()> {
    let client = ctx.session.client();
    let url_for = |tab| delivery_tab_url(client, &ctx.filters, tab, active, false);

    // Inactive tabs get no URL, so their slots stay idle
    let (overview, regions, platforms, timing) = tokio::join!(
        load_panel::<DeliveryOverview>(ctx, DeliveryTab::Overview.slot_name(), url_for(DeliveryTab::Overview)),
        load_panel::<Vec<DeliveryRegion>>(ctx, DeliveryTab::Regions.slot_name(), url_for(DeliveryTab::Regions)),
        load_panel::<Vec<DeliveryPlatform>>(ctx, DeliveryTab::Platforms.slot_name(), url_for(DeliveryTab::Platforms)),
        load_panel::<DeliveryTiming>(ctx, DeliveryTab::Timing.slot_name(), url_for(DeliveryTab::Timing)),
    );

    let data = match active {
        DeliveryTab::Overview => DeliveryData::Overview(overview?.unwrap_or_default()),
        DeliveryTab::Regions => DeliveryData::Regions(regions?.unwrap_or_default()),
        DeliveryTab::Platforms => DeliveryData::Platforms(platforms?.unwrap_or_default()),
        DeliveryTab::Timing => DeliveryData::Timing(timing?.unwrap_or_default()),
    };
    debug!(tab = ?data.tab(), requests = ctx.session.slot_count(), "delivery panel loaded");
    println!("{}", cli::format_delivery(&data, ctx.json, ctx.no_color));
    Ok(())
}

async fn run_operational(ctx: &App, tab: OperationalTab) -> Result<()> {
    let urls = operational_urls(ctx.session.client(), &ctx.filters);
    let (metrics, hourly, cancellations) = tokio::join!(
        load_required::<OperationalMetrics>(ctx, "operational-metrics", urls.metrics),
        load_required::<Vec<HourlyLoad>>(ctx, "operational-by-hour", urls.by_hour),
        load_required::<CancellationMetrics>(ctx, "cancellation-metrics", urls.cancellations),
    );
    let data = OperationalData {
        metrics: metrics?,
        hourly: hourly?,
        cancellations: cancellations?,
    };
    println!(
        "{}",
        cli::format_operational(&data, tab, ctx.json, ctx.no_color)
    );
    Ok(())
}

async fn run_ask(ctx: &App, question: &str, csv: bool) -> Result<()> {
    let client: &ApiClient = ctx.session.client();
    debug!(endpoint = %Endpoint::AiQuery, "sending question");

    let response = match client.ai_query(question).await {
        Ok(response) => response,
        Err(dineboard_core::CoreError::QueryRejected {
            error,
            message,
            blocked_keyword,
            ..
        }) => {
            eprintln!("✗ {}", error);
            if let Some(message) = message {
                eprintln!("  {}", message);
            }
            if let Some(keyword) = blocked_keyword {
                eprintln!("  Blocked keyword: {}", keyword);
            }
            bail!("question rejected by the server");
        }
        Err(e) => return Err(e).context("Failed to process question"),
    };

    println!(
        "{}",
        cli::format_ai_query(&response, ctx.json, ctx.no_color)
    );

    if csv {
        let millis = chrono::Utc::now().timestamp_millis();
        match save_csv(&ctx.output_dir, &response, millis)? {
            Some(path) => eprintln!("✓ Saved {}", path.display()),
            None => eprintln!("Nothing to save: the query returned no rows"),
        }
    }
    Ok(())
}

async fn run_export(ctx: &App, format: ExportFormat, open: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let bus = ProgressBus::default();
    let mut events = bus.subscribe();
    let pipeline = ExportPipeline::new(ctx.session.client().clone(), &ctx.output_dir).with_bus(bus);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );
    if ctx.json {
        bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let progress = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    ExportEvent::Progress { percent, stage } => {
                        bar.set_position(percent as u64);
                        bar.set_message(stage.label());
                    }
                    ExportEvent::Completed { .. } => {
                        bar.finish_and_clear();
                        break;
                    }
                    ExportEvent::Failed { message } => {
                        bar.abandon_with_message(format!("✗ {}", message));
                        break;
                    }
                }
            }
        })
    };

    let result = pipeline.run(format, &ctx.filters).await;
    // The pipeline always ends with Completed or Failed
    let _ = progress.await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", cli::format_export_failure(&e));
            return Err(e).context("Export failed");
        }
    };
    println!("{}", cli::format_export_summary(&outcome, ctx.json));

    if open && format == ExportFormat::Html {
        open::that(&outcome.path)
            .with_context(|| format!("Failed to open {}", outcome.path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_filters_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dineboard",
            "export",
            "excel",
            "--period",
            "7",
            "--channel",
            "iFood",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Export {
                format: ExportFormat::RichCsv,
                open: false
            }
        ));
        let filters = cli.filters.into_state("30");
        assert_eq!(filters.period.as_deref(), Some("7"));
        assert_eq!(filters.channel.as_deref(), Some("iFood"));
    }

    #[test]
    fn test_default_period_from_config() {
        let filters = FilterArgs::default().into_state("90");
        assert_eq!(filters.period.as_deref(), Some("90"));
    }

    #[test]
    fn test_unknown_tab_rejected() {
        assert!(Cli::try_parse_from(["dineboard", "delivery", "--tab", "drivers"]).is_err());
    }

    #[test]
    fn test_load_config_missing_path_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(dir.path().join("none.toml"))).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
