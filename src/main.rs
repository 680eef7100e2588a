//! econdash Dashboard
//!
//! Terminal dashboard for the economic indicators backend.

use clap::Parser;
use econdash::config::{Config, LoadedConfig};
use econdash::session::{self, HELP};
use econdash::{DashboardController, DashboardView, IndicatorClient, TerminalView};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "econdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Economic indicators dashboard")]
struct Args {
    /// Backend base URL (including /api)
    #[arg(long)]
    api_url: Option<String>,

    /// History window in days
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Indicator to chart right after startup
    #[arg(short, long)]
    indicator: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render once and exit instead of reading commands
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => LoadedConfig {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            errors: Vec::new(),
        },
        None => Config::load_default(),
    };
    let mut config = loaded.config.clone();
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(days) = args.days {
        config.dashboard.default_days = days;
    }

    econdash::logging::init_tracing(&config.logging);
    tracing::info!("econdash v{}", env!("CARGO_PKG_VERSION"));
    loaded.report();

    let client = IndicatorClient::new(config.api.client_config())?;
    let view = TerminalView::new(
        std::io::stdout(),
        config.dashboard.chart_width,
        config.dashboard.chart_height,
    );
    let mut dashboard = DashboardController::new(Arc::new(client), view, &config.dashboard);

    dashboard.start().await?;

    if let Some(code) = args.indicator.as_deref() {
        dashboard.load_indicator_chart(code).await;
    }

    if args.once {
        return Ok(());
    }

    dashboard.view_mut().show_notice(HELP);
    session::run(&mut dashboard, BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("econdash shutdown complete");
    Ok(())
}
