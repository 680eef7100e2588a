//! econdash CLI
//!
//! One-shot commands against the indicators backend:
//! - List indicators
//! - Show one indicator or its history
//! - Latest stats and backend health

use clap::{Parser, Subcommand, ValueEnum};
use econdash::api::{
    ClientError, HealthStatus, HistoryResponse, Indicator, IndicatorClient, LatestStats,
};
use econdash::chart::{ChartRenderer, ChartSeries, TextSurface};
use econdash::config::Config;
use econdash::format::{calculate_change, format_currency, format_date};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "econdash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the economic indicators backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (default: from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all indicators with their latest value
    Indicators,

    /// Show one indicator
    Show {
        /// Indicator code (e.g. dolar, uf)
        code: String,
    },

    /// Show the history of an indicator
    History {
        /// Indicator code
        code: String,
        /// Number of trailing days
        #[arg(short, long, default_value = "30")]
        days: u32,
        /// Maximum number of values
        #[arg(short, long)]
        limit: Option<u32>,
        /// Draw a chart below the table
        #[arg(long)]
        chart: bool,
    },

    /// Latest value of every indicator
    Stats,

    /// Check backend health
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load_default();
    let mut config = loaded.config.clone();
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }
    econdash::logging::init_tracing(&config.logging);
    loaded.report();

    let client = IndicatorClient::new(config.api.client_config())?;

    match cli.command {
        Commands::Indicators => {
            let indicators = or_exit(client.fetch_indicators().await);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&indicators)?),
                OutputFormat::Csv => write_indicators_csv(std::io::stdout(), &indicators)?,
                OutputFormat::Table => print_indicators_table(&indicators),
            }
        }

        Commands::Show { code } => {
            let indicator = or_exit(client.fetch_indicator(&code).await);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&indicator)?),
                OutputFormat::Csv => {
                    write_indicators_csv(std::io::stdout(), std::slice::from_ref(&indicator))?
                }
                OutputFormat::Table => {
                    println!("{} ({})", indicator.name, indicator.code);
                    println!(
                        "  Value: {}",
                        format_currency(indicator.latest_value, indicator.unit.as_deref())
                    );
                    println!("  Unit:  {}", indicator.unit.as_deref().unwrap_or("-"));
                    println!(
                        "  Date:  {}",
                        indicator
                            .latest_date
                            .map(format_date)
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        Commands::History {
            code,
            days,
            limit,
            chart,
        } => {
            let result = match limit {
                Some(limit) => client.fetch_indicator_history_limited(&code, days, limit).await,
                None => client.fetch_indicator_history(&code, days).await,
            };
            let history = or_exit(result);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
                OutputFormat::Csv => write_history_csv(std::io::stdout(), &history)?,
                OutputFormat::Table => {
                    print_history_table(&history, days);
                    if chart && !history.is_empty() {
                        let mut renderer = ChartRenderer::new(TextSurface::new(
                            config.dashboard.chart_width,
                            config.dashboard.chart_height,
                        ));
                        renderer.create_or_update(&ChartSeries::from_history(&history))?;
                        println!();
                        print!("{}", renderer.surface().rendered().unwrap_or_default());
                    }
                }
            }
        }

        Commands::Stats => {
            let stats = or_exit(client.fetch_latest_stats().await);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Csv => write_stats_csv(std::io::stdout(), &stats)?,
                OutputFormat::Table => print_stats(&stats),
            }
        }

        Commands::Health => match client.check_backend_health().await {
            Ok(health) => match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                OutputFormat::Csv => write_health_csv(std::io::stdout(), &health)?,
                OutputFormat::Table => {
                    println!("econdash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("Backend: {}", config.api.base_url);
                    println!("Status: {}", health.status);
                    if let Some(db) = &health.database {
                        println!("Database: {}", db);
                    }
                    if let Some(ts) = &health.timestamp {
                        println!("Checked at: {}", ts);
                    }
                }
            },
            Err(e) => {
                eprintln!("Cannot connect to the backend at {}", config.api.base_url);
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the indicators backend is running.");
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let config = econdash::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Unwrap a backend result or print the error and exit
fn or_exit<T>(result: Result<T, ClientError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_indicators_table(indicators: &[Indicator]) {
    if indicators.is_empty() {
        println!("No indicators available.");
        return;
    }

    println!(
        "{:<14} {:<32} {:>16} {:<6} {}",
        "Code", "Name", "Value", "Unit", "Date"
    );
    println!("{}", "-".repeat(82));

    for indicator in indicators {
        println!(
            "{:<14} {:<32} {:>16} {:<6} {}",
            indicator.code,
            indicator.name,
            format_currency(indicator.latest_value, indicator.unit.as_deref()),
            indicator.unit.as_deref().unwrap_or("-"),
            indicator
                .latest_date
                .map(format_date)
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn write_indicators_csv<W: Write>(out: W, indicators: &[Indicator]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["code", "name", "latest_value", "unit", "latest_date"])?;

    for indicator in indicators {
        writer.write_record([
            indicator.code.clone(),
            indicator.name.clone(),
            indicator
                .latest_value
                .map(|v| v.to_string())
                .unwrap_or_default(),
            indicator.unit.clone().unwrap_or_default(),
            indicator
                .latest_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Date, formatted value and change for each history row, newest first
///
/// Change is against the next (older) value; the oldest row has none.
fn history_rows(history: &HistoryResponse) -> Vec<[String; 3]> {
    let unit = history.indicator.unit.as_deref();

    history
        .values
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let change = match history.values.get(i + 1) {
                Some(older) => format!("{:+.2}%", calculate_change(point.value, Some(older.value))),
                None => "-".to_string(),
            };
            [
                format_date(point.date),
                format_currency(Some(point.value), unit),
                change,
            ]
        })
        .collect()
}

fn print_history_table(history: &HistoryResponse, days: u32) {
    println!(
        "{} ({}) - last {} days",
        history.indicator.name, history.indicator.code, days
    );
    println!();

    if history.is_empty() {
        println!("No data for the selected period");
        return;
    }

    println!("{:<12} {:>18} {:>10}", "Date", "Value", "Change");
    println!("{}", "-".repeat(42));

    for [date, value, change] in history_rows(history) {
        println!("{:<12} {:>18} {:>10}", date, value, change);
    }
}

fn write_history_csv<W: Write>(out: W, history: &HistoryResponse) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["date", "value"])?;

    for point in &history.values {
        writer.write_record([point.date.to_string(), point.value.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_stats_csv<W: Write>(out: W, stats: &LatestStats) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["code", "name", "value", "unit", "date"])?;

    for item in &stats.indicators {
        writer.write_record([
            item.code.clone(),
            item.name.clone(),
            item.value.to_string(),
            item.unit.clone().unwrap_or_default(),
            item.date.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_health_csv<W: Write>(out: W, health: &HealthStatus) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["status", "database", "timestamp"])?;
    writer.write_record([
        health.status.as_str(),
        health.database.as_deref().unwrap_or_default(),
        health.timestamp.as_deref().unwrap_or_default(),
    ])?;
    writer.flush()?;
    Ok(())
}

fn print_stats(stats: &LatestStats) {
    println!("Latest values ({} indicators, {})", stats.count, stats.timestamp);
    println!();

    for item in &stats.indicators {
        println!(
            "{:<14} {:>18}  {}",
            item.code,
            format_currency(Some(item.value), item.unit.as_deref()),
            format_date(item.date)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use econdash::api::{HistoryPoint, IndicatorRef, LatestValue};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn point(day: u32, value: f64) -> HistoryPoint {
        HistoryPoint {
            date: date(day),
            value,
        }
    }

    fn dolar_history() -> HistoryResponse {
        HistoryResponse {
            indicator: IndicatorRef {
                code: "dolar".into(),
                name: "Dólar observado".into(),
                unit: Some("CLP".into()),
            },
            values: vec![
                point(15, 950.0),
                point(14, 940.0),
                point(13, 1000.0),
            ],
            count: Some(3),
        }
    }

    fn csv_string(write: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_history_rows_compare_with_older_value() {
        let rows = history_rows(&dolar_history());

        assert_eq!(
            rows,
            vec![
                ["15-10-2026".to_string(), "$950,00".to_string(), "+1.06%".to_string()],
                ["14-10-2026".to_string(), "$940,00".to_string(), "-6.00%".to_string()],
                ["13-10-2026".to_string(), "$1.000,00".to_string(), "-".to_string()],
            ]
        );
    }

    #[test]
    fn test_history_rows_empty() {
        let mut history = dolar_history();
        history.values.clear();
        assert!(history_rows(&history).is_empty());
    }

    #[test]
    fn test_indicators_csv() {
        let indicators = vec![
            Indicator::new("tpm", "Tasa, política monetaria")
                .unit("%")
                .latest(5.25, date(1)),
            Indicator::new("ipc", "IPC"),
        ];

        let out = csv_string(|buf| write_indicators_csv(buf, &indicators));

        assert_eq!(
            out,
            "code,name,latest_value,unit,latest_date\n\
             tpm,\"Tasa, política monetaria\",5.25,%,2026-10-01\n\
             ipc,IPC,,,\n"
        );
    }

    #[test]
    fn test_history_csv_keeps_backend_order() {
        let out = csv_string(|buf| write_history_csv(buf, &dolar_history()));

        assert_eq!(out, "date,value\n2026-10-15,950\n2026-10-14,940\n2026-10-13,1000\n");
    }

    #[test]
    fn test_stats_csv() {
        let stats = LatestStats {
            timestamp: "2026-10-16T09:00:00".into(),
            indicators: vec![LatestValue {
                code: "uf".into(),
                name: "Unidad de fomento".into(),
                unit: Some("CLP".into()),
                value: 39485.65,
                date: date(16),
            }],
            count: 1,
        };

        let out = csv_string(|buf| write_stats_csv(buf, &stats));

        assert_eq!(
            out,
            "code,name,value,unit,date\nuf,Unidad de fomento,39485.65,CLP,2026-10-16\n"
        );
    }

    #[test]
    fn test_health_csv() {
        let health = HealthStatus {
            status: "healthy".into(),
            database: Some("connected".into()),
            timestamp: None,
            error: None,
        };

        let out = csv_string(|buf| write_health_csv(buf, &health));

        assert_eq!(out, "status,database,timestamp\nhealthy,connected,\n");
    }

    #[test]
    fn test_format_flag_rejects_unknown_values() {
        let cli = Cli::try_parse_from(["econdash-cli", "stats", "--format", "csv"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);

        assert!(Cli::try_parse_from(["econdash-cli", "health", "--format", "xml"]).is_err());
    }
}
