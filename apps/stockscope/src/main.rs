mod config;
mod render;
mod session;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dotenv::dotenv;
use std::sync::Arc;
use stockscope_api::StockscopeClient;
use stockscope_api::reports::{DEFAULT_HORIZON_DAYS, Persona};
use stockscope_api::trends::{DEFAULT_LOOKBACK_DAYS, DEFAULT_TOP_N, MomentumParams};
use stockscope_chart_engine::{PointerEvent, RawTime};
use stockscope_dashboard::{Dashboard, Tab};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides STOCKSCOPE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the symbols the backend serves
    Tickers,

    /// Print the merged history and forecast series for a symbol
    Chart {
        symbol: String,

        /// Window start (YYYY-MM-DD); defaults to three months before the last close
        #[arg(long)]
        start: Option<String>,

        /// Leave the forecast out of the series
        #[arg(long)]
        no_forecast: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Resolve a crosshair time to the candle under it
    Hover {
        symbol: String,

        /// Date key, epoch seconds or a JSON business day
        time: String,
    },

    /// Market overview and momentum leaders/laggards
    Trends {
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: u32,

        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: u32,
    },

    /// Generate a written report for a symbol
    Report {
        symbol: String,

        /// balanced, skeptic, optimist or risk_taker
        #[arg(long, default_value_t = Persona::default())]
        persona: Persona,

        #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
        horizon_days: u32,
    },

    /// Line driven dashboard session
    Interactive { symbol: Option<String> },
}

/// Loads `symbol` to completion, failing if its history could not be fetched.
async fn load(dashboard: &mut Dashboard, client: &StockscopeClient, symbol: &str) -> anyhow::Result<()> {
    let commands = dashboard.select_symbol(symbol);
    if commands.is_empty() {
        bail!("Symbol must not be empty");
    }
    session::settle(dashboard, client, commands).await;

    if let Some(err) = dashboard.store().error() {
        bail!("Failed to load {}: {err}", symbol.trim().to_uppercase());
    }
    Ok(())
}

async fn run(args: Args, client: StockscopeClient) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new();

    match args.command {
        Commands::Tickers => {
            let tickers = client.tickers().await.context("Failed to fetch tickers")?;
            render::tickers_table(&tickers).printstd();
        }
        Commands::Chart {
            symbol,
            start,
            no_forecast,
            json,
        } => {
            load(&mut dashboard, &client, &symbol).await?;
            if let Some(start) = start {
                let commands = dashboard.set_window_start(&start)?;
                session::settle(&mut dashboard, &client, commands).await;
            }
            dashboard.set_include_forecast(!no_forecast);

            if let Some(err) = dashboard.store().forecast_error() {
                eprintln!("Forecast unavailable: {err}");
            }

            let points = dashboard.chart_points();
            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                render::chart_table(&points).printstd();
                println!("{}", render::status_line(&dashboard));
            }
        }
        Commands::Hover { symbol, time } => {
            load(&mut dashboard, &client, &symbol).await?;

            let time: RawTime = time.parse()?;
            match dashboard.hover(&PointerEvent::at(time)) {
                Some(candle) => {
                    render::tooltip_table(candle).printstd();
                }
                None => bail!("No candle at that time"),
            }
        }
        Commands::Trends {
            lookback_days,
            top_n,
        } => {
            dashboard.set_momentum_params(MomentumParams { lookback_days, top_n });
            let commands = dashboard.activate_tab(Tab::Trends);
            session::settle(&mut dashboard, &client, commands).await;

            let trends = dashboard.trends();
            match (trends.overview(), trends.momentum()) {
                (Some(overview), Some(momentum)) => {
                    render::overview_table(overview).printstd();
                    render::momentum_table(momentum).printstd();
                }
                _ => bail!("Failed to load trends: {}", trends.error().unwrap_or("no data")),
            }
        }
        Commands::Report {
            symbol,
            persona,
            horizon_days,
        } => {
            load(&mut dashboard, &client, &symbol).await?;
            let commands = dashboard.request_report(persona, horizon_days);
            session::settle(&mut dashboard, &client, commands).await;

            let report = dashboard.report();
            match (report.markdown(), report.error()) {
                (Some(markdown), _) => println!("{markdown}"),
                (None, err) => bail!("Failed to generate report: {}", err.unwrap_or("no data")),
            }
        }
        Commands::Interactive { symbol } => {
            session::run(Arc::new(client), symbol).await?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().with_api_url(args.api_url.clone());
    let client = StockscopeClient::new(&config.client_config())
        .with_context(|| format!("Failed to create client for {}", config.api_url))?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    rt.block_on(run(args, client))
}
