//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::alpha_vantage_adapter::AlphaVantageAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::plotters_chart_adapter::PlottersChartAdapter;
use crate::adapters::web::{build_router, AppState};
use crate::domain::chart_request;
use crate::domain::error::StockChartError;
use crate::domain::query::{QueryParameters, RawQuery};
use crate::domain::settings::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "stockchart", about = "Stock price chart web service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overrides [web] listen
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Render one chart to a PNG file
    Chart {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "TIME_SERIES_DAILY")]
        function: String,
        #[arg(long, default_value = "")]
        interval: String,
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
        #[arg(long, default_value = "line")]
        chart_type: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config, listen } => run_serve(config.as_ref(), listen.as_deref()),
        Command::Chart {
            config,
            symbol,
            function,
            interval,
            start_date,
            end_date,
            chart_type,
            output,
        } => {
            let raw = RawQuery {
                symbol: &symbol,
                function: &function,
                interval: &interval,
                chart_type: &chart_type,
                start_date: &start_date,
                end_date: &end_date,
            };
            run_chart(config.as_ref(), &raw, &output)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Settings from the given INI file, or built-in defaults when none is given.
pub fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, StockChartError> {
    let adapter = match path {
        Some(p) => FileConfigAdapter::from_file(p)?,
        None => FileConfigAdapter::empty(),
    };
    AppConfig::from_port(&adapter)
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "stockchart=debug,tower_http=debug"
    } else {
        "stockchart=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

fn runtime() -> Result<tokio::runtime::Runtime, StockChartError> {
    tokio::runtime::Runtime::new().map_err(|e| StockChartError::Server {
        reason: format!("could not start runtime: {e}"),
    })
}

fn run_serve(config_path: Option<&PathBuf>, listen: Option<&str>) -> Result<(), StockChartError> {
    let mut config = load_config(config_path)?;
    if let Some(addr) = listen {
        config.listen = addr.parse().map_err(|_| StockChartError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: format!("'{addr}' is not a socket address"),
        })?;
    }
    init_tracing(config.debug);

    let data_port = Arc::new(AlphaVantageAdapter::new(&config.upstream)?);
    let chart_port = Arc::new(PlottersChartAdapter::new(&config.chart));
    let addr = config.listen;

    let state = AppState {
        config: Arc::new(config),
        data_port,
        chart_port,
    };
    let router = build_router(state);

    runtime()?.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| StockChartError::Server {
                reason: format!("could not bind {addr}: {e}"),
            })?;
        info!(%addr, "stock chart server listening");
        axum::serve(listener, router)
            .await
            .map_err(|e| StockChartError::Server {
                reason: e.to_string(),
            })
    })
}

fn run_chart(
    config_path: Option<&PathBuf>,
    raw: &RawQuery<'_>,
    output: &PathBuf,
) -> Result<(), StockChartError> {
    let config = load_config(config_path)?;
    init_tracing(config.debug);

    let params = QueryParameters::parse(raw)?;
    let data_port = AlphaVantageAdapter::new(&config.upstream)?;
    let chart_port = Arc::new(PlottersChartAdapter::new(&config.chart));

    let image = runtime()?.block_on(chart_request::run_query(&params, &data_port, chart_port))?;
    let png = image.decode().map_err(|e| StockChartError::Io(std::io::Error::other(e)))?;
    fs::write(output, png)?;

    info!(
        symbol = %params.series.symbol,
        output = %output.display(),
        "chart written"
    );
    Ok(())
}
