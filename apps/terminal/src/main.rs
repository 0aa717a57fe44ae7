mod config;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zeterminal_market_data::{CancelToken, IntervalKind, MarketDataService, Position};

use config::Config;

/// Market data from the command line, printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "zeterminal", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current quote for one symbol
    Quote { symbol: String },
    /// Current quotes for several symbols; unknown symbols are omitted
    Quotes {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Quotes for the configured watchlist
    Watchlist,
    /// Quotes for the ticker symbols
    Ticker,
    /// Major market indices
    Indices,
    /// Price series for one symbol
    Series {
        symbol: String,
        /// intraday or daily
        #[arg(long, default_value = "intraday")]
        interval: IntervalKind,
        /// Keep only the most recent bars
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Symbol search
    Search { query: String },
    /// News headlines, general market news without a symbol
    News {
        symbol: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// SMA, EMA and RSI over recent daily closes
    Indicators {
        symbol: String,
        /// Number of daily bars to compute over
        #[arg(long)]
        window: Option<usize>,
    },
    /// Value positions given as SYMBOL:SHARES:AVG_PRICE
    Portfolio {
        #[arg(required = true, value_parser = parse_position)]
        positions: Vec<Position>,
    },
}

fn parse_position(raw: &str) -> Result<Position, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [symbol, shares, avg_price] = parts.as_slice() else {
        return Err(format!("expected SYMBOL:SHARES:AVG_PRICE, got '{}'", raw));
    };
    if symbol.is_empty() {
        return Err(format!("missing symbol in '{}'", raw));
    }
    let shares: f64 = shares
        .parse()
        .map_err(|_| format!("invalid share count in '{}'", raw))?;
    let avg_price: f64 = avg_price
        .parse()
        .map_err(|_| format!("invalid average price in '{}'", raw))?;
    Ok(Position::new(symbol.to_uppercase(), shares, avg_price))
}

fn init_tracing() {
    let log_format = std::env::var("ZT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays valid JSON
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_json(value: impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&value).context("serializing output")?;
    println!("{}", json);
    Ok(())
}

/// Print `value`, or a "no data" notice when it is absent.
fn print_or_missing(value: Option<Value>, subject: &str) -> anyhow::Result<ExitCode> {
    match value {
        Some(value) => {
            print_json(value)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No data available for {}", subject);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(
    service: &MarketDataService,
    command: Command,
    cancel: &CancelToken,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Quote { symbol } => {
            let quote = service.get_quote(&symbol, cancel).await;
            print_or_missing(quote.map(serde_json::to_value).transpose()?, &symbol)
        }
        Command::Quotes { symbols } => {
            print_json(service.get_quotes(&symbols, cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Watchlist => {
            print_json(service.get_watchlist(cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ticker => {
            print_json(service.get_ticker(cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Indices => {
            print_json(service.get_market_indices(cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Series {
            symbol,
            interval,
            limit,
        } => {
            let series = service.get_series(&symbol, interval, limit, cancel).await;
            let value = (!series.is_empty())
                .then(|| serde_json::to_value(&series))
                .transpose()?;
            print_or_missing(value, &format!("{} ({})", symbol, interval))
        }
        Command::Search { query } => {
            print_json(service.get_search(&query, cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::News { symbol, limit } => {
            let news = service
                .get_news(symbol.as_deref(), Some(limit), cancel)
                .await;
            print_json(news)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Indicators { symbol, window } => {
            let set = service.get_indicators_for(&symbol, window, cancel).await;
            print_or_missing(set.map(serde_json::to_value).transpose()?, &symbol)
        }
        Command::Portfolio { positions } => {
            print_json(service.get_portfolio(&positions, cancel).await)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing();

    if config.providers.alpha_vantage_api_key == zeterminal_market_data::DEMO_API_KEY {
        tracing::warn!("ALPHA_VANTAGE_API_KEY not set, using the demo key");
    }

    let service = MarketDataService::new(&config.providers);

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling in-flight requests");
            on_interrupt.cancel();
        }
    });

    let code = run(&service, cli.command, &cancel).await?;
    if cancel.is_cancelled() {
        // Conventional exit status for SIGINT
        return Ok(ExitCode::from(130));
    }
    Ok(code)
}
