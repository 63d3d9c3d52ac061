//! Command-line interface for the strategy engine

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use strategy_engine::{
    AlphaVantageClient, CachedHeadlineProvider, CachedPriceProvider, DriftForecaster,
    FundamentalsProvider, HeadlineProvider, HistoryPeriod, LexiconScorer, NewsApiClient,
    NoHeadlines, PriceForecaster, PriceHistoryProvider, StrategyAssembler, StrategyConfig,
    YahooFinanceClient,
};
use strategy_utils::LogFormat;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "strategy")]
#[command(about = "Generate BUY/SELL/HOLD strategies from prices and news", long_about = None)]
struct Cli {
    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate strategies for one or more tickers
    Analyze {
        /// Ticker symbols, e.g. AAPL MSFT
        #[arg(required = true)]
        tickers: Vec<String>,

        /// History look-back (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
        #[arg(long)]
        period: Option<HistoryPeriod>,

        /// Bar interval, e.g. 1d
        #[arg(long)]
        interval: Option<String>,

        /// Annual risk-free rate, e.g. 0.04
        #[arg(long)]
        risk_free_rate: Option<f64>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show the company overview (needs ALPHA_VANTAGE_API_KEY)
    Fundamentals {
        ticker: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Project closes forward from the historical drift
    Forecast {
        ticker: String,

        /// Number of bars to project
        #[arg(long, default_value_t = 7)]
        days: usize,

        /// History look-back used for the drift
        #[arg(long)]
        period: Option<HistoryPeriod>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    strategy_utils::init_tracing_with("info", cli.log_format);

    let config = StrategyConfig::from_env().context("failed to load configuration")?;

    match cli.command {
        Commands::Analyze {
            tickers,
            period,
            interval,
            risk_free_rate,
            json,
        } => {
            let mut config = config;
            if let Some(period) = period {
                config.history_period = period;
            }
            if let Some(interval) = interval {
                config.history_interval = interval;
            }
            if let Some(rate) = risk_free_rate {
                config.risk_free_rate = rate;
            }
            config.validate().context("invalid arguments")?;

            analyze(config, &tickers, json).await
        }
        Commands::Fundamentals { ticker, json } => fundamentals(&config, &ticker, json).await,
        Commands::Forecast {
            ticker,
            days,
            period,
            json,
        } => forecast(&config, &ticker, days, period, json).await,
    }
}

async fn analyze(config: StrategyConfig, tickers: &[String], json: bool) -> anyhow::Result<()> {
    let headlines: Arc<dyn HeadlineProvider> = match NewsApiClient::from_config(&config)? {
        Some(client) => Arc::new(CachedHeadlineProvider::new(client, config.cache_ttl_news)),
        None => {
            warn!("NEWSAPI_KEY not set, sentiment will be neutral");
            Arc::new(NoHeadlines)
        }
    };
    let prices = Arc::new(CachedPriceProvider::new(
        YahooFinanceClient::new(),
        config.cache_ttl_prices,
    ));

    let assembler = StrategyAssembler::new(
        Arc::new(config),
        prices,
        headlines,
        Arc::new(LexiconScorer::new()),
    );

    let reports = assembler.generate_batch(tickers).await;
    let generated = reports.iter().filter(|r| r.is_generated()).count();
    info!("Generated {} of {} strategies", generated, reports.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", render::strategies(&reports));
        if let Some(table) = render::headlines(&reports) {
            println!("{table}");
        }
    }

    Ok(())
}

async fn fundamentals(config: &StrategyConfig, ticker: &str, json: bool) -> anyhow::Result<()> {
    let client = AlphaVantageClient::from_config(config)?;
    let ticker = ticker.trim().to_uppercase();
    let fundamentals = client.fetch_fundamentals(&ticker).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fundamentals)?);
    } else {
        println!("{}", render::fundamentals(&fundamentals));
    }

    Ok(())
}

async fn forecast(
    config: &StrategyConfig,
    ticker: &str,
    days: usize,
    period: Option<HistoryPeriod>,
    json: bool,
) -> anyhow::Result<()> {
    let ticker = ticker.trim().to_uppercase();
    let period = period.unwrap_or(config.history_period);
    let bars = YahooFinanceClient::new()
        .fetch_history(&ticker, period, &config.history_interval)
        .await?;

    let Some(last) = bars.last() else {
        eprintln!("No price history for {ticker}");
        return Ok(());
    };

    let projected = DriftForecaster.forecast(&bars, days)?;

    if json {
        let value = serde_json::json!({
            "ticker": ticker,
            "last_close": last.close,
            "forecast": projected,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", render::forecast(&ticker, last.close, &projected));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "strategy",
            "--log-format",
            "json",
            "analyze",
            "AAPL",
            "msft",
            "--period",
            "1y",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Analyze {
                tickers,
                period,
                json,
                ..
            } => {
                assert_eq!(tickers, vec!["AAPL", "msft"]);
                assert_eq!(period, Some(HistoryPeriod::OneYear));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_requires_ticker() {
        assert!(Cli::try_parse_from(["strategy", "analyze"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_period() {
        assert!(Cli::try_parse_from(["strategy", "analyze", "AAPL", "--period", "7w"]).is_err());
    }

    #[test]
    fn test_forecast_default_days() {
        let cli = Cli::try_parse_from(["strategy", "forecast", "AAPL"]).unwrap();
        assert!(matches!(cli.command, Commands::Forecast { days: 7, .. }));
    }
}
