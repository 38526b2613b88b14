use std::io::Write;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::Local;
use hist_multiple::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}

/// Analyze one ticker and print the report. Analysis failures are part of
/// the report, not errors of the program.
async fn run_once<P: PriceProvider>(provider: &P, config: &Config, ticker: &str) -> Result<()> {
    let horizons = config.unique_horizons();
    let outcome = analyze(provider, ticker, &horizons).await;

    if config.json {
        println!("{}", render_json(ticker, &outcome)?);
    } else {
        let today = Local::now().date_naive();
        print!("{}", render_text(ticker, &outcome, config.table, today)?);
    }
    Ok(())
}

async fn run<P: PriceProvider>(provider: &P, config: &Config) -> Result<()> {
    if let Some(ticker) = &config.ticker {
        return run_once(provider, config, ticker).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("Enter a stock ticker (e.g. AAPL), empty line to quit: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        run_once(provider, config, &line).await?;
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.log_level)?;
    config.validate()?;

    match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "reading histories from disk");
            run(&FileProvider::new(dir), &config).await
        }
        None => {
            let client = YahooClient::with_base_url(
                &config.base_url,
                Duration::from_secs(config.timeout_secs),
            )?;
            run(&client, &config).await
        }
    }
}
