use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::Deserialize;

use crate::model::DEFAULT_HORIZONS;
use crate::provider::YahooClient;

/// Configuration for the historical multiple analysis
#[derive(Debug, Clone, Deserialize, Parser)]
#[serde(default)]
#[command(name = "hist_multiple")]
#[command(about = "Find the historical-multiple threshold that maximized median forward returns")]
pub struct Config {
    /// Ticker to analyze (e.g. AAPL, PETR4). Omit for an interactive prompt
    #[arg(value_name = "TICKER")]
    pub ticker: Option<String>,

    /// Forward horizons in trading days, comma separated
    #[arg(long, value_delimiter = ',', default_value = "180,360")]
    pub horizons: Vec<usize>,

    /// Read SYMBOL.TXT histories from this directory instead of the network
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Chart API endpoint
    #[arg(long, default_value = YahooClient::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the full threshold sweep in the text report
    #[arg(long)]
    pub table: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Load settings from a TOML file; options given on the command line
    /// take precedence over it
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticker: None,
            horizons: DEFAULT_HORIZONS.to_vec(),
            data_dir: None,
            base_url: YahooClient::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            json: false,
            table: false,
            log_level: "info".to_string(),
            config: None,
        }
    }
}

impl Config {
    /// Parse the process command line.
    pub fn load() -> Result<Self> {
        Self::from_matches(&Config::command().get_matches())
    }

    /// With `--config` the file supplies the settings and every option set
    /// on the command line overrides its file value.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let cli = Config::from_arg_matches(matches)?;
        let Some(path) = cli.config.clone() else {
            return Ok(cli);
        };

        let mut config = Config::from_file(&path)?;
        config.override_with(cli, matches);
        config.config = Some(path);
        Ok(config)
    }

    fn override_with(&mut self, cli: Config, matches: &ArgMatches) {
        let given = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        if given("ticker") {
            self.ticker = cli.ticker;
        }
        if given("horizons") {
            self.horizons = cli.horizons;
        }
        if given("data_dir") {
            self.data_dir = cli.data_dir;
        }
        if given("base_url") {
            self.base_url = cli.base_url;
        }
        if given("timeout_secs") {
            self.timeout_secs = cli.timeout_secs;
        }
        if given("json") {
            self.json = cli.json;
        }
        if given("table") {
            self.table = cli.table;
        }
        if given("log_level") {
            self.log_level = cli.log_level;
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.horizons.is_empty() {
            anyhow::bail!("at least one horizon is required");
        }

        if let Some(h) = self.horizons.iter().find(|&&h| h == 0) {
            anyhow::bail!("horizons must be greater than 0, got {}", h);
        }

        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }

        if self.data_dir.is_none() && self.base_url.trim().is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        Ok(())
    }

    /// Horizons without repeats, first occurrence first.
    pub fn unique_horizons(&self) -> Vec<usize> {
        let mut unique = Vec::with_capacity(self.horizons.len());
        for &h in &self.horizons {
            if !unique.contains(&h) {
                unique.push(h);
            }
        }
        unique
    }
}
