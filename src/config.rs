use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::commands::Command;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Parser, Debug)]
#[command(name = "inkpot", about = "Command-line client for the Inkpot blogging platform")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the backend API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration with CLI > environment > file > default
    /// precedence.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("INKPOT_API_URL") {
            if !url.is_empty() {
                config.api.base_url = url;
            }
        }

        // CLI overrides
        if let Some(ref url) = cli.api_url {
            config.api.base_url = url.clone();
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .expect("Could not determine home directory")
                .join(".inkpot")
        })
    }
}
