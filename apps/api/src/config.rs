use anyhow::{bail, Context, Result};

use crate::secrets::Credentials;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_INDEX_DIR: &str = "faiss_index";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Which hosting surface the process is running under.
/// Only affects defaults (environment name, log format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Server,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
/// Credentials are resolved separately (see `secrets`) and attached afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub index_dir: String,
    pub openai_base_url: String,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub credentials: Credentials,
}

impl Config {
    pub fn from_env(surface: Surface) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(surface, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup so tests
    /// never have to touch the process environment.
    pub fn from_lookup<F>(surface: Surface, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|&k| lookup(k).filter(|v| !v.is_empty()));

        let default_environment = match surface {
            Surface::Server => "development",
            Surface::Function => "production",
        };

        let port = match first(&["APP_PORT", "FLASK_PORT"]) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Port '{raw}' must be a valid port number"))?,
            None => DEFAULT_PORT,
        };

        let log_format = match first(&["LOG_FORMAT"]).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => bail!("LOG_FORMAT must be 'json' or 'pretty', got '{other}'"),
            None if surface == Surface::Function => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        Ok(Config {
            environment: first(&["APP_ENV", "FLASK_ENV"])
                .unwrap_or_else(|| default_environment.to_string()),
            host: first(&["APP_HOST", "FLASK_HOST"]).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            index_dir: first(&["INDEX_DIR"]).unwrap_or_else(|| DEFAULT_INDEX_DIR.to_string()),
            openai_base_url: first(&["OPENAI_BASE_URL"])
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            rust_log: first(&["RUST_LOG"]).unwrap_or_else(|| "info".to_string()),
            log_format,
            credentials: Credentials::from_lookup(&lookup),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
