//! Environment-driven configuration.
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file by `main`). Missing credentials are reported, not fatal: the
//! service starts and `/health` exposes the unconfigured state.

use crate::error::AppError;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::warn;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATA_DIR: &str = "data/argo";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "logs/floatchat.log";

/// Outcome of log-file setup. File logging is best-effort: when the sink
/// cannot be opened the service keeps running with console output only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingStatus {
    /// JSON log file active alongside console output.
    FileAndConsole(PathBuf),
    /// Console output only, with the reason file logging was skipped.
    ConsoleOnly { reason: String },
}

/// Runtime configuration for the FloatChat service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the chat-completion API. `None` means the
    /// service runs unconfigured and text generation falls back locally.
    pub api_key: Option<String>,
    /// Chat-completion endpoint URL.
    pub api_url: String,
    /// Bind host for the HTTP server.
    pub host: String,
    /// Bind port for the HTTP server.
    pub port: u16,
    /// Exact origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Directory holding the cached columnar dataset.
    pub data_dir: PathBuf,
    /// Filter directive for the tracing subscriber.
    pub log_level: String,
    /// JSON log sink path. `None` disables file logging outright.
    pub log_file: Option<PathBuf>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Builds the configuration from the process environment, applying
    /// defaults for everything except the API key.
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid PORT value {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://127.0.0.1:3001".to_string(),
            ],
        };

        Self {
            api_key: env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty()),
            api_url: env_or("DEEPSEEK_API_URL", DEFAULT_API_URL),
            host: env_or("HOST", DEFAULT_HOST),
            port,
            cors_origins,
            data_dir: PathBuf::from(env_or("ARGO_DATA_DIR", DEFAULT_DATA_DIR)),
            log_level: env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_file: Some(PathBuf::from(env_or("LOG_FILE", DEFAULT_LOG_FILE))),
        }
    }

    /// Checks required settings. The caller decides whether a failure is
    /// fatal; at startup it is logged and the process continues.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.is_none() {
            return Err(AppError::Config(
                "DEEPSEEK_API_KEY is required. Please set it in the environment or .env file"
                    .to_string(),
            ));
        }
        Url::parse(&self.api_url)?;
        Ok(())
    }

    /// Creates the data directory if missing. Failure only warns: the store
    /// reports `None` later and `/health` shows the degraded state.
    pub fn ensure_data_dir(&self) {
        if let Err(e) = std::fs::create_dir_all(&self.data_dir) {
            warn!("Could not create data directory {:?}: {}", self.data_dir, e);
        }
    }

    /// Opens the log sink for appending, creating parent directories as
    /// needed. `Err` carries the reason console-only logging was chosen.
    pub fn open_log_sink(&self) -> Result<(std::fs::File, PathBuf), String> {
        let path = match &self.log_file {
            Some(path) => path.clone(),
            None => return Err("no log file configured".to_string()),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("could not create log directory {:?}: {}", parent, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("could not open log file {:?}: {}", path, e))?;

        Ok((file, path))
    }

    /// True when the chat-completion credential is present.
    pub fn api_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
