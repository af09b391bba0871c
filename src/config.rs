//! Process configuration: command-line flags with environment fallbacks.
//!
//! | Flag                | Env                      | Default          |
//! |---------------------|--------------------------|------------------|
//! | `--host`            | `HOST`                   | `0.0.0.0`        |
//! | `--port`            | `PORT`                   | `1234`           |
//! | `--allowed-origins` | `MOVIES_ALLOWED_ORIGINS` | four dev origins |
//! | `--seed`            | `MOVIES_SEED_PATH`       | bundled dataset  |
//! | `--stack-size`      | `MOVIES_STACK_SIZE`      | `0x8000`         |
//! | `--log-level`       | `MOVIES_LOG_LEVEL`       | `info`           |
//! | `--log-format`      | `MOVIES_LOG_FORMAT`      | `json`           |
//!
//! Stack sizes accept decimal (`32768`) or hex (`0x8000`).

use std::path::PathBuf;

use clap::Parser;

use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_STACK_SIZE: usize = 0x8000;
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:8080,http://localhost:1234,https://movies.com/,https://midu.dev";

#[derive(Debug, Clone, Parser)]
#[command(name = "movies-api", version, about = "Movie catalogue HTTP service")]
pub struct ServiceConfig {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Comma-separated origins allowed to make cross-origin requests
    #[arg(
        long,
        env = "MOVIES_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_ALLOWED_ORIGINS
    )]
    pub allowed_origins: Vec<String>,

    /// JSON file with the initial movies instead of the bundled dataset
    #[arg(long = "seed", env = "MOVIES_SEED_PATH")]
    pub seed_path: Option<PathBuf>,

    /// Coroutine stack size in bytes
    #[arg(
        long,
        env = "MOVIES_STACK_SIZE",
        value_parser = parse_stack_size,
        default_value = "0x8000"
    )]
    pub stack_size: usize,

    #[arg(long, env = "MOVIES_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "MOVIES_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            include_location: false,
        }
    }

    /// Allowed origins with blanks dropped.
    #[must_use]
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Parse a byte count given in decimal or `0x`-prefixed hex.
pub fn parse_stack_size(raw: &str) -> Result<usize, String> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    match parsed {
        Ok(0) => Err("stack size must be greater than zero".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(format!("invalid stack size '{raw}': {e}")),
    }
}
