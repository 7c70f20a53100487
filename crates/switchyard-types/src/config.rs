//! Service configuration for Switchyard.
//!
//! `ServiceConfig` mirrors `switchyard.toml`. Every field has a default so an
//! empty (or absent) file yields a runnable local setup.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::slot::DEFAULT_MAX_PAGE_SIZE;

/// Top-level configuration for the Switchyard services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite URL for the slot store.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Path to the static experiments JSON file.
    #[serde(default = "default_experiments_path")]
    pub experiments_path: String,

    /// Upper bound on `page_size` when listing slots.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Deadline for a single booking transaction.
    #[serde(default = "default_booking_timeout_ms")]
    pub booking_timeout_ms: u64,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Export spans through the OpenTelemetry stdout exporter.
    #[serde(default)]
    pub enable_otel: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite://switchyard.db?mode=rwc".to_string()
}

fn default_experiments_path() -> String {
    "config/experiments.json".to_string()
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_booking_timeout_ms() -> u64 {
    5_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            experiments_path: default_experiments_path(),
            max_page_size: default_max_page_size(),
            booking_timeout_ms: default_booking_timeout_ms(),
            log_format: LogFormat::default(),
            enable_otel: false,
        }
    }
}

impl ServiceConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format: '{other}'")),
        }
    }
}
