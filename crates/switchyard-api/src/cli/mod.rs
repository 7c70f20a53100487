//! CLI command definitions and dispatch for the `swyd` binary.
//!
//! Uses clap derive macros for argument parsing. Settings resolve in the
//! order flag, environment variable, `switchyard.toml`, built-in default.

pub mod experiment;
pub mod slot;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use switchyard_types::config::{LogFormat, ServiceConfig};

/// Deterministic experiment bucketing and time slot booking.
#[derive(Parser)]
#[command(name = "swyd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the service configuration file.
    #[arg(long, global = true, env = "SWITCHYARD_CONFIG", default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// SQLite connection URL for the slot store.
    #[arg(long, global = true, env = "SWITCHYARD_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Path to the experiment catalog JSON file.
    #[arg(long, global = true, env = "SWITCHYARD_EXPERIMENTS")]
    pub experiments: Option<String>,

    /// Log line format (pretty or json).
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Host to bind to.
        #[arg(long, env = "SWITCHYARD_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "SWITCHYARD_PORT")]
        port: Option<u16>,
    },

    /// Create open time slots for one day (UTC). Existing slots are kept.
    Seed {
        /// Day to seed, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Hour the first slot starts.
        #[arg(long, default_value_t = 9)]
        open: u32,

        /// Hour the last slot ends.
        #[arg(long, default_value_t = 17)]
        close: u32,

        /// Slot length in minutes.
        #[arg(long, default_value_t = 30)]
        minutes: u32,
    },

    /// Show which variant a user is assigned to.
    Assign {
        /// Experiment name.
        experiment: String,

        /// User identifier.
        user_id: String,
    },

    /// List configured experiments and their bucket ranges.
    #[command(alias = "ls")]
    Experiments,

    /// List open time slots.
    Slots {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Slots per page.
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Book a time slot for an email address.
    Book {
        /// Slot id as shown by `swyd slots`.
        slot_id: i64,

        /// Email address to book under.
        email: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Fold flag and environment overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(path) = &self.experiments {
            config.experiments_path = path.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
    }

    /// Default tracing filter for this invocation; `RUST_LOG` still wins.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 if matches!(self.command, Commands::Serve { .. }) => "info",
            0 => "warn",
            1 => "info,switchyard=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "swyd",
            "--database-url",
            "sqlite://other.db",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
        ])
        .unwrap();

        let mut config = ServiceConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(cli.log_directive(), "info");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let cli = Cli::try_parse_from(["swyd", "experiments"]).unwrap();
        let mut config = ServiceConfig::default();
        config.database_url = "sqlite://from-file.db".to_string();
        cli.apply_overrides(&mut config);
        assert_eq!(config.database_url, "sqlite://from-file.db");
        assert_eq!(config.port, ServiceConfig::default().port);
    }

    #[test]
    fn test_log_directive() {
        let quiet = Cli::try_parse_from(["swyd", "--quiet", "slots"]).unwrap();
        assert_eq!(quiet.log_directive(), "error");

        let plain = Cli::try_parse_from(["swyd", "slots"]).unwrap();
        assert_eq!(plain.log_directive(), "warn");

        let debug = Cli::try_parse_from(["swyd", "-vv", "slots"]).unwrap();
        assert_eq!(debug.log_directive(), "trace");
    }

    #[test]
    fn test_seed_arguments() {
        let cli = Cli::try_parse_from(["swyd", "seed", "--date", "2025-09-30", "--minutes", "60"])
            .unwrap();
        match cli.command {
            Commands::Seed {
                date,
                open,
                close,
                minutes,
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 30));
                assert_eq!((open, close, minutes), (9, 17, 60));
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::try_parse_from(["swyd", "--log-format", "json", "slots"]).unwrap();
        let mut config = ServiceConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
