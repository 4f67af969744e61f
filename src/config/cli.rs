//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// itsalive: website reachability monitor
///
/// Checks registered websites and notifies their owners on Telegram when a
/// site goes down or comes back online.
#[derive(Debug, Parser)]
#[command(name = "itsalive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the site store file
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Telegram bot token used to send notifications
    #[arg(long = "bot-token", global = true)]
    pub bot_token: Option<String>,

    /// Probe timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log notifications instead of sending them
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for itsalive
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "itsalive.toml")]
        output: PathBuf,
    },

    /// Run one sweep now and print its summary
    Sweep,

    /// Run a sweep on a fixed interval until interrupted
    Watch {
        /// Seconds between sweeps
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Register a site for an owner
    Add {
        /// Owner id (Telegram chat id) that receives notifications
        #[arg(long)]
        owner: String,

        /// Absolute http(s) URL of the site
        url: String,
    },

    /// List tracked sites and their last status
    List {
        /// Only show sites of this owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Stop tracking a site
    Remove {
        /// Site id as shown by `list`
        id: u64,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if the selected command may send notifications.
    #[must_use]
    pub const fn sends_notifications(&self) -> bool {
        matches!(
            self.command,
            None | Some(Command::Sweep | Command::Watch { .. })
        )
    }

    /// Returns the `--interval` given to `watch`, if any.
    #[must_use]
    pub const fn watch_interval(&self) -> Option<u64> {
        match self.command {
            Some(Command::Watch { interval }) => interval,
            _ => None,
        }
    }
}
