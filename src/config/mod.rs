//! Configuration layer for itsalive.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! The Telegram bot token has no default. It is required by the commands
//! that may notify (`sweep`, `watch`, and running without a subcommand)
//! unless `--dry-run` is set.
//!
//! # Boolean Flag Semantics
//!
//! `--dry-run` and `--verbose` are CLI-only and only ever enable behavior.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{TelegramConfig, ValidatedConfig, write_default_config};
