//! Validated configuration after merging CLI and TOML sources.
//!
//! All validation is performed during construction; a [`ValidatedConfig`]
//! is ready to wire the application together.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::notify::MessageTemplates;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Telegram delivery settings.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_base: Url,
    /// Bot token
    pub bot_token: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base.as_str())
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Site store file
    pub store_path: PathBuf,

    /// Hard bound for a single probe
    pub probe_timeout: Duration,

    /// Interval between sweeps in watch mode
    pub interval: Duration,

    /// Telegram delivery; `None` when no token was configured
    pub telegram: Option<TelegramConfig>,

    /// Compiled notification texts
    pub messages: MessageTemplates,

    /// Dry-run mode (log notifications without sending them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let telegram = self
            .telegram
            .as_ref()
            .map_or_else(|| "none".to_string(), |t| t.api_base.to_string());

        write!(
            f,
            "Config {{ store: {}, probe_timeout: {}s, interval: {}s, telegram: {}, dry_run: {} }}",
            self.store_path.display(),
            self.probe_timeout.as_secs(),
            self.interval.as_secs(),
            telegram,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bot token is missing for a notifying command (and not dry-run)
    /// - The bot token or API base URL is invalid
    /// - A duration is zero
    /// - A message template does not compile
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let telegram = Self::resolve_telegram(cli, toml)?;

        if telegram.is_none() && cli.sends_notifications() && !cli.dry_run {
            return Err(ConfigError::missing(
                field::BOT_TOKEN,
                "Use --bot-token or set telegram.bot_token in config file (or pass --dry-run)",
            ));
        }

        let probe_timeout = Self::resolve_seconds(
            "probe.timeout",
            cli.timeout,
            toml.and_then(|t| t.probe.timeout),
            defaults::PROBE_TIMEOUT_SECS,
        )?;

        let interval = Self::resolve_seconds(
            "monitor.interval",
            cli.watch_interval(),
            toml.and_then(|t| t.monitor.interval),
            defaults::SWEEP_INTERVAL_SECS,
        )?;

        Ok(Self {
            store_path: Self::resolve_store_path(cli, toml),
            probe_timeout,
            interval,
            telegram,
            messages: Self::resolve_messages(toml)?,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_telegram(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<TelegramConfig>, ConfigError> {
        let Some(token) = cli
            .bot_token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.telegram.bot_token.as_deref()))
        else {
            return Ok(None);
        };

        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::InvalidToken {
                reason: "must not be empty".to_string(),
            });
        }
        if token.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidToken {
                reason: "must not contain whitespace".to_string(),
            });
        }

        let api_base_str = toml
            .and_then(|t| t.telegram.api_base.as_deref())
            .unwrap_or(defaults::TELEGRAM_API_BASE);
        let api_base = Url::parse(api_base_str).map_err(|e| ConfigError::InvalidUrl {
            url: api_base_str.to_string(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: api_base_str.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        Ok(Some(TelegramConfig {
            api_base,
            bot_token: token.to_string(),
        }))
    }

    fn resolve_seconds(
        name: &'static str,
        cli: Option<u64>,
        toml: Option<u64>,
        default: u64,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli.or(toml).unwrap_or(default);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: name,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_store_path(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        if let Some(ref path) = cli.store {
            return path.clone();
        }

        toml.and_then(|t| t.store.path.as_deref())
            .map_or_else(defaults::store_path, expand_tilde)
    }

    fn resolve_messages(toml: Option<&TomlConfig>) -> Result<MessageTemplates, ConfigError> {
        let messages = toml.map(|t| &t.messages);
        let down = messages
            .and_then(|m| m.down.as_deref())
            .unwrap_or(MessageTemplates::DEFAULT_DOWN);
        let recovered = messages
            .and_then(|m| m.recovered.as_deref())
            .unwrap_or(MessageTemplates::DEFAULT_RECOVERED);

        MessageTemplates::new(down, recovered)
            .map_err(|reason| ConfigError::InvalidTemplate { reason })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expands a leading `~/` to the home directory.
///
/// Paths without the prefix, or platforms without a home directory, are
/// returned unchanged.
fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
