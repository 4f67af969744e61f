//! TOML configuration file parsing.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Telegram delivery section
    #[serde(default)]
    pub telegram: TelegramSection,

    /// Probe section
    #[serde(default)]
    pub probe: ProbeSection,

    /// Watch loop section
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Site store section
    #[serde(default)]
    pub store: StoreSection,

    /// Notification texts
    #[serde(default)]
    pub messages: MessagesSection,
}

/// Telegram delivery configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramSection {
    /// Bot token
    pub bot_token: Option<String>,

    /// Bot API base URL (default: `https://api.telegram.org`)
    pub api_base: Option<String>,
}

/// Probe configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Probe timeout in seconds
    pub timeout: Option<u64>,
}

/// Watch loop configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Seconds between sweeps
    pub interval: Option<u64>,
}

/// Site store configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Path of the JSON store file; `~` expands to the home directory
    pub path: Option<String>,
}

/// Notification text templates.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesSection {
    /// Sent when a site goes down
    pub down: Option<String>,

    /// Sent when a site comes back online
    pub recovered: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# itsalive configuration file

[telegram]
# Bot token from @BotFather (required for sweep/watch unless --dry-run)
# bot_token = "123456:ABC-DEF"

# Bot API base URL (default: https://api.telegram.org)
# api_base = "https://api.telegram.org"

[probe]
# Seconds a site has to answer a HEAD request (default: 5)
timeout = 5

[monitor]
# Seconds between sweeps in watch mode (default: 300)
interval = 300

[store]
# Site store file (default: <data dir>/itsalive/sites.json)
# path = "~/.local/share/itsalive/sites.json"

[messages]
# Handlebars templates; available variables: {{url}}, {{owner}}
# down = "{{url}} it's down 🚨"
# recovered = "{{url}} it's back online ✅"
"#
    .to_string()
}
