//! Tests for validated configuration.

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use super::ConfigError;
use super::cli::Cli;
use super::defaults;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["itsalive"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod required_fields {
    use super::*;

    #[test]
    fn sweep_without_token_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sweep"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "bot_token",
                ..
            })
        ));
    }

    #[test]
    fn default_command_without_token_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&[]), None);

        assert!(matches!(result, Err(ConfigError::MissingRequired { .. })));
    }

    #[test]
    fn dry_run_does_not_need_token() {
        let config = ValidatedConfig::from_raw(&cli(&["sweep", "--dry-run"]), None).unwrap();

        assert!(config.telegram.is_none());
        assert!(config.dry_run);
    }

    #[test]
    fn store_commands_do_not_need_token() {
        for args in [
            &["list"][..],
            &["add", "--owner", "1", "https://example.com"],
            &["remove", "3"],
        ] {
            assert!(ValidatedConfig::from_raw(&cli(args), None).is_ok());
        }
    }

    #[test]
    fn token_from_toml() {
        let toml = toml("[telegram]\nbot_token = \"123:abc\"");

        let config = ValidatedConfig::from_raw(&cli(&["sweep"]), Some(&toml)).unwrap();
        let telegram = config.telegram.unwrap();

        assert_eq!(telegram.bot_token, "123:abc");
        assert_eq!(telegram.api_base.as_str(), "https://api.telegram.org/");
    }
}

mod validation {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--bot-token", "  ", "sweep"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidToken { .. })));
    }

    #[test]
    fn token_with_whitespace_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--bot-token", "12 3:abc", "sweep"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidToken { .. })));
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        let toml = toml("[telegram]\nbot_token = \"1:a\"\napi_base = \"not a url\"");

        let result = ValidatedConfig::from_raw(&cli(&["sweep"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--timeout", "0", "list"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "probe.timeout",
                ..
            })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let toml = toml("[monitor]\ninterval = 0");

        let result = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "monitor.interval",
                ..
            })
        ));
    }

    #[test]
    fn broken_template_is_rejected() {
        let toml = toml("[messages]\ndown = \"{{#if url}}\"");

        let result = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml));

        match result {
            Err(ConfigError::InvalidTemplate { reason }) => {
                assert!(reason.starts_with("down template"));
            }
            other => panic!("expected InvalidTemplate, got {other:?}"),
        }
    }
}

mod precedence {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let config = ValidatedConfig::from_raw(&cli(&["list"]), None).unwrap();

        assert_eq!(config.probe_timeout, defaults::probe_timeout());
        assert_eq!(config.interval, defaults::sweep_interval());
        assert_eq!(config.store_path, defaults::store_path());
    }

    #[test]
    fn cli_overrides_toml() {
        let toml = toml(
            r#"
            [telegram]
            bot_token = "toml-token"

            [probe]
            timeout = 9

            [monitor]
            interval = 120

            [store]
            path = "/var/lib/toml.json"
        "#,
        );
        let cli = cli(&[
            "--bot-token",
            "cli-token",
            "--timeout",
            "2",
            "--store",
            "/tmp/cli.json",
            "watch",
            "--interval",
            "30",
        ]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.telegram.unwrap().bot_token, "cli-token");
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.store_path, PathBuf::from("/tmp/cli.json"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = toml(
            r#"
            [probe]
            timeout = 9

            [monitor]
            interval = 120

            [store]
            path = "/var/lib/toml.json"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert_eq!(config.probe_timeout, Duration::from_secs(9));
        assert_eq!(config.interval, Duration::from_secs(120));
        assert_eq!(config.store_path, PathBuf::from("/var/lib/toml.json"));
    }

    #[test]
    fn toml_store_path_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let toml = toml("[store]\npath = \"~/itsalive/sites.json\"");

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert_eq!(config.store_path, home.join("itsalive/sites.json"));
    }
}

mod display {
    use super::*;

    #[test]
    fn token_never_shown() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--bot-token", "123:secret", "sweep"]), None).unwrap();

        assert!(!config.to_string().contains("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_reads_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itsalive.toml");
        std::fs::write(&path, "[probe]\ntimeout = 4").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = ValidatedConfig::load(&cli(&["--config", &path_str, "list"])).unwrap();

        assert_eq!(config.probe_timeout, Duration::from_secs(4));
    }

    #[test]
    fn load_missing_file_is_error() {
        let result = ValidatedConfig::load(&cli(&["--config", "/nonexistent/x.toml", "list"]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn written_default_config_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itsalive.toml");

        write_default_config(&path).unwrap();
        let path_str = path.to_string_lossy().to_string();
        let config = ValidatedConfig::load(&cli(&["--config", &path_str, "--dry-run"])).unwrap();

        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.interval, Duration::from_secs(300));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let result = write_default_config(std::path::Path::new("/nonexistent/dir/x.toml"));

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
