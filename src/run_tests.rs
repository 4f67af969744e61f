//! Tests for the run module.

use super::*;

use std::time::Duration;

use itsalive::site::SiteStatus;
use url::Url;

fn site(id: u64, owner: &str, url: &str, status: SiteStatus) -> Site {
    Site {
        id: SiteId(id),
        owner_id: OwnerId::new(owner),
        url: Url::parse(url).unwrap(),
        status,
        last_checked_at: None,
    }
}

mod run_error {
    use super::*;

    #[test]
    fn unknown_site_names_the_id() {
        let error = RunError::UnknownSite(SiteId(7));
        assert_eq!(error.to_string(), "No site with id 7");
    }

    #[test]
    fn sweep_failed_shows_status() {
        let error = RunError::SweepFailed(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn invalid_site_wraps_url_error() {
        let url_error = NewSite::parse(OwnerId::new("1"), "ftp://example.com").unwrap_err();
        let error = RunError::from(url_error);

        assert!(error.to_string().starts_with("Invalid site URL"));
        assert!(error.to_string().contains("ftp"));
    }

    #[test]
    fn store_error_converts() {
        let error = RunError::from(StoreError::NotFound(SiteId(3)));
        assert!(matches!(error, RunError::Store(_)));
    }
}

mod formatting {
    use super::*;

    #[test]
    fn confirmation_mentions_url() {
        let site = site(4, "1", "https://example.com", SiteStatus::NotChecked);

        let text = format_confirmation(&site);

        assert!(text.starts_with("I will check for you if https://example.com/ it's alive 🤓"));
        assert!(text.contains("id 4"));
    }

    #[test]
    fn empty_list_suggests_add() {
        assert_eq!(
            format_site_list(&[]),
            "You are not tracking any website, use add to add the first one\n"
        );
    }

    #[test]
    fn list_shows_one_line_per_site_with_emoji() {
        let mut checked = site(2, "9", "https://b.example", SiteStatus::Down);
        checked.last_checked_at = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        let sites = vec![
            site(1, "9", "https://a.example", SiteStatus::Online),
            checked,
            site(3, "9", "https://c.example", SiteStatus::NotChecked),
        ];

        let output = format_site_list(&sites);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "1 https://a.example/ ✅ (owner 9, last checked: never)"
        );
        assert_eq!(
            lines[1],
            "2 https://b.example/ 🚨 (owner 9, last checked: 2023-11-14T22:13:20Z)"
        );
        assert!(lines[2].contains('⏳'));
    }
}

mod sink_selection {
    use super::*;
    use itsalive::config::Cli;

    fn config(args: &[&str]) -> ValidatedConfig {
        let mut full_args = vec!["itsalive"];
        full_args.extend(args);
        ValidatedConfig::from_raw(&Cli::parse_from_iter(full_args), None).unwrap()
    }

    #[test]
    fn dry_run_logs_even_with_token() {
        let config = config(&["--bot-token", "1:a", "--dry-run", "sweep"]);

        assert!(matches!(create_sink(&config), Ok(AppSink::DryRun(_))));
    }

    #[test]
    fn token_selects_telegram() {
        let config = config(&["--bot-token", "1:a", "sweep"]);

        assert!(matches!(create_sink(&config), Ok(AppSink::Telegram(_))));
    }

    #[tokio::test]
    async fn dry_run_sink_accepts_everything() {
        let sink = AppSink::DryRun(LogSink);

        assert!(sink.notify(&OwnerId::new("1"), "hello").await.is_ok());
    }

    #[test]
    fn trigger_uses_configured_timeout() {
        let config = config(&["--dry-run", "--timeout", "7", "sweep"]);

        let trigger = create_trigger(FileSiteStore::new("unused.json"), config).unwrap();

        assert_eq!(trigger.runner().probe_timeout(), Duration::from_secs(7));
    }
}
