//! Tests for `TelegramSink`.

use std::sync::Mutex;

use url::Url;

use super::{DeliveryError, NotificationSink, TelegramSink};
use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::site::OwnerId;

/// Mock HTTP client returning one canned reply and recording requests.
#[derive(Debug)]
struct MockClient {
    reply: fn() -> Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(reply: fn() -> Result<HttpResponse, HttpError>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn ok() -> Self {
        Self::new(|| {
            Ok(HttpResponse::new(
                http::StatusCode::OK,
                br#"{"ok":true}"#.to_vec(),
            ))
        })
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        (self.reply)()
    }
}

fn api() -> Url {
    Url::parse("https://api.telegram.org").unwrap()
}

mod endpoint {
    use super::*;

    #[test]
    fn token_becomes_bot_path_segment() {
        let sink = TelegramSink::new(MockClient::ok(), &api(), "123:abc").unwrap();

        assert_eq!(
            sink.endpoint.as_str(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let base = Url::parse("http://localhost:8081/proxy/").unwrap();
        let sink = TelegramSink::new(MockClient::ok(), &base, "t").unwrap();

        assert_eq!(
            sink.endpoint.as_str(),
            "http://localhost:8081/proxy/bott/sendMessage"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let sink = TelegramSink::new(MockClient::ok(), &api(), "123:secret").unwrap();
        let debug = format!("{sink:?}");

        assert!(debug.contains("TelegramSink"));
        assert!(!debug.contains("secret"));
    }
}

mod notify {
    use super::*;

    #[tokio::test]
    async fn posts_chat_id_and_text_as_json() {
        let sink = TelegramSink::new(MockClient::ok(), &api(), "123:abc").unwrap();

        sink.notify(&OwnerId::new("777"), "hello").await.unwrap();

        let requests = sink.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        let body: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": "777", "text": "hello"}));
    }

    #[tokio::test]
    async fn api_error_is_rejected_with_description() {
        let client = MockClient::new(|| {
            Ok(HttpResponse::new(
                http::StatusCode::FORBIDDEN,
                br#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#
                    .to_vec(),
            ))
        });
        let sink = TelegramSink::new(client, &api(), "t").unwrap();

        let err = sink.notify(&OwnerId::new("1"), "x").await.unwrap_err();

        match err {
            DeliveryError::Rejected {
                status,
                description,
            } => {
                assert_eq!(status, http::StatusCode::FORBIDDEN);
                assert_eq!(
                    description.as_deref(),
                    Some("Forbidden: bot was blocked by the user")
                );
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_has_no_description() {
        let client = MockClient::new(|| {
            Ok(HttpResponse::new(
                http::StatusCode::BAD_GATEWAY,
                b"<html>bad gateway</html>".to_vec(),
            ))
        });
        let sink = TelegramSink::new(client, &api(), "t").unwrap();

        let err = sink.notify(&OwnerId::new("1"), "x").await.unwrap_err();

        assert!(matches!(
            err,
            DeliveryError::Rejected {
                description: None,
                ..
            }
        ));
        assert!(err.to_string().contains("no description"));
    }

    #[tokio::test]
    async fn transport_failure_is_http_error() {
        let client = MockClient::new(|| Err(HttpError::Timeout));
        let sink = TelegramSink::new(client, &api(), "t").unwrap();

        let err = sink.notify(&OwnerId::new("1"), "x").await.unwrap_err();

        assert!(matches!(err, DeliveryError::Http(HttpError::Timeout)));
    }
}
