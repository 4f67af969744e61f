//! Telegram Bot API notification sink.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{HttpClient, HttpRequest};
use crate::site::OwnerId;

use super::{DeliveryError, NotificationSink};

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;

/// Delivers notifications with the Bot API `sendMessage` method.
///
/// The owner id is used as the `chat_id`. The bot token is part of the
/// endpoint URL and is never printed by `Debug`.
///
/// # Example
///
/// ```
/// use itsalive::http::ReqwestClient;
/// use itsalive::notify::TelegramSink;
/// use url::Url;
///
/// let api = Url::parse("https://api.telegram.org").unwrap();
/// let sink = TelegramSink::new(ReqwestClient::new(), &api, "123:abc").unwrap();
/// assert!(!format!("{sink:?}").contains("123:abc"));
/// ```
pub struct TelegramSink<H> {
    client: H,
    endpoint: Url,
}

/// `sendMessage` request body.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Error body returned by the Bot API.
#[derive(Deserialize)]
struct ApiReply {
    description: Option<String>,
}

impl<H> TelegramSink<H> {
    /// Creates a sink posting to `{api_base}/bot{token}/sendMessage`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base` cannot carry a path (e.g. `mailto:`).
    pub fn new(client: H, api_base: &Url, token: &str) -> Result<Self, url::ParseError> {
        let mut endpoint = api_base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&format!("bot{token}"))
            .push("sendMessage");

        Ok(Self { client, endpoint })
    }
}

impl<H> fmt::Debug for TelegramSink<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSink")
            .field("host", &self.endpoint.host_str())
            .finish_non_exhaustive()
    }
}

impl<H: HttpClient> NotificationSink for TelegramSink<H> {
    async fn notify(&self, owner: &OwnerId, text: &str) -> Result<(), DeliveryError> {
        let payload = SendMessage {
            chat_id: owner.as_str(),
            text,
        };
        let request = HttpRequest::post_json(self.endpoint.clone(), &payload)?;

        let response = self.client.request(request).await?;
        if response.is_success() {
            return Ok(());
        }

        let description = response
            .body_text()
            .and_then(|body| serde_json::from_str::<ApiReply>(body).ok())
            .and_then(|reply| reply.description);

        Err(DeliveryError::Rejected {
            status: response.status,
            description,
        })
    }
}
