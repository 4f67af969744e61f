//! Site reachability probing.
//!
//! A probe answers one question: did the site respond with a 2xx status
//! within the timeout? Every failure mode collapses into `false`.

use std::time::Duration;

use url::Url;

use crate::http::{HttpClient, HttpRequest};

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;

/// Performs reachability checks against site URLs.
///
/// Implementations must never fail: DNS errors, refused connections,
/// timeouts and non-success statuses are all reported as `false`.
pub trait Prober: Send + Sync {
    /// Returns `true` iff `url` answered with a success status within `timeout`.
    fn probe(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> impl std::future::Future<Output = bool> + Send;
}

/// Prober that issues a HEAD request through an [`HttpClient`].
///
/// The timeout is passed to the client and also enforced around the whole
/// call, so a client that ignores it still cannot stall a sweep.
#[derive(Debug, Clone)]
pub struct HttpProber<H> {
    client: H,
}

impl<H> HttpProber<H> {
    /// Creates a prober backed by `client`.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self { client }
    }
}

impl<H: HttpClient> Prober for HttpProber<H> {
    async fn probe(&self, url: &Url, timeout: Duration) -> bool {
        let request = HttpRequest::head(url.clone()).with_timeout(timeout);

        match tokio::time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) if response.is_success() => true,
            Ok(Ok(response)) => {
                tracing::debug!("Probe of {url} returned status {}", response.status);
                false
            }
            Ok(Err(e)) => {
                tracing::debug!("Probe of {url} failed: {e}");
                false
            }
            Err(_) => {
                tracing::debug!("Probe of {url} exceeded {}ms", timeout.as_millis());
                false
            }
        }
    }
}
