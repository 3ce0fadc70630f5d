//! Remote fetcher: one logical download as a request/redirect/retry loop.
//!
//! The transport never follows redirects on its own (unless explicitly
//! configured to); each response is inspected by the redirect resolver so
//! meta-refresh redirects are honored alongside 302s. Timeouts consume the
//! retry budget with exponential backoff; redirect hops do not.

use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::mime;

use super::error::FetchError;
use super::options::FetchOptions;
use super::redirect::{self, RedirectDecision};
use super::retry;

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of a successful fetch: the terminal URL, its MIME type, and the
/// fully buffered body.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// URL of the terminal 200 response, after all redirect hops.
    pub final_url: Url,
    /// Resolved MIME type (final URL extension first, then `Content-Type`).
    pub mime_type: String,
    /// The complete response body.
    pub body: Vec<u8>,
}

/// Outcome of a single request attempt within the fetch loop.
enum Attempt {
    Success { mime_type: String, body: Vec<u8> },
    Redirect(String),
    TimedOut,
    Failed(FetchError),
}

/// Fetches remote files over HTTP with manual redirect handling and
/// timeout retries.
///
/// Designed to be created once per configuration and reused; the underlying
/// client pools connections.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: Client,
    options: FetchOptions,
}

impl Default for RemoteFetcher {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

impl RemoteFetcher {
    /// Creates a fetcher from the given options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(options: FetchOptions) -> Self {
        let policy = if options.follow_redirects {
            Policy::limited(options.max_redirects as usize)
        } else {
            Policy::none()
        };
        let client = Client::builder()
            .connect_timeout(options.connect_timeout())
            .timeout(options.recv_timeout())
            .redirect(policy)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client, options }
    }

    /// Fetches `url`, following redirects and retrying timeouts, until a
    /// terminal 200 response is buffered or the attempt is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the URL is malformed, the retry budget is
    /// exhausted on timeouts, the redirect hop limit is exceeded, or the
    /// transport fails / returns an unexpected status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let mut current = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        let mut tries_used: u32 = 0;
        let mut redirects: u32 = 0;

        loop {
            match self.attempt(&current).await {
                Attempt::Success { mime_type, body } => {
                    debug!(final_url = %current, mime = %mime_type, bytes = body.len(), "fetch complete");
                    return Ok(FetchOutcome {
                        final_url: current,
                        mime_type,
                        body,
                    });
                }
                Attempt::Redirect(target) => {
                    redirects += 1;
                    if redirects > self.options.max_redirects {
                        warn!(limit = self.options.max_redirects, "redirect limit exceeded");
                        return Err(FetchError::too_many_redirects(
                            url,
                            self.options.max_redirects,
                        ));
                    }
                    // Targets may be relative; join against the URL that
                    // produced the response.
                    current = current
                        .join(&target)
                        .map_err(|_| FetchError::invalid_url(target))?;
                }
                Attempt::TimedOut => {
                    if !retry::should_retry(tries_used, self.options.max_retries) {
                        return Err(FetchError::timeout(current.as_str(), tries_used + 1));
                    }
                    tries_used += 1;
                    let delay = retry::backoff_delay(
                        tries_used,
                        self.options.backoff_factor(),
                        self.options.backoff_max(),
                    );
                    debug!(
                        tries_used,
                        delay_ms = delay.as_millis(),
                        "attempt timed out; backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                }
                Attempt::Failed(error) => return Err(error),
            }
        }
    }

    /// Issues one GET and classifies the result.
    async fn attempt(&self, current: &Url) -> Attempt {
        let response = match self.client.get(current.clone()).send().await {
            Ok(response) => response,
            Err(error) if error.is_timeout() => return Attempt::TimedOut,
            Err(error) => return Attempt::Failed(FetchError::network(current.as_str(), error)),
        };

        let status = response.status().as_u16();
        match redirect::resolve_redirect(status, response.headers()) {
            RedirectDecision::FollowLocation(target) => {
                debug!(status, %target, "following Location redirect");
                Attempt::Redirect(target)
            }
            RedirectDecision::FollowRefresh(target) => {
                debug!(status, %target, "following Refresh redirect");
                Attempt::Redirect(target)
            }
            RedirectDecision::None if status == 200 => {
                let headers = response.headers().clone();
                match response.bytes().await {
                    Ok(body) => {
                        let mime_type = mime::known_extension(current.path())
                            .map(str::to_string)
                            .or_else(|| mime::from_headers(&headers))
                            .unwrap_or_else(|| mime::FALLBACK_MIME.to_string());
                        Attempt::Success {
                            mime_type,
                            body: body.to_vec(),
                        }
                    }
                    Err(error) if error.is_timeout() => Attempt::TimedOut,
                    Err(error) => {
                        Attempt::Failed(FetchError::network(current.as_str(), error))
                    }
                }
            }
            RedirectDecision::None => {
                Attempt::Failed(FetchError::http_status(current.as_str(), status))
            }
        }
    }
}
