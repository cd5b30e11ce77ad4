use rand::Rng;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

use super::RetryPolicy;

/// Why a page could not be fetched. Rate limiting is only reported after
/// the retry budget is exhausted; other failures are immediate.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },
    #[error("http error {status}: {url}")]
    Http { url: String, status: u16 },
    #[error("network error fetching {url}")]
    Network {
        url: String,
        #[source]
        source: wreq::Error,
    },
}

/// Uniform random cool-down range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub fn sample(&self) -> Duration {
        let secs = if self.max_secs > self.min_secs {
            rand::thread_rng().gen_range(self.min_secs..=self.max_secs)
        } else {
            self.min_secs
        };
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Polite inter-request delay. A successful fetch schedules a cool-down
/// that is awaited before the *next* request, not charged to the call that
/// scheduled it.
#[derive(Debug, Default)]
pub struct Throttle {
    pending: Option<Duration>,
}

impl Throttle {
    pub async fn pause(&mut self) {
        if let Some(delay) = self.pending.take() {
            debug!("Rate limiter sleeping {:?} before next request", delay);
            sleep(delay).await;
        }
    }

    pub fn schedule(&mut self, range: &DelayRange) {
        self.pending = Some(range.sample());
    }
}

enum PageKind {
    Listing,
    Detail,
}

enum GetOutcome {
    Body(String),
    RateLimited,
}

/// Issues sequential GET requests with a browser-like identity, bounded
/// 429 backoff and a shared politeness throttle.
pub struct PageFetcher {
    client: Client,
    policy: RetryPolicy,
    throttle: Throttle,
    listing_delay: DelayRange,
    detail_delay: DelayRange,
}

impl PageFetcher {
    pub fn new(
        policy: RetryPolicy,
        listing_delay: DelayRange,
        detail_delay: DelayRange,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().emulation(Emulation::Firefox136).build()?;
        Ok(PageFetcher {
            client,
            policy,
            throttle: Throttle::default(),
            listing_delay,
            detail_delay,
        })
    }

    pub async fn fetch_listing(&mut self, url: &str) -> Result<Html, FetchError> {
        self.fetch(url, PageKind::Listing).await
    }

    pub async fn fetch_detail(&mut self, url: &str) -> Result<Html, FetchError> {
        self.fetch(url, PageKind::Detail).await
    }

    async fn fetch(&mut self, url: &str, kind: PageKind) -> Result<Html, FetchError> {
        self.throttle.pause().await;

        for attempt in 0..self.policy.max_attempts {
            match self.get_once(url).await? {
                GetOutcome::Body(body) => {
                    let range = match kind {
                        PageKind::Listing => &self.listing_delay,
                        PageKind::Detail => &self.detail_delay,
                    };
                    self.throttle.schedule(range);
                    debug!("Fetched {} characters from {}", body.len(), url);
                    return Ok(Html::parse_document(&body));
                }
                GetOutcome::RateLimited => {
                    if attempt + 1 < self.policy.max_attempts {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            "Rate limited on {} (attempt {}), backing off {:?}",
                            url,
                            attempt + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(FetchError::RateLimited {
            url: url.to_string(),
            attempts: self.policy.max_attempts,
        })
    }

    async fn get_once(&self, url: &str) -> Result<GetOutcome, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Ok(GetOutcome::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;
        Ok(GetOutcome::Body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_range_sample_within_bounds() {
        let range = DelayRange {
            min_secs: 1.0,
            max_secs: 3.0,
        };
        for _ in 0..50 {
            let sampled = range.sample();
            assert!(sampled >= Duration::from_secs_f64(1.0));
            assert!(sampled <= Duration::from_secs_f64(3.0));
        }
    }

    #[test]
    fn test_degenerate_delay_range() {
        let range = DelayRange {
            min_secs: 2.0,
            max_secs: 2.0,
        };
        assert_eq!(range.sample(), Duration::from_secs_f64(2.0));
    }

    #[tokio::test]
    async fn test_throttle_consumes_pending_delay() {
        let mut throttle = Throttle::default();
        throttle.schedule(&DelayRange {
            min_secs: 0.0,
            max_secs: 0.0,
        });
        assert!(throttle.pending.is_some());
        throttle.pause().await;
        assert!(throttle.pending.is_none());
        // A second pause with nothing scheduled returns immediately.
        throttle.pause().await;
    }
}
