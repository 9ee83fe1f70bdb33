use super::*;
use std::time::Instant;

/// Loads the quiz document over HTTP
pub struct HttpFeed {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(client: reqwest::Client, url: String, timeout: Duration) -> Self {
        Self {
            url,
            timeout,
            client,
        }
    }

    fn request_error(&self, e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout(self.timeout)
        } else {
            FeedError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> FeedResult<QuizFeed> {
        let start = Instant::now();

        // Overrides any client-wide timeout and covers the body read too
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let feed: QuizFeed = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout(self.timeout)
            } else {
                FeedError::Parse(e.to_string())
            }
        })?;

        tracing::debug!(
            "Fetched feed from {} in {}ms",
            self.url,
            start.elapsed().as_millis()
        );

        Ok(feed)
    }

    fn name(&self) -> &str {
        &self.url
    }
}
