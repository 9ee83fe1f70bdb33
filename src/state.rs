use crate::config::AppConfig;
use crate::feed::{FeedSource, HttpFeed};
use crate::types::QuizConfig;
use std::sync::Arc;

/// Shared application state. Sessions are per connection and live in their
/// socket task; only read-only collaborators are shared here.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub quiz_config: QuizConfig,
    /// Client used by the passthrough for upstream requests
    pub http: reqwest::Client,
    /// Source each new session loads its questions from
    pub feed: Arc<dyn FeedSource>,
}

impl AppState {
    /// Build state with an HTTP feed pointed at `config.feed_url`
    pub fn new(config: AppConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        let feed = Arc::new(HttpFeed::new(
            http.clone(),
            config.feed_url.clone(),
            config.fetch_timeout,
        ));
        Ok(Self::with_feed(config, http, feed))
    }

    pub fn with_feed(config: AppConfig, http: reqwest::Client, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            config,
            quiz_config: QuizConfig::default(),
            http,
            feed,
        }
    }
}
