mod fallback;
mod http;

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::types::{Question, QuizFeed};

pub use fallback::fallback_questions;
pub use http::HttpFeed;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur while loading the quiz feed
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Feed returned status: {0}")]
    Status(u16),

    #[error("Response parsing failed: {0}")]
    Parse(String),

    #[error("Invalid feed: {0}")]
    Invalid(String),
}

/// Anything that can produce a quiz document
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> FeedResult<QuizFeed>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

/// Where a loaded question set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrigin {
    Feed,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub origin: QuestionOrigin,
}

/// Load the question list, substituting the built-in set on any failure.
/// Makes exactly one attempt and never returns an error.
pub async fn load_questions(source: &dyn FeedSource) -> LoadedQuestions {
    let result = match source.fetch().await {
        Ok(feed) => validate_feed(&feed).map(|_| feed),
        Err(e) => Err(e),
    };

    match result {
        Ok(feed) => {
            tracing::info!(
                "Loaded {} questions from {}",
                feed.questions.len(),
                source.name()
            );
            LoadedQuestions {
                questions: feed.questions,
                origin: QuestionOrigin::Feed,
            }
        }
        Err(e) => {
            tracing::warn!("Using fallback data due to feed error: {}", e);
            LoadedQuestions {
                questions: fallback_questions(),
                origin: QuestionOrigin::Fallback,
            }
        }
    }
}

/// Check that a feed can drive a session
pub fn validate_feed(feed: &QuizFeed) -> FeedResult<()> {
    if feed.questions.is_empty() {
        return Err(FeedError::Invalid("feed contains no questions".to_string()));
    }

    for (index, question) in feed.questions.iter().enumerate() {
        if question.prompt.trim().is_empty() {
            return Err(FeedError::Invalid(format!(
                "question {} has an empty prompt",
                index
            )));
        }

        if question.options.len() < 2 {
            return Err(FeedError::Invalid(format!(
                "question {} needs at least two options",
                index
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = question.options.iter().find(|o| !seen.insert(o.id)) {
            return Err(FeedError::Invalid(format!(
                "question {} repeats option id {}",
                index, dup.id
            )));
        }

        let correct = question.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(FeedError::Invalid(format!(
                "question {} has {} correct options, expected exactly one",
                index, correct
            )));
        }
    }

    Ok(())
}
