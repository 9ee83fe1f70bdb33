use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Option identifiers are only unique within their question
pub type OptionId = u64;
pub type SessionId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    NotStarted,
    Active,
    Feedback,
    Complete,
}

/// A single answer choice, as delivered by the feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizOption {
    pub id: OptionId,
    #[serde(rename = "description")]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    #[serde(rename = "description")]
    pub prompt: String,
    pub options: Vec<QuizOption>,
    /// Shown to the user after a wrong answer
    #[serde(rename = "detailed_solution", default)]
    pub explanation: String,
}

impl Question {
    /// The option flagged as correct. Validated feeds always have exactly one.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == id)
    }
}

/// Top-level document served by the upstream feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizFeed {
    pub questions: Vec<Question>,
}

/// Option as shown to the player, without the correctness flag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub text: String,
}

impl From<&QuizOption> for OptionView {
    fn from(option: &QuizOption) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<OptionView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            prompt: question.prompt.clone(),
            options: question.options.iter().map(OptionView::from).collect(),
        }
    }
}

/// Fixed game constants
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Countdown units per question
    pub question_seconds: u32,
    /// Wall-clock length of one countdown unit
    pub tick_interval: Duration,
    pub correct_feedback_delay: Duration,
    pub incorrect_feedback_delay: Duration,
    /// Used only to normalize the results bar
    pub points_per_question: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_seconds: 30,
            tick_interval: Duration::from_secs(1),
            correct_feedback_delay: Duration::from_millis(2000),
            incorrect_feedback_delay: Duration::from_millis(5000),
            points_per_question: 15,
        }
    }
}

impl QuizConfig {
    pub fn feedback_delay(&self, correct: bool) -> Duration {
        if correct {
            self.correct_feedback_delay
        } else {
            self.incorrect_feedback_delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upstream_question() {
        let json = r#"{
            "questions": [{
                "id": 3,
                "description": "What is 2+2?",
                "options": [
                    {"id": 10, "description": "3", "is_correct": false},
                    {"id": 11, "description": "4", "is_correct": true}
                ],
                "detailed_solution": "Two plus two is four",
                "topic": "math"
            }]
        }"#;

        let feed: QuizFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.questions.len(), 1);

        let question = &feed.questions[0];
        assert_eq!(question.prompt, "What is 2+2?");
        assert_eq!(question.explanation, "Two plus two is four");
        assert_eq!(question.correct_option().map(|o| o.id), Some(11));
        assert!(question.has_option(10));
        assert!(!question.has_option(12));
    }

    #[test]
    fn test_question_view_hides_correctness() {
        let question = Question {
            prompt: "Q".to_string(),
            options: vec![QuizOption {
                id: 1,
                text: "A".to_string(),
                is_correct: true,
            }],
            explanation: String::new(),
        };

        let json = serde_json::to_value(QuestionView::from(&question)).unwrap();
        assert!(json["options"][0].get("is_correct").is_none());
        assert_eq!(json["options"][0]["text"], "A");
    }

    #[test]
    fn test_default_quiz_config() {
        let config = QuizConfig::default();
        assert_eq!(config.question_seconds, 30);
        assert_eq!(config.points_per_question, 15);
        assert!(config.feedback_delay(true) < config.feedback_delay(false));
    }
}
