use crate::session::{AnswerOutcome, Quiz, QuizResults, Session, SessionError, SessionEvent};
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    Start,
    /// Sent by whatever input adapter picks an answer (drag-and-drop, click, key)
    SelectOption {
        option_id: OptionId,
    },
    Submit,
    Restart,
}

impl From<ClientMessage> for SessionEvent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Start => SessionEvent::Start,
            ClientMessage::SelectOption { option_id } => SessionEvent::Select(option_id),
            ClientMessage::Submit => SessionEvent::Submit,
            ClientMessage::Restart => SessionEvent::Restart,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        session_id: SessionId,
        question_count: usize,
        max_score: u32,
        /// True when the feed failed and the built-in questions are in use
        from_fallback: bool,
        server_now: String,
    },
    /// Full snapshot, sent after every accepted transition
    Session {
        phase: Phase,
        index: usize,
        total: usize,
        score: u32,
        remaining: u32,
        selected: Option<OptionId>,
        question: Option<QuestionView>,
    },
    Tick {
        remaining: u32,
    },
    Feedback {
        correct: bool,
        points: u32,
        score: u32,
        selected: Option<OptionId>,
        correct_option: Option<OptionId>,
        explanation: String,
        timed_out: bool,
        advance_in_ms: u64,
    },
    Results {
        score: u32,
        max_score: u32,
        percentage: f64,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn snapshot(session: &Session, quiz: &Quiz) -> Self {
        ServerMessage::Session {
            phase: session.phase,
            index: session.index,
            total: quiz.len(),
            score: session.score,
            remaining: session.remaining,
            selected: session.selected,
            question: session.current_question(quiz).map(QuestionView::from),
        }
    }

    pub fn feedback(outcome: &AnswerOutcome, score: u32) -> Self {
        ServerMessage::Feedback {
            correct: outcome.correct,
            points: outcome.points,
            score,
            selected: outcome.selected,
            correct_option: outcome.correct_option,
            explanation: outcome.explanation.clone(),
            timed_out: outcome.timed_out,
            advance_in_ms: outcome.advance_after.as_millis() as u64,
        }
    }

    pub fn results(results: &QuizResults) -> Self {
        ServerMessage::Results {
            score: results.score,
            max_score: results.max_score,
            percentage: results.percentage,
        }
    }

    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }
}

impl From<&SessionError> for ServerMessage {
    fn from(err: &SessionError) -> Self {
        ServerMessage::error(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t": "select_option", "option_id": 4}"#).unwrap();
        assert_eq!(msg, ClientMessage::SelectOption { option_id: 4 });
        assert_eq!(SessionEvent::from(msg), SessionEvent::Select(4));

        let msg: ClientMessage = serde_json::from_str(r#"{"t": "restart"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Restart);

        assert!(serde_json::from_str::<ClientMessage>(r#"{"t": "cheat"}"#).is_err());
    }

    #[test]
    fn test_server_message_tags() {
        let json = serde_json::to_value(ServerMessage::Tick { remaining: 12 }).unwrap();
        assert_eq!(json["t"], "tick");
        assert_eq!(json["remaining"], 12);

        let err = SessionError::NoQuestions;
        let json = serde_json::to_value(ServerMessage::from(&err)).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "NO_QUESTIONS");
    }

    #[test]
    fn test_snapshot_phase_serialization() {
        let quiz = Quiz::new(crate::feed::fallback_questions(), QuizConfig::default());
        let json = serde_json::to_value(ServerMessage::snapshot(&Session::new(), &quiz)).unwrap();

        assert_eq!(json["t"], "session");
        assert_eq!(json["phase"], "NOT_STARTED");
        assert_eq!(json["total"], 5);
        assert!(json["question"].is_null());
    }

    #[test]
    fn test_results_message_wire_format() {
        let results = QuizResults::new(81, 5, &QuizConfig::default());
        let json = serde_json::to_value(ServerMessage::results(&results)).unwrap();

        assert_eq!(json["t"], "results");
        assert_eq!(json["score"], 81);
        assert_eq!(json["max_score"], 75);
        assert!(json["percentage"].as_f64().unwrap() > 100.0);
    }
}
