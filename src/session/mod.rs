//! Quiz session state machine.
//!
//! `Session` is a plain value. Every transition borrows the current value and
//! returns the next one, or a `SessionError` that leaves the caller's value
//! untouched:
//!
//! NOT_STARTED -> ACTIVE -> FEEDBACK -> (ACTIVE | COMPLETE), COMPLETE -> NOT_STARTED

mod controller;
mod scoring;
mod timer;

use std::time::Duration;

use crate::types::{OptionId, Phase, Question, QuizConfig};

pub use controller::{SessionController, SessionEvent};
pub use scoring::{max_possible_score, score_percentage, time_bonus, QuizResults};
pub use timer::TimerHandle;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while session is {phase:?}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("Option {0} does not belong to the current question")]
    UnknownOption(OptionId),

    #[error("Quiz has no questions")]
    NoQuestions,
}

impl SessionError {
    /// Stable code for client-facing error messages
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidPhase { .. } => "INVALID_PHASE",
            SessionError::UnknownOption(_) => "UNKNOWN_OPTION",
            SessionError::NoQuestions => "NO_QUESTIONS",
        }
    }
}

/// Loaded questions plus the constants a session is played with
#[derive(Debug, Clone)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub config: QuizConfig,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, config: QuizConfig) -> Self {
        Self { questions, config }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn max_score(&self) -> u32 {
        max_possible_score(self.len(), &self.config)
    }
}

/// State of one quiz attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    /// 0-based, never past the last question
    pub index: usize,
    pub score: u32,
    /// Countdown units left for the current question
    pub remaining: u32,
    /// Pending answer; cleared whenever the index moves
    pub selected: Option<OptionId>,
}

/// How a submitted answer was judged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points: u32,
    pub selected: Option<OptionId>,
    pub correct_option: Option<OptionId>,
    pub explanation: String,
    /// True when the countdown ran out rather than an explicit submit
    pub timed_out: bool,
    /// Time to stay in FEEDBACK before advancing
    pub advance_after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(Session),
    Expired(Session, AnswerOutcome),
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            index: 0,
            score: 0,
            remaining: 0,
            selected: None,
        }
    }

    fn require(&self, phase: Phase, action: &'static str) -> SessionResult<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// The question being shown, if any
    pub fn current_question<'a>(&self, quiz: &'a Quiz) -> Option<&'a Question> {
        match self.phase {
            Phase::Active | Phase::Feedback => quiz.questions.get(self.index),
            Phase::NotStarted | Phase::Complete => None,
        }
    }

    pub fn is_last_question(&self, quiz: &Quiz) -> bool {
        self.index + 1 >= quiz.len()
    }

    pub fn start(&self, quiz: &Quiz) -> SessionResult<Session> {
        self.require(Phase::NotStarted, "start")?;
        if quiz.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        Ok(Session {
            phase: Phase::Active,
            index: 0,
            score: 0,
            remaining: quiz.config.question_seconds,
            selected: None,
        })
    }

    /// Record a pending answer. Repeated calls overwrite.
    pub fn select_option(&self, quiz: &Quiz, option_id: OptionId) -> SessionResult<Session> {
        self.require(Phase::Active, "select an option")?;
        let question = self
            .current_question(quiz)
            .ok_or(SessionError::NoQuestions)?;
        if !question.has_option(option_id) {
            return Err(SessionError::UnknownOption(option_id));
        }

        Ok(Session {
            selected: Some(option_id),
            ..self.clone()
        })
    }

    pub fn submit(&self, quiz: &Quiz) -> SessionResult<(Session, AnswerOutcome)> {
        self.require(Phase::Active, "submit")?;
        self.judge(quiz, false)
    }

    /// One countdown unit elapses. Reaching zero submits the pending selection.
    pub fn tick(&self, quiz: &Quiz) -> SessionResult<TickOutcome> {
        self.require(Phase::Active, "tick")?;

        let next = Session {
            remaining: self.remaining.saturating_sub(1),
            ..self.clone()
        };

        if next.remaining == 0 {
            let (session, outcome) = next.judge(quiz, true)?;
            Ok(TickOutcome::Expired(session, outcome))
        } else {
            Ok(TickOutcome::Counting(next))
        }
    }

    /// Leave FEEDBACK: next question, or COMPLETE after the last one
    pub fn advance(&self, quiz: &Quiz) -> SessionResult<Session> {
        self.require(Phase::Feedback, "advance")?;

        if self.is_last_question(quiz) {
            return Ok(Session {
                phase: Phase::Complete,
                ..self.clone()
            });
        }

        Ok(Session {
            phase: Phase::Active,
            index: self.index + 1,
            remaining: quiz.config.question_seconds,
            selected: None,
            score: self.score,
        })
    }

    pub fn restart(&self) -> SessionResult<Session> {
        self.require(Phase::Complete, "restart")?;
        Ok(Session::new())
    }

    pub fn results(&self, quiz: &Quiz) -> QuizResults {
        QuizResults::new(self.score, quiz.len(), &quiz.config)
    }

    fn judge(&self, quiz: &Quiz, timed_out: bool) -> SessionResult<(Session, AnswerOutcome)> {
        let question = quiz
            .questions
            .get(self.index)
            .ok_or(SessionError::NoQuestions)?;
        let correct_option = question.correct_option().map(|o| o.id);

        let correct = self.selected.is_some() && self.selected == correct_option;
        let points = if correct {
            time_bonus(self.remaining)
        } else {
            0
        };

        let session = Session {
            phase: Phase::Feedback,
            score: self.score + points,
            ..self.clone()
        };

        let outcome = AnswerOutcome {
            correct,
            points,
            selected: self.selected,
            correct_option,
            explanation: question.explanation.clone(),
            timed_out,
            advance_after: quiz.config.feedback_delay(correct),
        };

        Ok((session, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fallback_questions;

    fn quiz() -> Quiz {
        Quiz::new(fallback_questions(), QuizConfig::default())
    }

    fn correct_id(quiz: &Quiz, session: &Session) -> OptionId {
        quiz.questions[session.index].correct_option().unwrap().id
    }

    fn wrong_id(quiz: &Quiz, session: &Session) -> OptionId {
        quiz.questions[session.index]
            .options
            .iter()
            .find(|o| !o.is_correct)
            .unwrap()
            .id
    }

    fn started(quiz: &Quiz) -> Session {
        Session::new().start(quiz).unwrap()
    }

    #[test]
    fn test_start_initializes_session() {
        let quiz = quiz();
        let session = started(&quiz);

        assert_eq!(session.phase, Phase::Active);
        assert_eq!(session.index, 0);
        assert_eq!(session.score, 0);
        assert_eq!(session.remaining, 30);
        assert!(session.selected.is_none());
    }

    #[test]
    fn test_start_only_from_not_started() {
        let quiz = quiz();
        let session = started(&quiz);

        let result = session.start(&quiz);
        assert_eq!(
            result.unwrap_err(),
            SessionError::InvalidPhase {
                action: "start",
                phase: Phase::Active
            }
        );
    }

    #[test]
    fn test_start_requires_questions() {
        let quiz = Quiz::new(vec![], QuizConfig::default());
        assert_eq!(
            Session::new().start(&quiz).unwrap_err(),
            SessionError::NoQuestions
        );
    }

    #[test]
    fn test_last_selection_wins() {
        let quiz = quiz();
        let session = started(&quiz)
            .select_option(&quiz, 2)
            .unwrap()
            .select_option(&quiz, 3)
            .unwrap();

        assert_eq!(session.selected, Some(3));
        assert_eq!(session.phase, Phase::Active);
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let quiz = quiz();
        let session = started(&quiz);

        let err = session.select_option(&quiz, 99).unwrap_err();
        assert_eq!(err, SessionError::UnknownOption(99));
        assert_eq!(err.code(), "UNKNOWN_OPTION");
    }

    #[test]
    fn test_select_outside_active_is_rejected() {
        let quiz = quiz();
        let err = Session::new().select_option(&quiz, 1).unwrap_err();
        assert!(matches!(err, SessionError::InvalidPhase { .. }));
    }

    #[test]
    fn test_correct_submit_awards_time_bonus() {
        let quiz = quiz();
        for (remaining, expected) in [(30, 15), (1, 1), (0, 0), (17, 9)] {
            let mut session = started(&quiz);
            session.remaining = remaining;
            let session = session
                .select_option(&quiz, correct_id(&quiz, &session))
                .unwrap();

            let (after, outcome) = session.submit(&quiz).unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.points, expected);
            assert_eq!(after.score, expected);
            assert_eq!(after.phase, Phase::Feedback);
            assert_eq!(outcome.advance_after, Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_incorrect_submit_leaves_score() {
        let quiz = quiz();
        let session = started(&quiz);
        let session = session
            .select_option(&quiz, wrong_id(&quiz, &session))
            .unwrap();

        let (after, outcome) = session.submit(&quiz).unwrap();
        assert!(!outcome.correct);
        assert_eq!(after.score, 0);
        assert_eq!(after.phase, Phase::Feedback);
        assert_eq!(outcome.advance_after, Duration::from_millis(5000));
        assert_eq!(outcome.explanation, "Paris");
    }

    #[test]
    fn test_submit_without_selection_is_incorrect() {
        let quiz = quiz();
        let (after, outcome) = started(&quiz).submit(&quiz).unwrap();

        assert!(!outcome.correct);
        assert!(outcome.selected.is_none());
        assert_eq!(outcome.correct_option, Some(1));
        assert_eq!(after.score, 0);
    }

    #[test]
    fn test_submit_twice_is_rejected() {
        let quiz = quiz();
        let (after, _) = started(&quiz).submit(&quiz).unwrap();

        let err = after.submit(&quiz).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidPhase {
                action: "submit",
                phase: Phase::Feedback
            }
        );
    }

    #[test]
    fn test_tick_counts_down() {
        let quiz = quiz();
        match started(&quiz).tick(&quiz).unwrap() {
            TickOutcome::Counting(session) => assert_eq!(session.remaining, 29),
            other => panic!("Expected Counting, got {:?}", other),
        }
    }

    #[test]
    fn test_tick_to_zero_submits_pending_selection() {
        let quiz = quiz();
        let mut session = started(&quiz);
        session.remaining = 1;
        let session = session
            .select_option(&quiz, correct_id(&quiz, &session))
            .unwrap();

        match session.tick(&quiz).unwrap() {
            TickOutcome::Expired(after, outcome) => {
                assert!(outcome.timed_out);
                assert!(outcome.correct);
                assert_eq!(outcome.points, 0);
                assert_eq!(after.remaining, 0);
                assert_eq!(after.phase, Phase::Feedback);
            }
            other => panic!("Expected Expired, got {:?}", other),
        }
    }

    #[test]
    fn test_advance_moves_to_next_question() {
        let quiz = quiz();
        let session = started(&quiz).select_option(&quiz, 2).unwrap();
        let (feedback, _) = session.submit(&quiz).unwrap();

        let next = feedback.advance(&quiz).unwrap();
        assert_eq!(next.phase, Phase::Active);
        assert_eq!(next.index, 1);
        assert_eq!(next.remaining, 30);
        assert!(next.selected.is_none());
    }

    #[test]
    fn test_advance_after_last_question_completes() {
        let quiz = quiz();
        let mut session = started(&quiz);
        session.index = quiz.len() - 1;
        let (feedback, _) = session.submit(&quiz).unwrap();

        let done = feedback.advance(&quiz).unwrap();
        assert_eq!(done.phase, Phase::Complete);
        assert_eq!(done.index, quiz.len() - 1);
        assert!(done.current_question(&quiz).is_none());
    }

    #[test]
    fn test_advance_only_from_feedback() {
        let quiz = quiz();
        assert!(started(&quiz).advance(&quiz).is_err());
    }

    #[test]
    fn test_restart_only_from_complete() {
        let quiz = quiz();
        assert!(started(&quiz).restart().is_err());
        assert!(Session::new().restart().is_err());
    }

    #[test]
    fn test_full_run_all_correct() {
        let quiz = quiz();
        let mut session = started(&quiz);
        let mut last_score = 0;

        while session.phase != Phase::Complete {
            assert!(session.index < quiz.len());
            let id = correct_id(&quiz, &session);
            let (feedback, _) = session
                .select_option(&quiz, id)
                .unwrap()
                .submit(&quiz)
                .unwrap();
            assert!(feedback.score >= last_score);
            last_score = feedback.score;
            session = feedback.advance(&quiz).unwrap();
        }

        assert_eq!(session.score, 75);
        assert_eq!(session.index, 4);

        let results = session.results(&quiz);
        assert_eq!(results.max_score, 75);
        assert!((results.percentage - 100.0).abs() < f64::EPSILON);

        let reset = session.restart().unwrap();
        assert_eq!(reset, Session::new());
        assert_eq!(reset.phase, Phase::NotStarted);
    }
}
