//! Drives one `Session` from user input and timer events.
//!
//! All mutation happens in `handle`, called from a single task. Timers only
//! post events into the controller's channel. Each timer carries a generation
//! number, and events from a timer that has since been replaced or cancelled
//! are dropped.

use tokio::sync::mpsc;

use super::{AnswerOutcome, Quiz, Session, SessionError, TickOutcome, TimerHandle};
use crate::protocol::ServerMessage;
use crate::types::{OptionId, Phase, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Select(OptionId),
    Submit,
    Restart,
    Tick { generation: u64 },
    Advance { generation: u64 },
}

pub struct SessionController {
    id: SessionId,
    quiz: Quiz,
    session: Session,
    events: mpsc::UnboundedSender<SessionEvent>,
    countdown: Option<TimerHandle>,
    pending_advance: Option<TimerHandle>,
    generation: u64,
}

impl SessionController {
    /// Create a controller and the receiver its timers post into.
    /// The caller feeds every received event back into `handle`.
    pub fn new(quiz: Quiz) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            id: ulid::Ulid::new().to_string(),
            quiz,
            session: Session::new(),
            events,
            countdown: None,
            pending_advance: None,
            generation: 0,
        };
        (controller, rx)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Generation of the running countdown, if any
    pub fn countdown_generation(&self) -> Option<u64> {
        self.countdown.as_ref().map(TimerHandle::generation)
    }

    /// Generation of the scheduled advance, if any
    pub fn advance_generation(&self) -> Option<u64> {
        self.pending_advance.as_ref().map(TimerHandle::generation)
    }

    pub fn snapshot(&self) -> ServerMessage {
        ServerMessage::snapshot(&self.session, &self.quiz)
    }

    /// Apply one event and return the messages for the client
    pub fn handle(&mut self, event: SessionEvent) -> Vec<ServerMessage> {
        let result = match event {
            SessionEvent::Start => self.on_start(),
            SessionEvent::Select(option_id) => self.on_select(option_id),
            SessionEvent::Submit => self.on_submit(),
            SessionEvent::Restart => self.on_restart(),
            SessionEvent::Tick { generation } => {
                if self.countdown_generation() != Some(generation) {
                    tracing::debug!("Session {}: dropping stale tick {}", self.id, generation);
                    return vec![];
                }
                self.on_tick()
            }
            SessionEvent::Advance { generation } => {
                if self.advance_generation() != Some(generation) {
                    tracing::debug!(
                        "Session {}: dropping stale advance {}",
                        self.id,
                        generation
                    );
                    return vec![];
                }
                self.pending_advance = None;
                self.on_advance()
            }
        };

        match result {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Session {}: rejected event: {}", self.id, e);
                vec![ServerMessage::from(&e)]
            }
        }
    }

    /// Cancel every pending timer. Called when the client goes away.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
        tracing::debug!("Session {}: shut down", self.id);
    }

    fn on_start(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.session = self.session.start(&self.quiz)?;
        self.start_countdown();
        tracing::info!(
            "Session {}: started with {} questions",
            self.id,
            self.quiz.len()
        );
        Ok(vec![self.snapshot()])
    }

    fn on_select(&mut self, option_id: OptionId) -> Result<Vec<ServerMessage>, SessionError> {
        self.session = self.session.select_option(&self.quiz, option_id)?;
        Ok(vec![self.snapshot()])
    }

    fn on_submit(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        let (session, outcome) = self.session.submit(&self.quiz)?;
        Ok(self.enter_feedback(session, outcome))
    }

    fn on_tick(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        match self.session.tick(&self.quiz)? {
            TickOutcome::Counting(session) => {
                self.session = session;
                Ok(vec![ServerMessage::Tick {
                    remaining: self.session.remaining,
                }])
            }
            TickOutcome::Expired(session, outcome) => {
                let mut messages = vec![ServerMessage::Tick { remaining: 0 }];
                messages.extend(self.enter_feedback(session, outcome));
                Ok(messages)
            }
        }
    }

    fn on_advance(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.session = self.session.advance(&self.quiz)?;

        if self.session.phase == Phase::Complete {
            let results = self.session.results(&self.quiz);
            tracing::info!(
                "Session {}: complete with {}/{} points",
                self.id,
                results.score,
                results.max_score
            );
            return Ok(vec![self.snapshot(), ServerMessage::results(&results)]);
        }

        self.start_countdown();
        Ok(vec![self.snapshot()])
    }

    fn on_restart(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.session = self.session.restart()?;
        self.cancel_timers();
        tracing::info!("Session {}: restarted", self.id);
        Ok(vec![self.snapshot()])
    }

    fn enter_feedback(&mut self, session: Session, outcome: AnswerOutcome) -> Vec<ServerMessage> {
        self.session = session;
        self.countdown = None;
        self.schedule_advance(&outcome);

        tracing::debug!(
            "Session {}: question {} answered, correct={} points={}",
            self.id,
            self.session.index,
            outcome.correct,
            outcome.points
        );

        vec![
            self.snapshot(),
            ServerMessage::feedback(&outcome, self.session.score),
        ]
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn start_countdown(&mut self) {
        let generation = self.next_generation();
        // Replacing the handle aborts the previous timer task
        self.countdown = Some(TimerHandle::repeating(
            generation,
            self.quiz.config.tick_interval,
            self.events.clone(),
            SessionEvent::Tick { generation },
        ));
    }

    fn schedule_advance(&mut self, outcome: &AnswerOutcome) {
        let generation = self.next_generation();
        self.pending_advance = Some(TimerHandle::once(
            generation,
            outcome.advance_after,
            self.events.clone(),
            SessionEvent::Advance { generation },
        ));
    }

    fn cancel_timers(&mut self) {
        if let Some(timer) = self.countdown.take() {
            timer.cancel();
        }
        if let Some(timer) = self.pending_advance.take() {
            timer.cancel();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}
