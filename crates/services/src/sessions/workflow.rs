use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, sleep_until};
use tracing::{debug, info};

use mathdash_core::RandomSource;
use mathdash_core::model::{AnswerError, Question, SessionSummary};

use super::progress::SessionProgress;
use super::service::{AnswerFeedback, SessionService};
use crate::error::SessionError;

/// Something the front-end should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new question is up.
    QuestionReady(Question),
    /// The last answer was scored; `progress` holds the updated counters.
    Feedback {
        feedback: AnswerFeedback,
        progress: SessionProgress,
    },
    /// The last answer was not a number and was not scored.
    Rejected(AnswerError),
    /// One second passed.
    Tick { remaining: u32 },
    /// The session is over; no further events follow.
    Finished(SessionSummary),
}

/// Drives a `SessionService` in real time.
///
/// Ticks the session once per `tick_interval`, feeds it answers as they
/// arrive and shows each answer's feedback for `feedback_delay` before
/// moving to the next question.
#[derive(Debug, Clone)]
pub struct SessionLoopService {
    tick_interval: Duration,
    feedback_delay: Duration,
}

impl Default for SessionLoopService {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLoopService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            feedback_delay: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, feedback_delay: Duration) -> Self {
        self.feedback_delay = feedback_delay;
        self
    }

    /// Starts `session` and plays it until time runs out or `answers` closes.
    ///
    /// Answers received while feedback is still showing are dropped so a
    /// question is never scored twice. Closing the answer channel ends the
    /// session early. Returns the final summary, which is also sent as
    /// `SessionEvent::Finished`.
    pub async fn run<R: RandomSource>(
        &self,
        mut session: SessionService<R>,
        mut answers: mpsc::Receiver<String>,
        events: mpsc::Sender<SessionEvent>,
    ) -> SessionSummary {
        let first = *session.start();
        emit(&events, SessionEvent::QuestionReady(first)).await;

        let started = Instant::now();
        let mut ticks = interval_at(started + self.tick_interval, self.tick_interval);
        let mut next_question_at: Option<Instant> = None;

        loop {
            let feedback_shown = sleep_until(next_question_at.unwrap_or(started));

            tokio::select! {
                _ = ticks.tick() => {
                    if let Some(remaining) = session.tick() {
                        emit(&events, SessionEvent::Tick { remaining }).await;
                    }
                    if !session.is_active() {
                        break;
                    }
                }
                () = feedback_shown, if next_question_at.is_some() => {
                    next_question_at = None;
                    if let Some(question) = session.next_question().copied() {
                        emit(&events, SessionEvent::QuestionReady(question)).await;
                    }
                }
                answer = answers.recv() => {
                    let Some(raw) = answer else {
                        info!("answer channel closed, ending session early");
                        break;
                    };
                    if next_question_at.is_some() {
                        debug!(raw = %raw.trim(), "answer ignored while feedback is showing");
                        continue;
                    }
                    match session.submit_answer(&raw) {
                        Ok(feedback) => {
                            let progress = session.progress();
                            emit(&events, SessionEvent::Feedback { feedback, progress }).await;
                            next_question_at = Some(Instant::now() + self.feedback_delay);
                        }
                        Err(SessionError::InvalidInput(err)) => {
                            debug!(%err, "answer rejected");
                            emit(&events, SessionEvent::Rejected(err)).await;
                        }
                        Err(SessionError::Inactive) => break,
                    }
                }
            }
        }

        let summary = session.end();
        emit(&events, SessionEvent::Finished(summary)).await;
        summary
    }
}

async fn emit(events: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    if events.send(event).await.is_err() {
        debug!("event receiver dropped");
    }
}
