use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use tracing::{debug, info};

use mathdash_core::model::{Question, SessionSummary, parse_answer};
use mathdash_core::{BASE_POINTS, Clock, QuestionGenerator, RandomSource, SESSION_SECONDS};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// Outcome of a scored answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    /// The answer matched; `points` were added to the score.
    Correct { points: u32 },
    /// The answer did not match; `expected` is the right result.
    Wrong { expected: u32 },
}

impl AnswerFeedback {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerFeedback::Correct { .. })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed quiz session.
///
/// A session is either inactive or active. `start` is the only way in and
/// `end` the only way out; once inactive, `submit_answer`, `next_question`
/// and `tick` change nothing. The session never sleeps: callers drive it with
/// `tick` once per second and call `next_question` after showing feedback.
#[derive(Debug)]
pub struct SessionService<R = StdRng> {
    generator: QuestionGenerator<R>,
    clock: Clock,
    active: bool,
    score: u32,
    streak: u32,
    time_remaining: u32,
    total_questions: u32,
    correct_answers: u32,
    current: Option<Question>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    summary: Option<SessionSummary>,
}

impl<R: RandomSource> SessionService<R> {
    /// Creates an inactive session drawing questions from `generator`.
    #[must_use]
    pub fn new(generator: QuestionGenerator<R>) -> Self {
        Self {
            generator,
            clock: Clock::default(),
            active: false,
            score: 0,
            streak: 0,
            time_remaining: SESSION_SECONDS,
            total_questions: 0,
            correct_answers: 0,
            current: None,
            started_at: None,
            ended_at: None,
            summary: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Resets every counter, activates the session and draws the first question.
    ///
    /// Calling `start` on a running or ended session discards its state.
    pub fn start(&mut self) -> &Question {
        self.active = true;
        self.score = 0;
        self.streak = 0;
        self.time_remaining = SESSION_SECONDS;
        self.total_questions = 0;
        self.correct_answers = 0;
        self.started_at = Some(self.clock.now());
        self.ended_at = None;
        self.summary = None;

        info!(seconds = SESSION_SECONDS, "session started");
        self.current.insert(self.generator.generate())
    }

    /// Parses raw input and scores it against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Inactive` if the session is not running and
    /// `SessionError::InvalidInput` if `raw` is not an integer. Neither
    /// changes any counter.
    pub fn submit_answer(&mut self, raw: &str) -> Result<AnswerFeedback, SessionError> {
        if !self.active {
            return Err(SessionError::Inactive);
        }
        let value = parse_answer(raw)?;
        self.submit_value(value)
    }

    /// Scores an already numeric answer against the current question.
    ///
    /// A correct answer extends the streak and earns `10 + streak` points,
    /// counting the answer itself. A wrong answer resets the streak.
    /// The current question is left in place; see `next_question`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Inactive` if the session is not running.
    pub fn submit_value(&mut self, value: i64) -> Result<AnswerFeedback, SessionError> {
        if !self.active {
            return Err(SessionError::Inactive);
        }
        let Some(question) = self.current else {
            return Err(SessionError::Inactive);
        };

        self.total_questions = self.total_questions.saturating_add(1);

        let feedback = if question.is_correct(value) {
            self.correct_answers = self.correct_answers.saturating_add(1);
            self.streak = self.streak.saturating_add(1);
            let points = BASE_POINTS.saturating_add(self.streak);
            self.score = self.score.saturating_add(points);
            AnswerFeedback::Correct { points }
        } else {
            self.streak = 0;
            AnswerFeedback::Wrong {
                expected: question.expected(),
            }
        };

        debug!(
            %question,
            answer = value,
            correct = feedback.is_correct(),
            score = self.score,
            streak = self.streak,
            "answer scored"
        );
        Ok(feedback)
    }

    /// Replaces the current question. Returns `None` if the session is inactive.
    pub fn next_question(&mut self) -> Option<&Question> {
        if !self.active {
            return None;
        }
        Some(self.current.insert(self.generator.generate()))
    }

    /// Counts down one second and ends the session when time runs out.
    ///
    /// Returns the remaining time, or `None` if the session was already inactive.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.active {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        debug!(remaining = self.time_remaining, "tick");
        if self.time_remaining == 0 {
            self.end();
        }
        Some(self.time_remaining)
    }

    /// Deactivates the session and returns its final statistics.
    ///
    /// Repeated calls return the statistics frozen by the first call.
    pub fn end(&mut self) -> SessionSummary {
        if let Some(summary) = self.summary {
            return summary;
        }

        self.active = false;
        let ended_at = self.clock.now();
        self.ended_at = Some(ended_at);
        let summary = SessionSummary::new(self.score, self.total_questions, self.correct_answers)
            .with_period(self.started_at, ended_at);
        self.summary = Some(summary);

        info!(
            score = summary.score(),
            questions = summary.total_questions(),
            accuracy = summary.accuracy(),
            "session ended"
        );
        summary
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns a snapshot of the live counters.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            score: self.score,
            streak: self.streak,
            time_remaining: self.time_remaining,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            is_active: self.active,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
