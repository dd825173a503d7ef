use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Percentage of answers that were correct, rounded half up.
///
/// Returns 0 when nothing was answered.
#[must_use]
pub fn accuracy_percent(correct_answers: u32, total_questions: u32) -> u32 {
    if total_questions == 0 {
        return 0;
    }
    let correct = u64::from(correct_answers.min(total_questions));
    let total = u64::from(total_questions);
    // correct * 100 / total, rounded half up, without floats
    let rounded = (correct * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

/// Final statistics reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    score: u32,
    total_questions: u32,
    correct_answers: u32,
    accuracy: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    #[must_use]
    pub fn new(score: u32, total_questions: u32, correct_answers: u32) -> Self {
        Self {
            score,
            total_questions,
            correct_answers,
            accuracy: accuracy_percent(correct_answers, total_questions),
            started_at: None,
            ended_at: None,
        }
    }

    /// Stamps when the session started and ended.
    #[must_use]
    pub fn with_period(
        mut self,
        started_at: Option<DateTime<Utc>>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        self.started_at = started_at;
        self.ended_at = Some(ended_at);
        self
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Accuracy as a whole percentage in `0..=100`.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Time between start and end, if both are known.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        Some(self.ended_at? - self.started_at?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn accuracy_rounds_to_nearest() {
        assert_eq!(accuracy_percent(3, 7), 43);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 8), 13);
        assert_eq!(accuracy_percent(5, 5), 100);
    }

    #[test]
    fn accuracy_is_zero_without_questions() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(SessionSummary::new(0, 0, 0).accuracy(), 0);
    }

    #[test]
    fn summary_keeps_counts() {
        let summary = SessionSummary::new(57, 7, 3);
        assert_eq!(summary.score(), 57);
        assert_eq!(summary.total_questions(), 7);
        assert_eq!(summary.correct_answers(), 3);
        assert_eq!(summary.accuracy(), 43);
        assert!(summary.duration().is_none());
    }

    #[test]
    fn period_gives_duration() {
        let start = fixed_now();
        let summary =
            SessionSummary::new(11, 1, 1).with_period(Some(start), start + Duration::seconds(60));
        assert_eq!(summary.started_at(), Some(start));
        assert_eq!(summary.duration(), Some(Duration::seconds(60)));

        // ended without ever starting
        let summary = SessionSummary::new(0, 0, 0).with_period(None, start);
        assert!(summary.duration().is_none());
    }
}
