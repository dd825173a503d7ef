use serde::Serialize;

/// Live counters of a session, useful for rendering a scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub score: u32,
    pub streak: u32,
    pub time_remaining: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub is_active: bool,
}
