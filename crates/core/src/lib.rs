#![forbid(unsafe_code)]

pub mod generator;
pub mod model;
pub mod time;

pub use generator::{QuestionGenerator, RandomSource};
pub use time::Clock;

/// Length of a session, in ticks.
pub const SESSION_SECONDS: u32 = 60;

/// Points awarded for a correct answer before the streak bonus.
pub const BASE_POINTS: u32 = 10;
