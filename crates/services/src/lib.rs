#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use mathdash_core::Clock;

pub use error::SessionError;

pub use sessions::{
    AnswerFeedback, SessionEvent, SessionLoopService, SessionProgress, SessionService,
};
