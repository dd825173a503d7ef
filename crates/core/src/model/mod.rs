mod answer;
mod operation;
mod question;
mod summary;

pub use answer::{AnswerError, parse_answer};
pub use operation::{OperandRange, Operation};
pub use question::{Question, QuestionError};
pub use summary::{SessionSummary, accuracy_percent};
