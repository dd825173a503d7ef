use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::Operation;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("{lhs} {symbol} {rhs} does not fit in a u32")]
    Overflow { lhs: u32, symbol: char, rhs: u32 },
}

/// A single arithmetic problem.
///
/// `expected` always equals `operation.apply(lhs, rhs)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    operation: Operation,
    lhs: u32,
    rhs: u32,
    expected: u32,
}

impl Question {
    /// Builds a question and computes its expected result.
    ///
    /// Subtraction operands are put larger-first so the result is never negative.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Overflow` if the result does not fit in a `u32`.
    pub fn new(operation: Operation, lhs: u32, rhs: u32) -> Result<Self, QuestionError> {
        let (lhs, rhs) = if operation == Operation::Subtract && rhs > lhs {
            (rhs, lhs)
        } else {
            (lhs, rhs)
        };
        let expected = operation.apply(lhs, rhs).ok_or(QuestionError::Overflow {
            lhs,
            symbol: operation.symbol(),
            rhs,
        })?;
        Ok(Self::from_parts(operation, lhs, rhs, expected))
    }

    /// Caller guarantees `expected == operation.apply(lhs, rhs)`.
    pub(crate) fn from_parts(operation: Operation, lhs: u32, rhs: u32, expected: u32) -> Self {
        debug_assert_eq!(operation.apply(lhs, rhs), Some(expected));
        Self {
            operation,
            lhs,
            rhs,
            expected,
        }
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn symbol(&self) -> char {
        self.operation.symbol()
    }

    #[must_use]
    pub fn lhs(&self) -> u32 {
        self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> u32 {
        self.rhs
    }

    #[must_use]
    pub fn expected(&self) -> u32 {
        self.expected
    }

    /// Returns true if `answer` equals the expected result.
    #[must_use]
    pub fn is_correct(&self, answer: i64) -> bool {
        answer == i64::from(self.expected)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.symbol(), self.rhs)
    }
}
