use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::{OperandRange, Operation, Question};

//
// ─── RANDOM SOURCE ─────────────────────────────────────────────────────────────
//

/// Source of the uniform choices a `QuestionGenerator` makes.
///
/// Every `rand::Rng` is a `RandomSource`. Tests can implement it directly to
/// script exact operations and operands.
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns a value in `range.min..=range.max`.
    fn pick_in(&mut self, range: OperandRange) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn pick_in(&mut self, range: OperandRange) -> u32 {
        self.random_range(range.min..=range.max)
    }
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Produces random arithmetic questions.
///
/// The operation is chosen uniformly from `Operation::ALL`, then operands are
/// sampled from that operation's range:
///
/// * addition and multiplication take two independent operands
/// * subtraction swaps its operands when needed so the result is never negative
/// * division samples a divisor then a quotient and asks for
///   `quotient × divisor ÷ divisor`, so it always divides evenly
///
/// # Examples
///
/// ```
/// # use mathdash_core::QuestionGenerator;
/// let mut generator = QuestionGenerator::seeded(7);
/// let question = generator.generate();
/// assert_eq!(
///     question.operation().apply(question.lhs(), question.rhs()),
///     Some(question.expected())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QuestionGenerator<R = StdRng> {
    source: R,
}

impl QuestionGenerator<StdRng> {
    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator; the same seed yields the same questions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> QuestionGenerator<R> {
    #[must_use]
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Generates the next question.
    pub fn generate(&mut self) -> Question {
        let operation = Operation::ALL[self.source.pick_index(Operation::ALL.len())];
        let range = operation.operand_range();

        let question = match operation {
            Operation::Divide => {
                let divisor = self.source.pick_in(range);
                let quotient = self.source.pick_in(range);
                Question::from_parts(operation, quotient * divisor, divisor, quotient)
            }
            Operation::Subtract => {
                let first = self.source.pick_in(range);
                let second = self.source.pick_in(range);
                let (lhs, rhs) = if second > first {
                    (second, first)
                } else {
                    (first, second)
                };
                Question::from_parts(operation, lhs, rhs, lhs - rhs)
            }
            Operation::Add => {
                let lhs = self.source.pick_in(range);
                let rhs = self.source.pick_in(range);
                Question::from_parts(operation, lhs, rhs, lhs + rhs)
            }
            Operation::Multiply => {
                let lhs = self.source.pick_in(range);
                let rhs = self.source.pick_in(range);
                Question::from_parts(operation, lhs, rhs, lhs * rhs)
            }
        };

        debug!(%question, expected = question.expected(), "generated question");
        question
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
