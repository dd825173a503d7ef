use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── OPERAND RANGE ─────────────────────────────────────────────────────────────
//

/// Inclusive bounds that both operands of an operation are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

//
// ─── OPERATION ─────────────────────────────────────────────────────────────────
//

/// The four arithmetic operations a question can ask about.
///
/// Each operation carries its display symbol, the binary function used to
/// compute the expected result and the range its operands are drawn from:
/// - `Add`, `Subtract`: operands in `[1, 100]`
/// - `Multiply`, `Divide`: operands in `[1, 12]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Every operation, in table order. Generators pick from this uniformly.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
            Operation::Divide => '÷',
        }
    }

    #[must_use]
    pub fn operand_range(self) -> OperandRange {
        match self {
            Operation::Add | Operation::Subtract => OperandRange::new(1, 100),
            Operation::Multiply | Operation::Divide => OperandRange::new(1, 12),
        }
    }

    /// Applies the operation to the two operands.
    ///
    /// Returns `None` when the result is negative or does not fit in a `u32`.
    /// Division truncates toward zero; a zero divisor is treated as 1.
    #[must_use]
    pub fn apply(self, lhs: u32, rhs: u32) -> Option<u32> {
        match self {
            Operation::Add => lhs.checked_add(rhs),
            Operation::Subtract => lhs.checked_sub(rhs),
            Operation::Multiply => lhs.checked_mul(rhs),
            Operation::Divide => {
                let divisor = if rhs == 0 { 1 } else { rhs };
                Some(lhs / divisor)
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
