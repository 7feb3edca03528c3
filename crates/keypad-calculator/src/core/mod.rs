//! Calculator core: operand editing, arithmetic and the state machine
//!
//! Everything in here is free of DOM and timing concerns. The session layer
//! feeds inputs in and routes the published effects to a display sink.

pub mod format;
pub mod machine;
mod operand;
mod operations;

pub use machine::{CalculatorState, HistoryLine, HistoryUpdate, Phase, StateSnapshot, Transition};
pub use operand::Operand;
pub use operations::{round_to_places, Operator};

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Arithmetic errors that put the machine into the Error state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division with a zero divisor
    #[error("Cannot divide by zero")]
    DivisionByZero,
    /// Result was infinite or NaN
    #[error("Result too large")]
    Overflow,
    /// Malformed input reached the machine
    #[error("Invalid input")]
    InvalidInput(String),
}

impl CalcError {
    /// Creates an invalid input error with a diagnostic detail
    #[must_use]
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }

    /// Detail attached to the error, for logging only
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidInput(detail) => Some(detail),
            Self::DivisionByZero | Self::Overflow => None,
        }
    }
}
