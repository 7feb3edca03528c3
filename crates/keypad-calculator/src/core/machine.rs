//! Arithmetic state machine
//!
//! Holds the four pieces of calculator state and exposes one method per
//! transition. Each transition runs to completion and returns a
//! [`Transition`] describing what the display should show; the machine
//! itself never touches the display or any timer.
//!
//! Evaluation is strictly left to right: choosing a second operator while a
//! complete operation is pending evaluates the pending one first.

use crate::core::format;
use crate::core::{round_to_places, CalcError, CalcResult, Operand, Operator};
use serde::{Deserialize, Serialize};

/// Observable phase, derived from the state fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Typing digits into the operand
    Entering,
    /// An operator was just chosen; the next digit starts a new operand
    OperatorPending,
    /// A calculation just completed; ready to chain or start over
    Result,
    /// Arithmetic error shown, waiting for clear
    Error,
}

/// Structured history line, rendered by the display layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLine {
    /// `"<pending> <op>"` after choosing an operator
    Pending {
        /// Captured operand text
        pending: String,
        /// Chosen operator
        operator: Operator,
    },
    /// `"<pending> <op> <operand> ="` after evaluating
    Completed {
        /// Left-hand operand text
        pending: String,
        /// Operator that was applied
        operator: Operator,
        /// Right-hand operand text
        operand: String,
    },
    /// Free text, used for error messages
    Message(String),
}

impl HistoryLine {
    /// Renders the line with the given thousands separator
    #[must_use]
    pub fn render(&self, separator: &str) -> String {
        match self {
            Self::Pending { pending, operator } => {
                format::pending_line(pending, *operator, separator)
            }
            Self::Completed {
                pending,
                operator,
                operand,
            } => format::completed_line(pending, *operator, operand, separator),
            Self::Message(text) => text.clone(),
        }
    }
}

/// What happened to the history line during a transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryUpdate {
    /// Leave the history line alone
    #[default]
    Unchanged,
    /// Replace the history line
    Set(HistoryLine),
    /// Empty the history line
    Cleared,
}

/// Effects of a single transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Whether any state field changed
    pub changed: bool,
    /// History line update
    pub history: HistoryUpdate,
    /// A calculation completed successfully
    pub succeeded: bool,
    /// The transition entered the Error state
    pub error: Option<CalcError>,
    /// The state was reset to its initial tuple
    pub cleared: bool,
}

impl Transition {
    /// Nothing happened
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Operand changed, re-render only
    #[must_use]
    pub fn render() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    fn history(line: HistoryLine) -> Self {
        Self {
            changed: true,
            history: HistoryUpdate::Set(line),
            ..Self::default()
        }
    }

    fn success(line: HistoryLine) -> Self {
        Self {
            succeeded: true,
            ..Self::history(line)
        }
    }

    fn failure(error: CalcError) -> Self {
        Self {
            changed: true,
            history: HistoryUpdate::Set(HistoryLine::Message(error.to_string())),
            error: Some(error),
            ..Self::default()
        }
    }

    fn cleared() -> Self {
        Self {
            changed: true,
            history: HistoryUpdate::Cleared,
            cleared: true,
            ..Self::default()
        }
    }
}

/// Serializable view of the state, for debugging and the JS boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Raw operand text
    pub operand: String,
    /// Pending operand text, empty when nothing is pending
    pub pending: String,
    /// Pending operator
    pub operator: Option<Operator>,
    /// Whether the next digit starts a fresh operand
    pub waiting_for_operand: bool,
    /// Derived phase
    pub phase: Phase,
}

/// The calculator's arithmetic state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    operand: Operand,
    pending: Option<String>,
    operator: Option<Operator>,
    waiting_for_operand: bool,
    decimal_places: u32,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Decimal places kept after each calculation
    pub const DEFAULT_DECIMAL_PLACES: u32 = 8;

    /// Creates the initial state: operand "0", nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self::with_decimal_places(Self::DEFAULT_DECIMAL_PLACES)
    }

    /// Creates the initial state with a custom result precision
    #[must_use]
    pub fn with_decimal_places(decimal_places: u32) -> Self {
        Self {
            operand: Operand::zero(),
            pending: None,
            operator: None,
            waiting_for_operand: false,
            decimal_places,
        }
    }

    /// Current operand
    #[must_use]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Pending operand text, if an operation is pending
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Pending operator
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Whether the next digit starts a fresh operand
    #[must_use]
    pub fn waiting_for_operand(&self) -> bool {
        self.waiting_for_operand
    }

    /// Decimal places kept after each calculation
    #[must_use]
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Derives the current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.operand.is_error() {
            Phase::Error
        } else if self.waiting_for_operand && self.operator.is_some() {
            Phase::OperatorPending
        } else if self.waiting_for_operand {
            Phase::Result
        } else {
            Phase::Entering
        }
    }

    /// Returns true if the four fields match the startup tuple
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.operand == Operand::zero()
            && self.pending.is_none()
            && self.operator.is_none()
            && !self.waiting_for_operand
    }

    /// Serializable view of the state
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            operand: self.operand.as_str().to_string(),
            pending: self.pending.clone().unwrap_or_default(),
            operator: self.operator,
            waiting_for_operand: self.waiting_for_operand,
            phase: self.phase(),
        }
    }

    /// Digit entry: starts a fresh operand or appends to the current one
    pub fn digit(&mut self, d: u8) -> Transition {
        let entered = if self.waiting_for_operand || self.operand.is_error() {
            Operand::digit(d).map(|operand| self.operand = operand)
        } else {
            self.operand.push_digit(d)
        };

        match entered {
            Ok(()) => {
                self.waiting_for_operand = false;
                Transition::render()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Decimal point entry; a second point in the same operand is ignored
    pub fn decimal(&mut self) -> Transition {
        if self.waiting_for_operand {
            self.operand = Operand::Number("0.".to_string());
            self.waiting_for_operand = false;
            return Transition::render();
        }

        if self.operand.push_decimal() {
            Transition::render()
        } else {
            Transition::none()
        }
    }

    /// Operator selection, evaluating a complete pending operation first
    ///
    /// Ignored while the Error state is shown. When chaining fails the
    /// machine enters the Error state and the new operator is dropped.
    pub fn select_operator(&mut self, op: Operator) -> Transition {
        if self.operand.is_error() {
            return Transition::none();
        }

        if self.pending.is_some() && self.operator.is_some() && !self.waiting_for_operand {
            if let Err(e) = self.compute() {
                return self.fail(e);
            }
        }

        let pending = self.operand.as_str().to_string();
        self.pending = Some(pending.clone());
        self.operator = Some(op);
        self.waiting_for_operand = true;

        Transition::history(HistoryLine::Pending {
            pending,
            operator: op,
        })
    }

    /// Evaluates `pending OP operand`
    ///
    /// No-op without a pending operand and operator, or while waiting for
    /// the second operand (repeated `=` does nothing).
    pub fn evaluate(&mut self) -> Transition {
        if self.pending.is_none() || self.operator.is_none() || self.waiting_for_operand {
            return Transition::none();
        }

        match self.compute() {
            Ok(line) => Transition::success(line),
            Err(e) => self.fail(e),
        }
    }

    /// Resets to the startup tuple
    pub fn clear(&mut self) -> Transition {
        self.operand = Operand::zero();
        self.pending = None;
        self.operator = None;
        self.waiting_for_operand = false;
        Transition::cleared()
    }

    /// Drops the last character of the operand
    pub fn backspace(&mut self) -> Transition {
        self.operand.backspace();
        Transition::render()
    }

    fn compute(&mut self) -> CalcResult<HistoryLine> {
        let (Some(pending), Some(op)) = (self.pending.as_deref(), self.operator) else {
            return Err(CalcError::invalid_input("nothing to evaluate"));
        };

        let lhs = Operand::Number(pending.to_string()).value()?;
        let rhs = self.operand.value()?;
        let result = round_to_places(op.apply(lhs, rhs)?, self.decimal_places);

        let line = HistoryLine::Completed {
            pending: pending.to_string(),
            operator: op,
            operand: self.operand.as_str().to_string(),
        };

        self.operand = Operand::from_value(result);
        self.pending = None;
        self.operator = None;
        self.waiting_for_operand = true;
        Ok(line)
    }

    fn fail(&mut self, error: CalcError) -> Transition {
        tracing::warn!(%error, detail = ?error.detail(), "calculator entered error state");
        self.operand = Operand::Error;
        self.pending = None;
        self.operator = None;
        self.waiting_for_operand = true;
        Transition::failure(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(state: &mut CalculatorState, s: &str) {
        for c in s.chars() {
            if c == '.' {
                state.decimal();
            } else {
                state.digit(c.to_digit(10).unwrap() as u8);
            }
        }
    }

    fn operand(state: &CalculatorState) -> &str {
        state.operand().as_str()
    }

    // ===== Initial state tests =====

    #[test]
    fn test_new_is_initial() {
        let state = CalculatorState::new();
        assert!(state.is_initial());
        assert_eq!(operand(&state), "0");
        assert_eq!(state.pending(), None);
        assert_eq!(state.operator(), None);
        assert!(!state.waiting_for_operand());
        assert_eq!(state.phase(), Phase::Entering);
        assert_eq!(state.decimal_places(), 8);
    }

    // ===== Digit / decimal tests =====

    #[test]
    fn test_digits_concatenate() {
        let mut state = CalculatorState::new();
        digits(&mut state, "0123");
        assert_eq!(operand(&state), "123");
    }

    #[test]
    fn test_decimal_only_once() {
        let mut state = CalculatorState::new();
        digits(&mut state, "1.2.3");
        assert_eq!(operand(&state), "1.23");
    }

    #[test]
    fn test_decimal_no_op_reports_unchanged() {
        let mut state = CalculatorState::new();
        state.decimal();
        assert!(!state.decimal().changed);
    }

    #[test]
    fn test_decimal_after_operator_starts_fresh() {
        let mut state = CalculatorState::new();
        digits(&mut state, "4");
        state.select_operator(Operator::Add);
        state.decimal();
        assert_eq!(operand(&state), "0.");
        assert!(!state.waiting_for_operand());
    }

    #[test]
    fn test_invalid_digit_enters_error() {
        let mut state = CalculatorState::new();
        let t = state.digit(12);
        assert!(matches!(t.error, Some(CalcError::InvalidInput(_))));
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(t.history, HistoryUpdate::Set(HistoryLine::Message("Invalid input".into())));
    }

    // ===== Operator tests =====

    #[test]
    fn test_operator_captures_pending() {
        let mut state = CalculatorState::new();
        digits(&mut state, "12");
        let t = state.select_operator(Operator::Add);
        assert_eq!(state.pending(), Some("12"));
        assert_eq!(state.operator(), Some(Operator::Add));
        assert!(state.waiting_for_operand());
        assert_eq!(state.phase(), Phase::OperatorPending);
        assert_eq!(
            t.history,
            HistoryUpdate::Set(HistoryLine::Pending {
                pending: "12".into(),
                operator: Operator::Add,
            })
        );
    }

    #[test]
    fn test_operator_twice_replaces_operator_without_evaluating() {
        let mut state = CalculatorState::new();
        digits(&mut state, "5");
        state.select_operator(Operator::Add);
        state.select_operator(Operator::Multiply);
        assert_eq!(state.pending(), Some("5"));
        assert_eq!(state.operator(), Some(Operator::Multiply));
        assert_eq!(operand(&state), "5");
    }

    #[test]
    fn test_operator_chains_pending_operation() {
        let mut state = CalculatorState::new();
        digits(&mut state, "5");
        state.select_operator(Operator::Add);
        digits(&mut state, "3");
        let t = state.select_operator(Operator::Add);
        assert_eq!(operand(&state), "8");
        assert_eq!(state.pending(), Some("8"));
        assert!(!t.succeeded);
        assert_eq!(
            t.history,
            HistoryUpdate::Set(HistoryLine::Pending {
                pending: "8".into(),
                operator: Operator::Add,
            })
        );
    }

    #[test]
    fn test_operator_after_result_chains_from_result() {
        let mut state = CalculatorState::new();
        digits(&mut state, "6");
        state.select_operator(Operator::Multiply);
        digits(&mut state, "7");
        state.evaluate();
        state.select_operator(Operator::Subtract);
        assert_eq!(state.pending(), Some("42"));
        digits(&mut state, "2");
        state.evaluate();
        assert_eq!(operand(&state), "40");
    }

    #[test]
    fn test_operator_ignored_in_error_state() {
        let mut state = CalculatorState::new();
        digits(&mut state, "7");
        state.select_operator(Operator::Divide);
        digits(&mut state, "0");
        state.evaluate();
        let t = state.select_operator(Operator::Add);
        assert_eq!(t, Transition::none());
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_chaining_into_error_drops_new_operator() {
        let mut state = CalculatorState::new();
        digits(&mut state, "7");
        state.select_operator(Operator::Divide);
        digits(&mut state, "0");
        let t = state.select_operator(Operator::Add);
        assert_eq!(t.error, Some(CalcError::DivisionByZero));
        assert_eq!(state.operator(), None);
        assert_eq!(operand(&state), "Error");
    }

    // ===== Evaluate tests =====

    #[test]
    fn test_evaluate_without_pending_is_noop() {
        let mut state = CalculatorState::new();
        digits(&mut state, "9");
        assert_eq!(state.evaluate(), Transition::none());
        assert_eq!(operand(&state), "9");
    }

    #[test]
    fn test_evaluate_right_after_operator_is_noop() {
        let mut state = CalculatorState::new();
        digits(&mut state, "9");
        state.select_operator(Operator::Add);
        assert_eq!(state.evaluate(), Transition::none());
        assert_eq!(state.pending(), Some("9"));
    }

    #[test]
    fn test_evaluate_publishes_completed_line() {
        let mut state = CalculatorState::new();
        digits(&mut state, "5");
        state.select_operator(Operator::Subtract);
        digits(&mut state, "8");
        let t = state.evaluate();
        assert!(t.succeeded);
        assert_eq!(operand(&state), "-3");
        assert_eq!(state.phase(), Phase::Result);
        match t.history {
            HistoryUpdate::Set(line) => assert_eq!(line.render(","), "5 − 8 ="),
            other => panic!("unexpected history update {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_twice_is_idempotent() {
        let mut state = CalculatorState::new();
        digits(&mut state, "2");
        state.select_operator(Operator::Add);
        digits(&mut state, "2");
        state.evaluate();
        let before = state.clone();
        assert_eq!(state.evaluate(), Transition::none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_evaluate_rounds_to_eight_places() {
        let mut state = CalculatorState::new();
        digits(&mut state, "1");
        state.select_operator(Operator::Divide);
        digits(&mut state, "3");
        state.evaluate();
        assert_eq!(operand(&state), "0.33333333");
    }

    #[test]
    fn test_evaluate_custom_precision() {
        let mut state = CalculatorState::with_decimal_places(2);
        digits(&mut state, "2");
        state.select_operator(Operator::Divide);
        digits(&mut state, "3");
        state.evaluate();
        assert_eq!(operand(&state), "0.67");
    }

    #[test]
    fn test_evaluate_divide_by_zero() {
        let mut state = CalculatorState::new();
        digits(&mut state, "7");
        state.select_operator(Operator::Divide);
        digits(&mut state, "0");
        let t = state.evaluate();
        assert_eq!(t.error, Some(CalcError::DivisionByZero));
        assert_eq!(operand(&state), "Error");
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(
            t.history,
            HistoryUpdate::Set(HistoryLine::Message("Cannot divide by zero".into()))
        );
    }

    #[test]
    fn test_evaluate_overflow() {
        let mut state = CalculatorState::new();
        digits(&mut state, &"9".repeat(200));
        state.select_operator(Operator::Multiply);
        digits(&mut state, &"9".repeat(200));
        let t = state.evaluate();
        assert_eq!(t.error, Some(CalcError::Overflow));
        assert_eq!(operand(&state), "Error");
    }

    // ===== Clear / backspace tests =====

    #[test]
    fn test_clear_restores_initial_tuple() {
        let mut state = CalculatorState::new();
        digits(&mut state, "12.5");
        state.select_operator(Operator::Multiply);
        digits(&mut state, "4");
        let t = state.clear();
        assert!(state.is_initial());
        assert!(t.cleared);
        assert_eq!(t.history, HistoryUpdate::Cleared);
    }

    #[test]
    fn test_clear_from_error() {
        let mut state = CalculatorState::new();
        state.digit(42);
        state.clear();
        assert!(state.is_initial());
    }

    #[test]
    fn test_backspace_keeps_pending() {
        let mut state = CalculatorState::new();
        digits(&mut state, "8");
        state.select_operator(Operator::Add);
        digits(&mut state, "25");
        state.backspace();
        assert_eq!(operand(&state), "2");
        assert_eq!(state.pending(), Some("8"));
        assert_eq!(state.operator(), Some(Operator::Add));
        assert!(!state.waiting_for_operand());
    }

    #[test]
    fn test_backspace_to_zero() {
        let mut state = CalculatorState::new();
        digits(&mut state, "5");
        state.backspace();
        assert_eq!(operand(&state), "0");
        state.backspace();
        assert_eq!(operand(&state), "0");
    }

    // ===== Snapshot tests =====

    #[test]
    fn test_snapshot_serializes() {
        let mut state = CalculatorState::new();
        digits(&mut state, "3");
        state.select_operator(Operator::Divide);
        let snap = state.snapshot();
        assert_eq!(snap.pending, "3");
        assert_eq!(snap.phase, Phase::OperatorPending);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"operator\":\"divide\""));
    }
}
