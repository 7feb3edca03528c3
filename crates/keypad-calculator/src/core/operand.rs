//! The operand being typed or just computed

use crate::core::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

/// Operand text shown on the main readout
///
/// A `Number` holds at most one decimal point and digits otherwise, with an
/// optional leading `-` on computed results. `Error` replaces the magic
/// "Error" string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Decimal number in progress or computed
    Number(String),
    /// Sentinel shown after an arithmetic error
    Error,
}

impl Default for Operand {
    fn default() -> Self {
        Self::zero()
    }
}

impl Operand {
    /// Text of the error sentinel
    pub const ERROR_TEXT: &'static str = "Error";

    /// The initial operand, "0"
    #[must_use]
    pub fn zero() -> Self {
        Self::Number("0".to_string())
    }

    /// Operand holding a single digit
    pub fn digit(d: u8) -> CalcResult<Self> {
        Ok(Self::Number(digit_char(d)?.to_string()))
    }

    /// Operand for a computed value
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self::Number(format!("{value}"))
    }

    /// Returns the raw operand text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(text) => text,
            Self::Error => Self::ERROR_TEXT,
        }
    }

    /// Returns true for the error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if the operand contains a decimal point
    #[must_use]
    pub fn has_decimal(&self) -> bool {
        matches!(self, Self::Number(text) if text.contains('.'))
    }

    /// Appends a digit, collapsing a lone leading zero
    pub fn push_digit(&mut self, d: u8) -> CalcResult<()> {
        let c = digit_char(d)?;
        match self {
            Self::Number(text) if text != "0" => text.push(c),
            _ => *self = Self::Number(c.to_string()),
        }
        Ok(())
    }

    /// Appends a decimal point unless one is already present
    ///
    /// Returns false when nothing changed.
    pub fn push_decimal(&mut self) -> bool {
        match self {
            Self::Number(text) if text.contains('.') => false,
            Self::Number(text) => {
                text.push('.');
                true
            }
            Self::Error => {
                *self = Self::Number("0.".to_string());
                true
            }
        }
    }

    /// Drops the last character; anything shorter than two characters
    /// (or a bare sign) becomes "0"
    pub fn backspace(&mut self) {
        if let Self::Number(text) = self {
            if text.chars().count() > 1 {
                text.pop();
                if text != "-" {
                    return;
                }
            }
        }
        *self = Self::zero();
    }

    /// Parses the operand as a number
    pub fn value(&self) -> CalcResult<f64> {
        match self {
            Self::Number(text) => text
                .parse::<f64>()
                .map_err(|e| CalcError::invalid_input(format!("operand {text:?}: {e}"))),
            Self::Error => Err(CalcError::invalid_input("operand is in error state")),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn digit_char(d: u8) -> CalcResult<char> {
    char::from_digit(u32::from(d), 10).ok_or_else(|| CalcError::invalid_input(format!("digit {d}")))
}
