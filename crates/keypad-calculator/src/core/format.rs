//! Display formatting for the main readout and the history line

use crate::core::{Operand, Operator};

/// Default thousands separator (en-US grouping)
pub const DEFAULT_SEPARATOR: &str = ",";

/// Formats operand text for display
///
/// The integer portion is grouped in threes with `separator`; the fractional
/// portion, including a trailing decimal point, is passed through verbatim.
#[must_use]
pub fn format_number(text: &str, separator: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 * separator.len());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}{fraction}")
}

/// Formats an operand, rendering the error sentinel as-is
#[must_use]
pub fn format_operand(operand: &Operand, separator: &str) -> String {
    match operand {
        Operand::Number(text) => format_number(text, separator),
        Operand::Error => Operand::ERROR_TEXT.to_string(),
    }
}

/// History line after an operator is chosen: `"12 +"`
#[must_use]
pub fn pending_line(pending: &str, op: Operator, separator: &str) -> String {
    format!("{} {}", format_number(pending, separator), op.symbol())
}

/// History line after a completed calculation: `"12 + 3 ="`
#[must_use]
pub fn completed_line(pending: &str, op: Operator, operand: &str, separator: &str) -> String {
    format!(
        "{} {} {} =",
        format_number(pending, separator),
        op.symbol(),
        format_number(operand, separator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_small_numbers_untouched() {
        assert_eq!(format_number("0", ","), "0");
        assert_eq!(format_number("999", ","), "999");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_number("1000", ","), "1,000");
        assert_eq!(format_number("1234567", ","), "1,234,567");
        assert_eq!(format_number("100000", ","), "100,000");
    }

    #[test]
    fn test_format_fraction_verbatim() {
        assert_eq!(format_number("12345.6789", ","), "12,345.6789");
        assert_eq!(format_number("1000.", ","), "1,000.");
        assert_eq!(format_number("0.00001", ","), "0.00001");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_number("-1234.5", ","), "-1,234.5");
        assert_eq!(format_number("-12", ","), "-12");
    }

    #[test]
    fn test_format_custom_separator() {
        assert_eq!(format_number("1234567", "\u{202f}"), "1\u{202f}234\u{202f}567");
        assert_eq!(format_number("1234567", ""), "1234567");
    }

    #[test]
    fn test_format_operand_error() {
        assert_eq!(format_operand(&Operand::Error, ","), "Error");
    }

    #[test]
    fn test_pending_line() {
        assert_eq!(pending_line("5", Operator::Add, ","), "5 +");
        assert_eq!(pending_line("1200", Operator::Divide, ","), "1,200 ÷");
    }

    #[test]
    fn test_completed_line() {
        assert_eq!(completed_line("5", Operator::Subtract, "3", ","), "5 − 3 =");
        assert_eq!(completed_line("2", Operator::Multiply, "4000", ","), "2 × 4,000 =");
    }
}
