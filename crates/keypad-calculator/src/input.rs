//! Input Source: keypad layout and keyboard mapping
//!
//! Pointer clicks and key presses both resolve to an [`Input`], so the
//! session only ever deals with one kind of event.
//!
//! Layout:
//! ```text
//! [ C ] [ ⌫ ] [ ÷ ] [ × ]
//! [ 7 ] [ 8 ] [ 9 ] [ − ]
//! [ 4 ] [ 5 ] [ 6 ] [ + ]
//! [ 1 ] [ 2 ] [ 3 ] [ = ]
//! [   0   ]   [ . ]
//! ```

use crate::core::Operator;
use crate::display::DomElement;

/// A single calculator input, independent of where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    Decimal,
    /// Operator selection
    Operator(Operator),
    /// `=` / Enter
    Evaluate,
    /// Reset everything
    Clear,
    /// Delete the last character
    Backspace,
}

impl Input {
    /// Returns the keypad label for this input
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Evaluate => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::Backspace => "\u{232b}".to_string(),
        }
    }

    /// Returns the DOM element id of the keypad button for this input
    #[must_use]
    pub fn button_id(&self) -> String {
        match self {
            Self::Digit(d) => format!("btn-{d}"),
            Self::Decimal => "btn-decimal".to_string(),
            Self::Operator(op) => format!("btn-{}", op.name()),
            Self::Evaluate => "btn-equals".to_string(),
            Self::Clear => "btn-clear".to_string(),
            Self::Backspace => "btn-backspace".to_string(),
        }
    }

    /// Maps a `KeyboardEvent.key` value to an input
    ///
    /// Unknown keys map to `None` and are ignored by the session.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | "=" => return Some(Self::Evaluate),
            "Escape" | "Delete" | "c" | "C" => return Some(Self::Clear),
            "Backspace" => return Some(Self::Backspace),
            _ => {}
        }

        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };

        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            '.' | ',' => Some(Self::Decimal),
            _ => Operator::from_char(c).map(Self::Operator),
        }
    }
}

/// A single keypad button definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The input this button produces
    pub input: Input,
    /// The DOM element id for this button
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
    /// Number of columns the button spans
    pub span: usize,
}

impl KeypadButtonDef {
    /// Creates a single-cell button
    #[must_use]
    pub fn new(input: Input, row: usize, col: usize) -> Self {
        Self {
            id: input.button_id(),
            input,
            row,
            col,
            span: 1,
        }
    }

    /// Makes the button span several columns
    #[must_use]
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Returns true if the button covers the given cell
    #[must_use]
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && col >= self.col && col < self.col + self.span
    }
}

/// The calculator keypad
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButtonDef>,
    rows: usize,
    cols: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    /// Creates the standard keypad
    #[must_use]
    pub fn new() -> Self {
        let buttons = vec![
            // Row 0: C ⌫ ÷ ×
            KeypadButtonDef::new(Input::Clear, 0, 0),
            KeypadButtonDef::new(Input::Backspace, 0, 1),
            KeypadButtonDef::new(Input::Operator(Operator::Divide), 0, 2),
            KeypadButtonDef::new(Input::Operator(Operator::Multiply), 0, 3),
            // Row 1: 7 8 9 −
            KeypadButtonDef::new(Input::Digit(7), 1, 0),
            KeypadButtonDef::new(Input::Digit(8), 1, 1),
            KeypadButtonDef::new(Input::Digit(9), 1, 2),
            KeypadButtonDef::new(Input::Operator(Operator::Subtract), 1, 3),
            // Row 2: 4 5 6 +
            KeypadButtonDef::new(Input::Digit(4), 2, 0),
            KeypadButtonDef::new(Input::Digit(5), 2, 1),
            KeypadButtonDef::new(Input::Digit(6), 2, 2),
            KeypadButtonDef::new(Input::Operator(Operator::Add), 2, 3),
            // Row 3: 1 2 3 =
            KeypadButtonDef::new(Input::Digit(1), 3, 0),
            KeypadButtonDef::new(Input::Digit(2), 3, 1),
            KeypadButtonDef::new(Input::Digit(3), 3, 2),
            KeypadButtonDef::new(Input::Evaluate, 3, 3),
            // Row 4: 0 .
            KeypadButtonDef::new(Input::Digit(0), 4, 0).with_span(2),
            KeypadButtonDef::new(Input::Decimal, 4, 2),
        ];

        Self {
            buttons,
            rows: 5,
            cols: 4,
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Gets the button covering a grid cell
    #[must_use]
    pub fn button_at(&self, row: usize, col: usize) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.covers(row, col))
    }

    /// Finds a button by element id
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Finds the button producing an input
    #[must_use]
    pub fn find_by_input(&self, input: Input) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.input == input)
    }

    /// Resolves a click on an element id
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<Input> {
        self.find_by_id(element_id).map(|b| b.input)
    }

    /// Creates DOM elements for all keypad buttons
    #[must_use]
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.buttons
            .iter()
            .map(|btn| {
                let mut elem = DomElement::new("button")
                    .with_id(&btn.id)
                    .with_text(&btn.input.label())
                    .with_class("keypad-btn");
                if btn.span > 1 {
                    elem = elem.with_class("keypad-wide");
                }
                if matches!(btn.input, Input::Operator(_)) {
                    elem = elem.with_class("keypad-operator");
                }
                elem
            })
            .collect()
    }
}
