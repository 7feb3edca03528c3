//! Unified calculator driver
//!
//! Test scenarios are written once against [`CalculatorDriver`] and run on
//! any front end that implements it: the mock DOM here, or a browser
//! harness wrapping the WASM build.

use crate::display::{DisplayFlag, MockDom};
use crate::session::CalculatorSession;
use crate::timer::ManualScheduler;
use std::time::Duration;

/// Abstract driver for calculator interactions
pub trait CalculatorDriver {
    /// Presses a keyboard key (`KeyboardEvent.key` value)
    fn press(&mut self, key: &str);

    /// Clicks an element by id
    fn click(&mut self, element_id: &str);

    /// Lets time pass so scheduled timers can fire
    fn wait(&mut self, duration: Duration);

    /// Text on the main readout
    fn display_text(&self) -> String;

    /// Text on the history line
    fn history_text(&self) -> String;

    /// Whether a transient state flag is raised
    fn has_flag(&self, flag: DisplayFlag) -> bool;

    /// Types a sequence of single-character keys, e.g. `"12+3="`
    fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.press(c.encode_utf8(&mut [0; 4]));
        }
    }
}

/// Driver over a mock DOM and a manual clock
#[derive(Debug)]
pub struct MockDriver {
    session: CalculatorSession<MockDom, ManualScheduler>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Creates a driver with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(CalculatorSession::mock())
    }

    /// Wraps an existing session
    #[must_use]
    pub fn with_session(session: CalculatorSession<MockDom, ManualScheduler>) -> Self {
        Self { session }
    }

    /// The underlying session
    #[must_use]
    pub fn session(&self) -> &CalculatorSession<MockDom, ManualScheduler> {
        &self.session
    }
}

impl CalculatorDriver for MockDriver {
    fn press(&mut self, key: &str) {
        self.session.press_key(key);
    }

    fn click(&mut self, element_id: &str) {
        self.session.click(element_id);
    }

    fn wait(&mut self, duration: Duration) {
        self.session.advance(duration);
    }

    fn display_text(&self) -> String {
        self.session.display().display_text().to_string()
    }

    fn history_text(&self) -> String {
        self.session.display().history_text().to_string()
    }

    fn has_flag(&self, flag: DisplayFlag) -> bool {
        self.session.display().has_flag(flag)
    }
}

// ===== Unified scenarios =====
// These run against ANY CalculatorDriver implementation

/// Digits concatenate, a leading zero collapses and only one point is kept
pub fn verify_digit_entry<D: CalculatorDriver>(driver: &mut D) {
    driver.press("Escape");
    driver.type_keys("007");
    assert_eq!(driver.display_text(), "7");
    driver.type_keys("..5.0");
    assert_eq!(driver.display_text(), "7.50");
    driver.press("Escape");
    driver.type_keys("1234567");
    assert_eq!(driver.display_text(), "1,234,567");
    driver.press("Escape");
}

/// `5 + 3 + 2 =` evaluates left to right
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) {
    driver.press("Escape");
    driver.type_keys("5+3+");
    assert_eq!(driver.display_text(), "8");
    assert_eq!(driver.history_text(), "8 +");
    driver.type_keys("2=");
    assert_eq!(driver.display_text(), "10");
    assert_eq!(driver.history_text(), "8 + 2 =");
    driver.press("Escape");
}

/// Repeated `=` without new input changes nothing
pub fn verify_repeated_equals<D: CalculatorDriver>(driver: &mut D) {
    driver.press("Escape");
    driver.type_keys("6*7=");
    assert_eq!(driver.display_text(), "42");
    driver.type_keys("==");
    assert_eq!(driver.display_text(), "42");
    assert_eq!(driver.history_text(), "6 × 7 =");
    driver.press("Escape");
}

/// `1 / 3 =` is rounded to eight places
pub fn verify_rounding<D: CalculatorDriver>(driver: &mut D) {
    driver.press("Escape");
    driver.type_keys("1/3=");
    assert_eq!(driver.display_text(), "0.33333333");
    driver.press("Escape");
    driver.type_keys(".1+.2=");
    assert_eq!(driver.display_text(), "0.3");
    driver.press("Escape");
}

/// `7 / 0 =` shows Error and recovers after `delay`
pub fn verify_divide_by_zero_recovery<D: CalculatorDriver>(driver: &mut D, delay: Duration) {
    driver.press("Escape");
    driver.type_keys("7/0=");
    assert_eq!(driver.display_text(), "Error");
    assert_eq!(driver.history_text(), "Cannot divide by zero");
    assert!(driver.has_flag(DisplayFlag::Error));
    driver.wait(delay);
    assert_eq!(driver.display_text(), "0");
    assert_eq!(driver.history_text(), "");
    assert!(!driver.has_flag(DisplayFlag::Error));
}

/// Backspace drops one character and bottoms out at "0"
pub fn verify_backspace<D: CalculatorDriver>(driver: &mut D) {
    driver.press("Escape");
    driver.type_keys("123");
    driver.press("Backspace");
    assert_eq!(driver.display_text(), "12");
    driver.press("Escape");
    driver.type_keys("5");
    driver.press("Backspace");
    assert_eq!(driver.display_text(), "0");
    driver.press("Backspace");
    assert_eq!(driver.display_text(), "0");
}

/// Clear wipes operand and history from any state
pub fn verify_clear<D: CalculatorDriver>(driver: &mut D) {
    driver.type_keys("9-4");
    driver.press("Escape");
    assert_eq!(driver.display_text(), "0");
    assert_eq!(driver.history_text(), "");
    driver.type_keys("3=");
    assert_eq!(driver.display_text(), "3");
    driver.press("Escape");
}

/// Runs every scenario in sequence
pub fn verify_all<D: CalculatorDriver>(driver: &mut D, error_delay: Duration) {
    verify_digit_entry(driver);
    verify_chaining(driver);
    verify_repeated_equals(driver);
    verify_rounding(driver);
    verify_divide_by_zero_recovery(driver, error_delay);
    verify_backspace(driver);
    verify_clear(driver);
}
