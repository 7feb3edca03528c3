//! Keypad Calculator
//!
//! A four-function calculator as a small state machine, with a browser
//! front end behind the `wasm` feature.
//!
//! - [`core`]: operand editing, arithmetic, the state machine and formatting
//! - [`input`]: keyboard and keypad mapping (the Input Source)
//! - [`display`]: the Display Sink trait and a mock DOM
//! - [`session`]: wiring between the three, plus error auto-clear and pulses
//!
//! # Example
//!
//! ```rust
//! use keypad_calculator::prelude::*;
//!
//! let mut session = CalculatorSession::mock();
//! for key in ["5", "+", "3", "+", "2", "Enter"] {
//!     session.press_key(key);
//! }
//! assert_eq!(session.display().display_text(), "10");
//! assert_eq!(session.display().history_text(), "8 + 2 =");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod display;
pub mod driver;
pub mod input;
pub mod session;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{CalculatorConfig, ConfigError};
    pub use crate::core::{
        CalcError, CalcResult, CalculatorState, HistoryLine, HistoryUpdate, Operand, Operator,
        Phase, StateSnapshot, Transition,
    };
    pub use crate::display::{DisplayFlag, DisplaySink, DomElement, MockDom};
    pub use crate::driver::{CalculatorDriver, MockDriver};
    pub use crate::input::{Input, Keypad, KeypadButtonDef};
    pub use crate::session::CalculatorSession;
    pub use crate::timer::{ManualScheduler, Scheduler, TimerId, TimerTask};

    #[cfg(feature = "wasm")]
    pub use crate::wasm::BrowserCalculator;
}
