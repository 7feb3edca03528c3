//! Browser front end
//!
//! Binds the session to the real DOM: a web-sys Display Sink, a
//! `setTimeout` scheduler and keyboard/click listeners.

mod browser;

pub use browser::{BrowserCalculator, BrowserScheduler, WebDisplay};
