//! Drives a mock calculator through a few key sequences and prints the
//! readout after each one.
//!
//! ```text
//! RUST_LOG=keypad_calculator=debug cargo run -p keypad-calculator --example scripted_session
//! ```

use keypad_calculator::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCRIPTS: &[&str] = &["12+7=", "5+3+2=", "1/3=", ".1+.2=", "7/0=", "1234567*3="];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("keypad_calculator=debug")),
        )
        .with_target(false)
        .init();

    let mut driver = MockDriver::new();

    for script in SCRIPTS {
        driver.press("Escape");
        driver.type_keys(script);
        println!(
            "{script:<12} => {:>14}   [{}]",
            driver.display_text(),
            driver.history_text()
        );
        driver.wait(Duration::from_secs(2));
    }

    println!("\nstate: {:?}", driver.session().state().snapshot());
}
