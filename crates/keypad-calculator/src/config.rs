//! Calculator configuration

use crate::core::format::DEFAULT_SEPARATOR;
use crate::core::CalculatorState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Timing and formatting settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Delay before an error clears itself
    pub error_clear_delay_ms: u64,
    /// How long the success flag stays raised
    pub success_pulse_ms: u64,
    /// How long a button shows as pressed after a key press or click
    pub key_press_pulse_ms: u64,
    /// Decimal places kept after each calculation
    pub decimal_places: u32,
    /// Thousands separator for the integer portion
    pub thousands_separator: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            error_clear_delay_ms: 2000,
            success_pulse_ms: 300,
            key_press_pulse_ms: 150,
            decimal_places: CalculatorState::DEFAULT_DECIMAL_PLACES,
            thousands_separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Largest supported precision; f64 carries ~15 significant digits
    pub const MAX_DECIMAL_PLACES: u32 = 15;

    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error auto-clear delay
    #[must_use]
    pub fn with_error_clear_delay(mut self, delay: Duration) -> Self {
        self.error_clear_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the success pulse length
    #[must_use]
    pub fn with_success_pulse(mut self, pulse: Duration) -> Self {
        self.success_pulse_ms = pulse.as_millis() as u64;
        self
    }

    /// Set the pressed-button pulse length
    #[must_use]
    pub fn with_key_press_pulse(mut self, pulse: Duration) -> Self {
        self.key_press_pulse_ms = pulse.as_millis() as u64;
        self
    }

    /// Set the result precision
    #[must_use]
    pub const fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    /// Set the thousands separator
    #[must_use]
    pub fn with_thousands_separator(mut self, separator: &str) -> Self {
        self.thousands_separator = separator.to_string();
        self
    }

    /// Error auto-clear delay
    #[must_use]
    pub const fn error_clear_delay(&self) -> Duration {
        Duration::from_millis(self.error_clear_delay_ms)
    }

    /// Success pulse length
    #[must_use]
    pub const fn success_pulse(&self) -> Duration {
        Duration::from_millis(self.success_pulse_ms)
    }

    /// Pressed-button pulse length
    #[must_use]
    pub const fn key_press_pulse(&self) -> Duration {
        Duration::from_millis(self.key_press_pulse_ms)
    }

    /// Checks values the calculator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decimal_places > Self::MAX_DECIMAL_PLACES {
            return Err(ConfigError::invalid(
                "decimal_places",
                format!("{} exceeds {}", self.decimal_places, Self::MAX_DECIMAL_PLACES),
            ));
        }
        if self
            .thousands_separator
            .chars()
            .any(|c| c.is_ascii_digit() || c == '.' || c == '-')
        {
            return Err(ConfigError::invalid(
                "thousands_separator",
                format!("{:?} would be ambiguous with operand text", self.thousands_separator),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
