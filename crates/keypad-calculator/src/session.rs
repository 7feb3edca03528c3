//! Session: wires the Input Source, the state machine and the Display Sink
//!
//! One input is handled at a time and runs to completion. Timers are handed
//! to the [`Scheduler`]; when one fires the owner calls [`CalculatorSession::fire`].

use crate::config::CalculatorConfig;
use crate::core::format::format_operand;
use crate::core::{CalculatorState, HistoryUpdate, Phase, Transition};
use crate::display::{DisplayFlag, DisplaySink, MockDom};
use crate::input::{Input, Keypad};
use crate::timer::{ManualScheduler, Scheduler, TimerId, TimerTask};
use std::time::Duration;

/// A calculator bound to a display and a scheduler
#[derive(Debug)]
pub struct CalculatorSession<D: DisplaySink, S: Scheduler> {
    state: CalculatorState,
    keypad: Keypad,
    config: CalculatorConfig,
    display: D,
    scheduler: S,
    auto_clear: Option<TimerId>,
}

impl<D: DisplaySink, S: Scheduler> CalculatorSession<D, S> {
    /// Creates a session with the default configuration
    pub fn new(display: D, scheduler: S) -> Self {
        Self::with_config(CalculatorConfig::default(), display, scheduler)
    }

    /// Creates a session and renders the initial state
    pub fn with_config(config: CalculatorConfig, display: D, scheduler: S) -> Self {
        let mut session = Self {
            state: CalculatorState::with_decimal_places(config.decimal_places),
            keypad: Keypad::new(),
            config,
            display,
            scheduler,
            auto_clear: None,
        };
        session.render_operand();
        session.display.show_history("");
        session
    }

    /// The arithmetic state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// The keypad used to resolve clicks
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// The display sink
    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The scheduler
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Whether an error auto-clear is waiting to fire
    #[must_use]
    pub fn auto_clear_pending(&self) -> bool {
        self.auto_clear.is_some()
    }

    /// Runs one input through the state machine and publishes the result
    pub fn handle(&mut self, input: Input) -> Transition {
        let was_error = self.state.phase() == Phase::Error;

        let transition = match input {
            Input::Digit(d) => self.state.digit(d),
            Input::Decimal => self.state.decimal(),
            Input::Operator(op) => self.state.select_operator(op),
            Input::Evaluate => self.state.evaluate(),
            Input::Clear => self.state.clear(),
            Input::Backspace => self.state.backspace(),
        };

        tracing::debug!(
            ?input,
            phase = ?self.state.phase(),
            operand = self.state.operand().as_str(),
            changed = transition.changed,
            "handled input"
        );

        if was_error && self.state.phase() != Phase::Error {
            self.cancel_auto_clear();
            self.display.set_flag(DisplayFlag::Error, false);
            self.display.show_history("");
        }

        self.publish(&transition);
        transition
    }

    /// Handles a `KeyboardEvent.key`; unknown keys are ignored
    pub fn press_key(&mut self, key: &str) -> Option<Transition> {
        let Some(input) = Input::from_key(key) else {
            tracing::trace!(key, "ignoring unmapped key");
            return None;
        };
        self.pulse_button(input);
        Some(self.handle(input))
    }

    /// Handles a click on a keypad element; other elements are ignored
    pub fn click(&mut self, element_id: &str) -> Option<Transition> {
        let input = self.keypad.handle_click(element_id)?;
        self.pulse_button(input);
        Some(self.handle(input))
    }

    /// Runs a timer task that has come due
    pub fn fire(&mut self, task: TimerTask) {
        tracing::debug!(?task, "timer fired");
        match task {
            TimerTask::AutoClear => {
                self.auto_clear = None;
                self.handle(Input::Clear);
            }
            TimerTask::RemoveFlag(flag) => self.display.set_flag(flag, false),
            TimerTask::Release(button_id) => self.display.set_pressed(&button_id, false),
        }
    }

    fn publish(&mut self, transition: &Transition) {
        if transition.changed {
            self.render_operand();
        }

        match &transition.history {
            HistoryUpdate::Set(line) => {
                let text = line.render(&self.config.thousands_separator);
                self.display.show_history(&text);
            }
            HistoryUpdate::Cleared => self.display.show_history(""),
            HistoryUpdate::Unchanged => {}
        }

        if transition.cleared {
            self.display.set_flag(DisplayFlag::Error, false);
        }

        if transition.error.is_some() {
            self.display.set_flag(DisplayFlag::Success, false);
            self.display.set_flag(DisplayFlag::Error, true);
            self.schedule_auto_clear();
        }

        if transition.succeeded {
            self.display.set_flag(DisplayFlag::Success, true);
            self.scheduler.schedule(
                self.config.success_pulse(),
                TimerTask::RemoveFlag(DisplayFlag::Success),
            );
        }
    }

    fn render_operand(&mut self) {
        let text = format_operand(self.state.operand(), &self.config.thousands_separator);
        self.display.show_operand(&text);
    }

    fn pulse_button(&mut self, input: Input) {
        if let Some(button) = self.keypad.find_by_input(input) {
            let id = button.id.clone();
            self.display.set_pressed(&id, true);
            self.scheduler
                .schedule(self.config.key_press_pulse(), TimerTask::Release(id));
        }
    }

    fn schedule_auto_clear(&mut self) {
        self.cancel_auto_clear();
        let id = self
            .scheduler
            .schedule(self.config.error_clear_delay(), TimerTask::AutoClear);
        self.auto_clear = Some(id);
    }

    fn cancel_auto_clear(&mut self) {
        if let Some(id) = self.auto_clear.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<D: DisplaySink> CalculatorSession<D, ManualScheduler> {
    /// Moves the virtual clock forward, firing every task that comes due
    pub fn advance(&mut self, by: Duration) {
        for task in self.scheduler.advance(by) {
            self.fire(task);
        }
    }
}

impl CalculatorSession<MockDom, ManualScheduler> {
    /// Session over a mock DOM and a manual clock
    #[must_use]
    pub fn mock() -> Self {
        Self::mock_with_config(CalculatorConfig::default())
    }

    /// Mock session with a custom configuration
    #[must_use]
    pub fn mock_with_config(config: CalculatorConfig) -> Self {
        let dom = MockDom::calculator(&Keypad::new());
        Self::with_config(config, dom, ManualScheduler::new())
    }
}
