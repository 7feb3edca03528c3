//! Display Sink and a mock DOM that implements it
//!
//! The session publishes the readout text, the history line and a few
//! transient CSS flags through [`DisplaySink`]. [`MockDom`] records all of
//! it in an element tree so tests can assert on what a browser would show.

use crate::input::Keypad;
use std::collections::HashMap;

/// Element id of the main readout
pub const DISPLAY_ID: &str = "display";
/// Element id of the history line
pub const HISTORY_ID: &str = "history";
/// Element id of the calculator container that carries state flags
pub const CONTAINER_ID: &str = "calculator";
/// CSS class applied to a button while it shows as pressed
pub const PRESSED_CLASS: &str = "pressed";

/// Transient state flags for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFlag {
    /// An arithmetic error is shown
    Error,
    /// A calculation just succeeded
    Success,
}

impl DisplayFlag {
    /// CSS class for the flag
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

/// Where the calculator publishes what the user sees
pub trait DisplaySink {
    /// Shows the formatted operand on the main readout
    fn show_operand(&mut self, text: &str);

    /// Shows the history line (empty string hides it)
    fn show_history(&mut self, text: &str);

    /// Raises or lowers a transient state flag
    fn set_flag(&mut self, flag: DisplayFlag, on: bool);

    /// Marks a keypad button as pressed or released
    fn set_pressed(&mut self, button_id: &str, pressed: bool);
}

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomElement {
    /// Element id
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// CSS classes
    pub classes: Vec<String>,
}

impl DomElement {
    /// Creates a new element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// Sets the id
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Adds a class if not already present
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Adds or removes a class
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Mock DOM for driving the calculator without a browser
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<String, DomElement>,
    render_count: usize,
}

impl MockDom {
    /// Creates an empty mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the calculator page: container, readout, history line and keypad
    #[must_use]
    pub fn calculator(keypad: &Keypad) -> Self {
        let mut dom = Self::new();
        dom.register_element(
            DomElement::new("div")
                .with_id(CONTAINER_ID)
                .with_class("calculator"),
        );
        dom.register_element(
            DomElement::new("div")
                .with_id(DISPLAY_ID)
                .with_class("display")
                .with_text("0"),
        );
        dom.register_element(
            DomElement::new("div")
                .with_id(HISTORY_ID)
                .with_class("history"),
        );
        for button in keypad.create_dom_elements() {
            dom.register_element(button);
        }
        dom
    }

    /// Registers an element for id lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Gets an element by id
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Gets element text by id
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Text on the main readout
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.get_element_text(DISPLAY_ID).unwrap_or_default()
    }

    /// Text of the history line
    #[must_use]
    pub fn history_text(&self) -> &str {
        self.get_element_text(HISTORY_ID).unwrap_or_default()
    }

    /// Whether a state flag is currently raised
    #[must_use]
    pub fn has_flag(&self, flag: DisplayFlag) -> bool {
        self.get_element(CONTAINER_ID)
            .is_some_and(|e| e.has_class(flag.class()))
    }

    /// Whether a button currently shows as pressed
    #[must_use]
    pub fn is_pressed(&self, button_id: &str) -> bool {
        self.get_element(button_id)
            .is_some_and(|e| e.has_class(PRESSED_CLASS))
    }

    /// Number of times the readout was rendered
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.text_content = text.to_string();
        }
    }
}

impl DisplaySink for MockDom {
    fn show_operand(&mut self, text: &str) {
        self.render_count += 1;
        self.set_element_text(DISPLAY_ID, text);
    }

    fn show_history(&mut self, text: &str) {
        self.set_element_text(HISTORY_ID, text);
    }

    fn set_flag(&mut self, flag: DisplayFlag, on: bool) {
        if let Some(container) = self.elements.get_mut(CONTAINER_ID) {
            container.toggle_class(flag.class(), on);
        }
    }

    fn set_pressed(&mut self, button_id: &str, pressed: bool) {
        if let Some(button) = self.elements.get_mut(button_id) {
            button.toggle_class(PRESSED_CLASS, pressed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== DomElement tests =====

    #[test]
    fn test_dom_element_builder() {
        let elem = DomElement::new("button")
            .with_id("btn-1")
            .with_text("1")
            .with_class("keypad-btn");
        assert_eq!(elem.tag, "button");
        assert_eq!(elem.id, "btn-1");
        assert_eq!(elem.text_content, "1");
        assert!(elem.has_class("keypad-btn"));
    }

    #[test]
    fn test_dom_element_classes_dedup_and_toggle() {
        let mut elem = DomElement::new("div");
        elem.add_class("a");
        elem.add_class("a");
        assert_eq!(elem.classes.len(), 1);
        elem.toggle_class("a", false);
        assert!(!elem.has_class("a"));
        elem.toggle_class("b", true);
        assert!(elem.has_class("b"));
    }

    // ===== DisplayFlag tests =====

    #[test]
    fn test_display_flag_classes() {
        assert_eq!(DisplayFlag::Error.class(), "error");
        assert_eq!(DisplayFlag::Success.class(), "success");
    }

    // ===== MockDom tests =====

    #[test]
    fn test_mock_dom_calculator_layout() {
        let dom = MockDom::calculator(&Keypad::new());
        assert_eq!(dom.display_text(), "0");
        assert_eq!(dom.history_text(), "");
        assert!(dom.get_element(CONTAINER_ID).is_some());
        assert!(dom.get_element("btn-equals").is_some());
        assert!(dom.get_element("btn-backspace").is_some());
    }

    #[test]
    fn test_mock_dom_sink_updates_text() {
        let mut dom = MockDom::calculator(&Keypad::new());
        dom.show_operand("1,234");
        dom.show_history("1,234 +");
        assert_eq!(dom.display_text(), "1,234");
        assert_eq!(dom.history_text(), "1,234 +");
        assert_eq!(dom.render_count(), 1);
    }

    #[test]
    fn test_mock_dom_flags() {
        let mut dom = MockDom::calculator(&Keypad::new());
        dom.set_flag(DisplayFlag::Error, true);
        assert!(dom.has_flag(DisplayFlag::Error));
        assert!(!dom.has_flag(DisplayFlag::Success));
        dom.set_flag(DisplayFlag::Error, false);
        assert!(!dom.has_flag(DisplayFlag::Error));
    }

    #[test]
    fn test_mock_dom_pressed() {
        let mut dom = MockDom::calculator(&Keypad::new());
        dom.set_pressed("btn-5", true);
        assert!(dom.is_pressed("btn-5"));
        dom.set_pressed("btn-5", false);
        assert!(!dom.is_pressed("btn-5"));
        dom.set_pressed("no-such-button", true);
        assert!(!dom.is_pressed("no-such-button"));
    }

    #[test]
    fn test_register_element_without_id_ignored() {
        let mut dom = MockDom::new();
        dom.register_element(DomElement::new("span"));
        assert!(dom.get_element("").is_none());
    }
}
