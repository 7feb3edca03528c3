//! DOM-backed display, `setTimeout` scheduler and the exported entry point

use crate::config::CalculatorConfig;
use crate::display::{
    DisplayFlag, DisplaySink, CONTAINER_ID, DISPLAY_ID, HISTORY_ID, PRESSED_CLASS,
};
use crate::input::Keypad;
use crate::session::CalculatorSession;
use crate::timer::{Scheduler, TimerId, TimerTask};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Event, KeyboardEvent, Window};

type BrowserSession = CalculatorSession<WebDisplay, BrowserScheduler>;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| js_error(format!("missing element #{id}")))
}

// Browser-side reports go straight to the console.
fn console_warn(message: &str, detail: &JsValue) {
    console::warn_2(&message.into(), detail);
}

fn toggle_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        console_warn(&format!("failed to toggle class {class}"), &err);
    }
}

/// Display Sink over the page's calculator markup
#[derive(Debug)]
pub struct WebDisplay {
    document: Document,
    display: Element,
    history: Element,
    container: Element,
}

impl WebDisplay {
    /// Looks up `#display`, `#history` and `#calculator`
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            display: element(document, DISPLAY_ID)?,
            history: element(document, HISTORY_ID)?,
            container: element(document, CONTAINER_ID)?,
        })
    }
}

impl DisplaySink for WebDisplay {
    fn show_operand(&mut self, text: &str) {
        self.display.set_text_content(Some(text));
    }

    fn show_history(&mut self, text: &str) {
        self.history.set_text_content(Some(text));
    }

    fn set_flag(&mut self, flag: DisplayFlag, on: bool) {
        toggle_class(&self.container, flag.class(), on);
    }

    fn set_pressed(&mut self, element_id: &str, on: bool) {
        if let Some(button) = self.document.get_element_by_id(element_id) {
            toggle_class(&button, PRESSED_CLASS, on);
        }
    }
}

/// Scheduler on `window.setTimeout`
///
/// Fired tasks are delivered back to the owning session through a weak
/// reference, so a dropped calculator simply stops reacting.
#[derive(Debug)]
pub struct BrowserScheduler {
    window: Window,
    session: Weak<RefCell<BrowserSession>>,
    next_id: u64,
    handles: HashMap<TimerId, i32>,
}

impl BrowserScheduler {
    fn new(window: Window, session: Weak<RefCell<BrowserSession>>) -> Self {
        Self {
            window,
            session,
            next_id: 0,
            handles: HashMap::new(),
        }
    }

    /// Number of browser timeouts not yet fired or cancelled
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.handles.len()
    }

    fn forget(&mut self, id: TimerId) {
        self.handles.remove(&id);
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);

        let session = self.session.clone();
        let callback = Closure::once_into_js(move || {
            let Some(session) = session.upgrade() else {
                return;
            };
            let Ok(mut session) = session.try_borrow_mut() else {
                console_warn("session busy, dropping timer", &format!("{task:?}").into());
                return;
            };
            session.scheduler_mut().forget(id);
            session.fire(task);
        });

        let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            );
        match scheduled {
            Ok(handle) => {
                self.handles.insert(id, handle);
            }
            Err(err) => console_warn("setTimeout failed", &err),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.handles.remove(&id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Calculator bound to the page, exported to JavaScript
///
/// ```js
/// import init, { BrowserCalculator } from "./keypad_calculator.js";
/// await init();
/// const calc = new BrowserCalculator('{"error_clear_delay_ms": 1500}');
/// calc.mount();
/// ```
#[wasm_bindgen]
#[derive(Debug)]
pub struct BrowserCalculator {
    session: Rc<RefCell<BrowserSession>>,
    document: Document,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Creates a calculator over the current document
    ///
    /// `config_json` may be omitted; missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<BrowserCalculator, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => CalculatorConfig::from_json(json).map_err(js_error)?,
            None => CalculatorConfig::default(),
        };

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        let display = WebDisplay::from_document(&document)?;

        let session = Rc::new_cyclic(|weak| {
            RefCell::new(CalculatorSession::with_config(
                config,
                display,
                BrowserScheduler::new(window, weak.clone()),
            ))
        });

        Ok(Self {
            session,
            document,
            listeners: Vec::new(),
        })
    }

    /// Attaches the keydown listener and one click listener per keypad button
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if !self.listeners.is_empty() {
            return Ok(());
        }

        let session = Rc::clone(&self.session);
        let on_key = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.ctrl_key() || event.meta_key() || event.alt_key() {
                return;
            }
            let handled = session
                .try_borrow_mut()
                .map(|mut s| s.press_key(&event.key()).is_some())
                .unwrap_or(false);
            if handled {
                event.prevent_default();
            }
        });
        self.document
            .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        self.listeners.push(on_key);

        for button in Keypad::new().buttons() {
            let target = element(&self.document, &button.id)?;
            let session = Rc::clone(&self.session);
            let id = button.id.clone();
            let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                if let Ok(mut s) = session.try_borrow_mut() {
                    s.click(&id);
                }
            });
            target.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            self.listeners.push(on_click);
        }

        console::log_1(&format!("calculator mounted ({} listeners)", self.listeners.len()).into());
        Ok(())
    }

    /// Feeds a `KeyboardEvent.key` value; returns whether it was recognised
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        self.session
            .try_borrow_mut()
            .map(|mut s| s.press_key(key).is_some())
            .unwrap_or(false)
    }

    /// Feeds a click on a keypad element; returns whether it was a button
    #[wasm_bindgen(js_name = handleButton)]
    pub fn handle_button(&self, element_id: &str) -> bool {
        self.session
            .try_borrow_mut()
            .map(|mut s| s.click(element_id).is_some())
            .unwrap_or(false)
    }

    /// The operand as stored, without separators
    #[wasm_bindgen(js_name = operandText)]
    pub fn operand_text(&self) -> String {
        self.session.borrow().state().operand().as_str().to_string()
    }

    /// State snapshot as JSON
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().state().snapshot()).map_err(js_error)
    }
}

/// Module start hook
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::log_1(&"keypad-calculator loaded".into());
}
