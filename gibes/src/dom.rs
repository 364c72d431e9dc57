//! Capability traits over the page document and the browser window.
//!
//! Behaviors only ever talk to the page through these traits, so the same
//! controllers run against the real DOM in the browser and against the
//! in-memory document in tests.

use std::time::Duration;

/// Values written to an element's inline `display` style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Flex,
    None,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Flex => "flex",
            Display::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
        }
    }
}

/// A dispatched user-interaction event.
#[derive(Debug, Clone)]
pub struct Event<E> {
    pub kind: EventKind,
    /// The element the event originated on, not the one listening.
    pub target: Option<E>,
}

/// What a handler asks the environment to do after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Proceed,
    PreventDefault,
}

/// Returned by visibility callbacks to keep or drop the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observe {
    Continue,
    Stop,
}

/// One intersection report for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    /// Visible fraction of the element, from 0.0 to 1.0.
    pub ratio: f64,
    /// Whether any part of the element intersects the viewport.
    pub intersecting: bool,
}

impl Visibility {
    /// True once the element intersects the viewport with at least `threshold` of it showing.
    pub fn reaches(&self, threshold: f64) -> bool {
        self.intersecting && self.ratio >= threshold
    }
}

pub type Handler<E> = Box<dyn FnMut(&Event<E>) -> Outcome>;

pub trait Element: Clone + 'static {
    /// Upper-case tag name, e.g. `BUTTON`.
    fn tag_name(&self) -> String;

    /// Reads a `data-*` attribute by its dataset key (`data-target` => `target`).
    fn data(&self, key: &str) -> Option<String>;

    fn set_text(&self, text: &str);

    fn text(&self) -> String;

    fn set_display(&self, display: Display);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Sets the `value` of a form control. Non-controls ignore it.
    fn set_value(&self, value: &str);

    /// Named entries of a form element, in document order. Empty for non-forms.
    fn form_entries(&self) -> Vec<(String, String)>;

    /// Restores every control of a form element to its markup default.
    fn reset_form(&self);

    /// Descendants matching a CSS selector.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    /// Dispatches a synthetic click through the normal listeners.
    fn click(&self);

    /// Identity comparison, not structural equality.
    fn is_same(&self, other: &Self) -> bool;

    fn listen(&self, kind: EventKind, handler: Handler<Self>);
}

pub trait Document: Clone + 'static {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn query_selector(&self, selector: &str) -> Option<Self::Element> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Reports the visibility of `target` every time it crosses `threshold`.
    fn observe_visibility(
        &self,
        target: &Self::Element,
        threshold: f64,
        callback: Box<dyn FnMut(Visibility) -> Observe>,
    );
}

/// Window-level globals: blocking dialogs, navigation and scheduling.
pub trait Window {
    /// Shows a blocking message to the visitor.
    fn alert(&self, message: &str);

    fn redirect(&self, href: &str);

    /// Runs `callback` before the next repaint with the frame timestamp in ms.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);
}
