use std::rc::Rc;

use crate::analytics::{AnalyticsEvent, EventSink};
use crate::dom::{Display, Document, Element, EventKind, Outcome};
use crate::markup;
use crate::page::Services;

/// The lead-capture dialog and the controls that open and close it.
#[derive(Clone)]
pub struct LeadModal<E: Element> {
    modal: E,
    analytics: Rc<dyn EventSink>,
}

impl<E: Element> LeadModal<E> {
    pub fn new(modal: E, analytics: Rc<dyn EventSink>) -> Self {
        Self { modal, analytics }
    }

    pub fn open(&self) {
        self.modal.set_display(Display::Flex);
        self.analytics.record(&AnalyticsEvent::modal_open());
    }

    pub fn close(&self) {
        self.modal.set_display(Display::None);
    }

    /// Closes only when the click landed on the backdrop itself.
    pub fn backdrop_click(&self, target: Option<&E>) {
        if target.is_some_and(|target| target.is_same(&self.modal)) {
            self.close();
        }
    }
}

/// Wires the trigger, close button and backdrop. Needs all three elements.
pub fn attach<D: Document>(document: &D, services: &Services) -> bool {
    let (Some(trigger), Some(modal), Some(close)) = (
        document.element_by_id(markup::LEAD_MODAL_TRIGGER),
        document.element_by_id(markup::LEAD_MODAL),
        document.element_by_id(markup::CLOSE_MODAL),
    ) else {
        tracing::debug!("Lead modal markup incomplete, modal disabled");
        return false;
    };

    let controller = LeadModal::new(modal.clone(), services.analytics.clone());

    let on_open = controller.clone();
    trigger.listen(
        EventKind::Click,
        Box::new(move |_| {
            on_open.open();
            Outcome::Proceed
        }),
    );

    let on_close = controller.clone();
    close.listen(
        EventKind::Click,
        Box::new(move |_| {
            on_close.close();
            Outcome::Proceed
        }),
    );

    modal.listen(
        EventKind::Click,
        Box::new(move |event| {
            controller.backdrop_click(event.target.as_ref());
            Outcome::Proceed
        }),
    );

    true
}
