use gibes::dom::{
    Display, Document, Element, Event, EventKind, Handler, Observe, Outcome, Visibility,
};
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    FormData, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList,
};

fn collect(list: Result<NodeList, JsValue>, selector: &str) -> Vec<WebElement> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect(),
        Err(e) => {
            tracing::warn!("Query {} failed: {:?}", selector, e);
            Vec::new()
        }
    }
}

#[derive(Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        collect(self.document.query_selector_all(selector), selector)
    }

    fn observe_visibility(
        &self,
        target: &WebElement,
        threshold: f64,
        mut callback: Box<dyn FnMut(Visibility) -> Observe>,
    ) {
        let observed = target.0.clone();
        let closure = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let visibility = Visibility {
                        ratio: entry.intersection_ratio(),
                        intersecting: entry.is_intersecting(),
                    };
                    if callback(visibility) == Observe::Stop {
                        observer.unobserve(&observed);
                        break;
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        // Reported ratios can land just under the threshold when crossing it,
        // so full visibility is observed as well.
        let thresholds = Array::of2(&JsValue::from_f64(threshold), &JsValue::from_f64(1.0));
        let options = IntersectionObserverInit::new();
        options.set_threshold(&thresholds);

        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options) {
            Ok(observer) => observer.observe(&target.0),
            Err(e) => tracing::error!("Failed to create intersection observer: {:?}", e),
        }

        closure.forget();
    }
}

#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

impl Element for WebElement {
    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn data(&self, key: &str) -> Option<String> {
        self.0.get_attribute(&format!("data-{}", key))
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_display(&self, display: Display) {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = element.style().set_property("display", display.as_css()) {
            tracing::warn!("Failed to set display: {:?}", e);
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            tracing::warn!("Failed to add class {}: {:?}", class, e);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            tracing::warn!("Failed to remove class {}: {:?}", class, e);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_value(&self, value: &str) {
        if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        }
    }

    fn form_entries(&self) -> Vec<(String, String)> {
        let Some(form) = self.0.dyn_ref::<HtmlFormElement>() else {
            return Vec::new();
        };
        let data = match FormData::new_with_form(form) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read form data: {:?}", e);
                return Vec::new();
            }
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return Vec::new();
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pair = entry.dyn_into::<Array>().ok()?;
                // File entries have no string value and are skipped.
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn reset_form(&self) {
        if let Some(form) = self.0.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        collect(self.0.query_selector_all(selector), selector)
    }

    fn click(&self) {
        if let Some(element) = self.0.dyn_ref::<HtmlElement>() {
            element.click();
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(&other.0))
    }

    fn listen(&self, kind: EventKind, mut handler: Handler<Self>) {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .map(WebElement);

            if handler(&Event { kind, target }) == Outcome::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) = self
            .0
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            tracing::error!("Failed to add {} listener: {:?}", kind.as_str(), e);
        }

        closure.forget();
    }
}
