use std::collections::BTreeMap;

use crate::analytics::AnalyticsEvent;
use crate::dom::{Display, Document, Element, EventKind, Outcome};
use crate::markup;
use crate::page::Services;

/// Field values of one submission, keyed by control name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadPayload {
    fields: BTreeMap<String, String>,
}

impl LeadPayload {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        // Later entries win, as with repeated names in a form.
        Self {
            fields: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn region(&self) -> Option<&str> {
        self.get("region")
    }

    pub fn problem(&self) -> Option<&str> {
        self.get("problem")
    }

    pub fn to_event(&self) -> AnalyticsEvent {
        AnalyticsEvent::lead_submitted(
            self.region().map(str::to_string),
            self.problem().map(str::to_string),
        )
    }
}

/// Handles a submission locally: track, confirm, close the modal, clear fields.
pub fn submit<D: Document>(document: &D, form: &D::Element, services: &Services) {
    let payload = LeadPayload::from_entries(form.form_entries());
    tracing::info!(
        "Lead submitted (region: {:?}, problem: {:?})",
        payload.region(),
        payload.problem()
    );

    services.analytics.record(&payload.to_event());
    services.window.alert(&services.config.lead_success_message);

    if let Some(modal) = document.element_by_id(markup::LEAD_MODAL) {
        modal.set_display(Display::None);
    }
    form.reset_form();
}

pub fn attach<D: Document>(document: &D, services: &Services) -> bool {
    let Some(form) = document.element_by_id(markup::LEAD_FORM) else {
        tracing::debug!("No #{} on page, lead form disabled", markup::LEAD_FORM);
        return false;
    };

    let document = document.clone();
    let services = services.clone();
    let target = form.clone();
    form.listen(
        EventKind::Submit,
        Box::new(move |_| {
            submit(&document, &target, &services);
            Outcome::PreventDefault
        }),
    );

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Harness, MemoryDocument, Node};
    use serde_json::json;

    fn form_page() -> MemoryDocument {
        let document = MemoryDocument::new();
        let modal = document.append(None, Node::new("div").id("lead-modal"));
        let form = document.append(Some(&modal), Node::new("form").id("lead-capture-form"));
        document.append(Some(&form), Node::new("input").attr("name", "email"));
        document.append(Some(&form), Node::new("input").attr("name", "region"));
        document.append(Some(&form), Node::new("select").attr("name", "problem"));
        document.append(Some(&form), Node::new("button").attr("type", "submit"));
        document
    }

    fn fill(document: &MemoryDocument, name: &str, value: &str) {
        document
            .query_selector(&format!("#lead-capture-form [name=\"{}\"]", name))
            .unwrap()
            .set_value(value);
    }

    #[test]
    fn test_submit_tracks_and_resets() {
        let document = form_page();
        let harness = Harness::new();
        assert!(attach(&document, &harness.services));

        let modal = document.element_by_id("lead-modal").unwrap();
        modal.set_display(Display::Flex);
        fill(&document, "email", "ops@example.com");
        fill(&document, "region", "West");
        fill(&document, "problem", "Retrofit");

        let form = document.element_by_id("lead-capture-form").unwrap();
        assert_eq!(form.submit(), Outcome::PreventDefault);

        assert_eq!(
            harness.recorded(),
            vec![json!({
                "event": "lead_form_submit_success",
                "lead_region": "West",
                "lead_problem": "Retrofit"
            })]
        );
        assert_eq!(
            harness.window.alerts(),
            vec!["Success! Your audit request has been sent. We will contact you within 4 hours."]
        );
        assert_eq!(modal.display(), Some(Display::None));
        assert!(form.form_entries().iter().all(|(_, value)| value.is_empty()));
    }

    #[test]
    fn test_submit_without_modal() {
        let document = MemoryDocument::new();
        let form = document.append(None, Node::new("form").id("lead-capture-form"));
        document.append(Some(&form), Node::new("input").attr("name", "region").value("East"));
        let harness = Harness::new();
        attach(&document, &harness.services);

        form.submit();

        assert_eq!(
            harness.recorded(),
            vec![json!({"event": "lead_form_submit_success", "lead_region": "East"})]
        );
        assert_eq!(harness.window.alerts().len(), 1);
    }

    #[test]
    fn test_missing_form_is_noop() {
        let document = MemoryDocument::new();
        let harness = Harness::new();
        assert!(!attach(&document, &harness.services));
    }

    #[test]
    fn test_payload_accessors() {
        let payload = LeadPayload::from_entries([
            ("region".to_string(), "North".to_string()),
            ("problem".to_string(), "Energy".to_string()),
            ("region".to_string(), "South".to_string()),
        ]);
        assert_eq!(payload.region(), Some("South"));
        assert_eq!(payload.problem(), Some("Energy"));
        assert_eq!(payload.get("email"), None);
    }
}
