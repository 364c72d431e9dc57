use std::rc::Rc;

use crate::analytics::{AnalyticsLoader, EventSink};
use crate::config::PageConfig;
use crate::dom::{Document, Element, Window};
use crate::query::{self, QueryParams};
use crate::storage::KeyValueStore;
use crate::{consent, counter, filter, lead_form, markup, modal};

/// Everything outside the document that the behaviors talk to.
#[derive(Clone)]
pub struct Services {
    pub window: Rc<dyn Window>,
    pub analytics: Rc<dyn EventSink>,
    pub loader: Rc<dyn AnalyticsLoader>,
    pub storage: Rc<dyn KeyValueStore>,
    pub query: Rc<dyn QueryParams>,
    pub config: Rc<PageConfig>,
}

/// Which behaviors found their markup during startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wiring {
    pub counters: bool,
    pub modal: bool,
    pub lead_form: bool,
    pub consent: bool,
    pub filters: bool,
    pub prefill: Option<Prefill>,
}

/// Outcome of the `type` query parameter handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefill {
    pub campaign_type: String,
    /// Option written to the problem selector, empty when unrecognized.
    /// `None` when the page has no selector.
    pub problem: Option<String>,
    pub auto_open: bool,
}

/// Attaches every behavior to `document`. Call once the document has loaded.
pub fn start<D: Document>(document: &D, services: &Services) -> Wiring {
    let mut wiring = Wiring::default();

    if document.element_by_id(markup::STATS_CONTAINER).is_some() {
        wiring.counters = counter::attach(document, services);
    }

    wiring.modal = modal::attach(document, services);
    wiring.lead_form = lead_form::attach(document, services);
    wiring.consent = consent::attach(document, services);

    if document.element_by_id(markup::CASE_STUDY_FILTERS).is_some() {
        wiring.filters = filter::attach(document);
    }

    wiring.prefill = prefill(document, services);

    tracing::info!("Page behaviors attached: {:?}", wiring);
    wiring
}

/// Preselects the lead form problem from the campaign `type` parameter and
/// schedules the modal to open shortly after load.
pub fn prefill<D: Document>(document: &D, services: &Services) -> Option<Prefill> {
    let campaign_type = query::campaign_type(services.query.as_ref())?;

    let problem = document.query_selector(markup::PROBLEM_SELECT).map(|selector| {
        let problem = query::problem_for(&campaign_type).unwrap_or_default();
        selector.set_value(problem);
        problem.to_string()
    });

    let trigger = document.element_by_id(markup::LEAD_MODAL_TRIGGER);
    let auto_open = trigger.is_some();
    if let Some(trigger) = trigger {
        services.window.set_timeout(
            services.config.auto_open_delay(),
            Box::new(move || trigger.click()),
        );
    }

    Some(Prefill {
        campaign_type,
        problem,
        auto_open,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Display;
    use crate::memory::{Harness, MemoryDocument, Node, StaticQuery};
    use serde_json::json;
    use std::time::Duration;

    fn landing_page() -> MemoryDocument {
        let document = MemoryDocument::new();

        let stats = document.append(None, Node::new("section").id("stats-container"));
        document.append(Some(&stats), Node::new("p").data("target", "85%"));

        document.append(None, Node::new("button").id("lead-modal-trigger"));
        let modal = document.append(None, Node::new("div").id("lead-modal"));
        document.append(Some(&modal), Node::new("span").id("close-modal"));
        let form = document.append(Some(&modal), Node::new("form").id("lead-capture-form"));
        document.append(Some(&form), Node::new("input").attr("name", "region"));
        document.append(Some(&form), Node::new("select").attr("name", "problem"));

        let banner = document.append(None, Node::new("div").id("cookie-banner"));
        document.append(Some(&banner), Node::new("button").id("accept-cookies"));
        document
    }

    #[test]
    fn test_start_reports_wiring() {
        let document = landing_page();
        let harness = Harness::new();
        let wiring = start(&document, &harness.services);

        assert_eq!(
            wiring,
            Wiring {
                counters: true,
                modal: true,
                lead_form: true,
                consent: true,
                filters: false,
                prefill: None,
            }
        );
        assert_eq!(harness.window.pending_timeouts(), 0);
    }

    #[test]
    fn test_empty_page() {
        let document = MemoryDocument::new();
        let harness = Harness::new().with_query(StaticQuery::from_pairs([("type", "energy")]));
        let wiring = start(&document, &harness.services);

        assert_eq!(
            wiring.prefill,
            Some(Prefill {
                campaign_type: "energy".to_string(),
                problem: None,
                auto_open: false,
            })
        );
        assert!(!wiring.counters && !wiring.modal && !wiring.consent && !wiring.filters);
        assert_eq!(harness.window.pending_timeouts(), 0);
    }

    #[test]
    fn test_known_type_prefills_and_opens() {
        let document = landing_page();
        let harness = Harness::new().with_query(StaticQuery::from_pairs([("type", "energy")]));
        let wiring = start(&document, &harness.services);

        let selector = document
            .query_selector("#lead-capture-form select[name=\"problem\"]")
            .unwrap();
        assert_eq!(selector.value(), "Energy");
        assert_eq!(wiring.prefill.unwrap().problem.as_deref(), Some("Energy"));

        let modal = document.element_by_id("lead-modal").unwrap();
        harness.window.advance(Duration::from_millis(99));
        assert_eq!(modal.display(), None);

        harness.window.advance(Duration::from_millis(1));
        assert_eq!(modal.display(), Some(Display::Flex));
        assert_eq!(
            harness.recorded(),
            vec![json!({"event": "lead_modal_open", "form_type": "quick_capture"})]
        );
    }

    #[test]
    fn test_unknown_type_clears_and_still_opens() {
        let document = landing_page();
        let selector = document
            .query_selector("#lead-capture-form select[name=\"problem\"]")
            .unwrap();
        selector.set_value("Retrofit");

        let harness = Harness::new().with_query(StaticQuery::from_pairs([("type", "unknown")]));
        start(&document, &harness.services);
        assert_eq!(selector.value(), "");

        harness.window.advance(Duration::from_millis(100));
        let modal = document.element_by_id("lead-modal").unwrap();
        assert_eq!(modal.display(), Some(Display::Flex));
    }

    #[test]
    fn test_filters_without_all_button_still_prefill() {
        let document = landing_page();
        let filters = document.append(None, Node::new("div").id("case-study-filters"));
        let industry = document.append(
            Some(&filters),
            Node::new("button")
                .data("filter", "food")
                .data("type", "industry"),
        );
        let grid = document.append(None, Node::new("div").id("case-studies-grid"));
        let card = document.append(
            Some(&grid),
            Node::new("article")
                .class("case-study-card")
                .data("industry", "manufacturing"),
        );

        let harness = Harness::new().with_query(StaticQuery::from_pairs([("type", "energy")]));
        let wiring = start(&document, &harness.services);
        assert!(wiring.filters);

        let selector = document
            .query_selector("#lead-capture-form select[name=\"problem\"]")
            .unwrap();
        assert_eq!(selector.value(), "Energy");

        harness.window.advance(Duration::from_millis(100));
        let modal = document.element_by_id("lead-modal").unwrap();
        assert_eq!(modal.display(), Some(Display::Flex));

        industry.click();
        assert!(industry.has_class("active"));
        assert!(card.has_class("filtered-out"));
    }

    #[test]
    fn test_submit_flow_after_auto_open() {
        let document = landing_page();
        let harness = Harness::new().with_query(StaticQuery::from_pairs([("type", "retrofit")]));
        start(&document, &harness.services);
        harness.window.advance(Duration::from_millis(100));

        document
            .query_selector("#lead-capture-form [name=\"region\"]")
            .unwrap()
            .set_value("West");
        document.element_by_id("lead-capture-form").unwrap().submit();

        let modal = document.element_by_id("lead-modal").unwrap();
        assert_eq!(modal.display(), Some(Display::None));
        assert_eq!(
            harness.recorded().last().unwrap(),
            &json!({
                "event": "lead_form_submit_success",
                "lead_region": "West",
                "lead_problem": "Retrofit"
            })
        );
    }
}
