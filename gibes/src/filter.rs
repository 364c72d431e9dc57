//! Case study grid filtering by industry or solution.

use crate::dom::{Document, Element, EventKind, Outcome};
use crate::markup::{self, ACTIVE_CLASS, FILTERED_OUT_CLASS};

pub const SHOW_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Industry,
    Solution,
}

impl FilterType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "industry" => Some(FilterType::Industry),
            "solution" => Some(FilterType::Solution),
            _ => None,
        }
    }

    /// Dataset key on a card holding this classification.
    pub fn card_key(&self) -> &'static str {
        match self {
            FilterType::Industry => "industry",
            FilterType::Solution => "solution",
        }
    }
}

/// The filter carried by a clicked button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub value: Option<String>,
    pub filter_type: Option<FilterType>,
}

impl Selection {
    pub fn from_button<E: Element>(button: &E) -> Self {
        Self {
            value: button.data("filter"),
            filter_type: button.data("type").as_deref().and_then(FilterType::parse),
        }
    }

    pub fn is_all(&self) -> bool {
        self.value.as_deref() == Some(SHOW_ALL)
    }

    /// An unknown filter type matches no card.
    pub fn matches<E: Element>(&self, card: &E) -> bool {
        match self.filter_type {
            Some(filter_type) => card.data(filter_type.card_key()) == self.value,
            None => false,
        }
    }
}

pub struct CardFilter<E: Element> {
    container: E,
    cards: Vec<E>,
}

impl<E: Element> CardFilter<E> {
    pub fn new(container: E, cards: Vec<E>) -> Self {
        Self { container, cards }
    }

    /// Handles a click inside the filter bar. Only direct hits on a button count.
    pub fn click(&self, target: Option<&E>) {
        let Some(button) = target.filter(|t| t.tag_name().eq_ignore_ascii_case("button")) else {
            return;
        };
        let selection = Selection::from_button(button);

        for other in self.container.query_all("button") {
            other.remove_class(ACTIVE_CLASS);
        }
        button.add_class(ACTIVE_CLASS);

        if selection.is_all() {
            for card in &self.cards {
                card.remove_class(FILTERED_OUT_CLASS);
            }
            return;
        }

        let mut shown = 0;
        for card in &self.cards {
            if selection.matches(card) {
                card.remove_class(FILTERED_OUT_CLASS);
                shown += 1;
            } else {
                card.add_class(FILTERED_OUT_CLASS);
            }
        }
        tracing::debug!(
            "Filter {:?}={:?} shows {}/{} cards",
            selection.filter_type,
            selection.value,
            shown,
            self.cards.len()
        );
    }
}

pub fn attach<D: Document>(document: &D) -> bool {
    let (Some(container), Some(_grid)) = (
        document.element_by_id(markup::CASE_STUDY_FILTERS),
        document.element_by_id(markup::CASE_STUDIES_GRID),
    ) else {
        tracing::debug!("Case study filter markup incomplete, filtering disabled");
        return false;
    };

    let filter = CardFilter::new(container.clone(), document.query_all(markup::CASE_STUDY_CARDS));
    container.listen(
        EventKind::Click,
        Box::new(move |event| {
            filter.click(event.target.as_ref());
            Outcome::Proceed
        }),
    );

    match document.query_selector(markup::FILTER_ALL) {
        Some(all) => all.add_class(ACTIVE_CLASS),
        None => tracing::warn!("No {} button, no filter starts active", markup::FILTER_ALL),
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, MemoryElement, Node};

    const CARDS: [(&str, &str); 4] = [
        ("manufacturing", "retrofit"),
        ("energy", "audit"),
        ("manufacturing", "energy"),
        ("logistics", "retrofit"),
    ];

    fn filter_page() -> MemoryDocument {
        let document = MemoryDocument::new();
        let filters = document.append(None, Node::new("div").id("case-study-filters"));
        document.append(
            Some(&filters),
            Node::new("button").id("filter-all").data("filter", "all").data("type", "industry"),
        );
        for (value, filter_type) in [
            ("manufacturing", "industry"),
            ("energy", "industry"),
            ("retrofit", "solution"),
        ] {
            let button = document.append(
                Some(&filters),
                Node::new("button").data("filter", value).data("type", filter_type),
            );
            document.append(Some(&button), Node::new("span").text(value));
        }

        let grid = document.append(None, Node::new("div").id("case-studies-grid"));
        for (industry, solution) in CARDS {
            document.append(
                Some(&grid),
                Node::new("article")
                    .class("case-study-card")
                    .data("industry", industry)
                    .data("solution", solution),
            );
        }
        document
    }

    fn button(document: &MemoryDocument, value: &str) -> MemoryElement {
        document
            .query_selector(&format!("#case-study-filters button[data-filter=\"{}\"]", value))
            .unwrap()
    }

    fn visible(document: &MemoryDocument) -> Vec<bool> {
        document
            .query_all(".case-study-card")
            .iter()
            .map(|card| !card.has_class(FILTERED_OUT_CLASS))
            .collect()
    }

    fn active_count(document: &MemoryDocument) -> usize {
        document
            .query_all("#case-study-filters button")
            .iter()
            .filter(|b| b.has_class(ACTIVE_CLASS))
            .count()
    }

    #[test]
    fn test_all_starts_active() {
        let document = filter_page();
        assert!(attach(&document));
        assert!(button(&document, "all").has_class(ACTIVE_CLASS));
        assert_eq!(active_count(&document), 1);
    }

    #[test]
    fn test_filter_by_industry() {
        let document = filter_page();
        attach(&document);

        button(&document, "manufacturing").click();
        assert_eq!(visible(&document), vec![true, false, true, false]);
        assert!(button(&document, "manufacturing").has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_filter_by_solution() {
        let document = filter_page();
        attach(&document);

        button(&document, "retrofit").click();
        assert_eq!(visible(&document), vec![true, false, false, true]);
    }

    #[test]
    fn test_all_clears_filtering() {
        let document = filter_page();
        attach(&document);

        button(&document, "energy").click();
        assert_eq!(visible(&document), vec![false, true, false, false]);

        button(&document, "all").click();
        assert_eq!(visible(&document), vec![true; 4]);
    }

    #[test]
    fn test_exactly_one_active_after_any_sequence() {
        let document = filter_page();
        attach(&document);

        for value in ["energy", "retrofit", "all", "manufacturing", "manufacturing", "all"] {
            button(&document, value).click();
            assert_eq!(active_count(&document), 1);
            assert!(button(&document, value).has_class(ACTIVE_CLASS));
        }
    }

    #[test]
    fn test_clicks_inside_button_markup_are_ignored() {
        let document = filter_page();
        attach(&document);

        let label = document.query_selector("#case-study-filters span").unwrap();
        label.click();

        assert_eq!(visible(&document), vec![true; 4]);
        assert!(button(&document, "all").has_class(ACTIVE_CLASS));

        document.element_by_id("case-study-filters").unwrap().click();
        assert_eq!(active_count(&document), 1);
    }

    #[test]
    fn test_unknown_type_hides_everything() {
        let document = filter_page();
        let filters = document.element_by_id("case-study-filters").unwrap();
        let odd = document.append(
            Some(&filters),
            Node::new("button").data("filter", "energy").data("type", "region"),
        );
        attach(&document);

        odd.click();
        assert_eq!(visible(&document), vec![false; 4]);
        assert_eq!(active_count(&document), 1);
    }

    #[test]
    fn test_missing_grid_attaches_nothing() {
        let document = MemoryDocument::new();
        let filters = document.append(None, Node::new("div").id("case-study-filters"));
        document.append(Some(&filters), Node::new("button").id("filter-all").data("filter", "all"));

        assert!(!attach(&document));
        assert!(!document.element_by_id("filter-all").unwrap().has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_missing_all_button_still_filters() {
        let document = MemoryDocument::new();
        let filters = document.append(None, Node::new("div").id("case-study-filters"));
        let only = document.append(
            Some(&filters),
            Node::new("button").data("filter", "energy").data("type", "industry"),
        );
        let grid = document.append(None, Node::new("div").id("case-studies-grid"));
        let card = document.append(
            Some(&grid),
            Node::new("div").class("case-study-card").data("industry", "mining"),
        );

        assert!(attach(&document));
        only.click();
        assert!(card.has_class(FILTERED_OUT_CLASS));
    }
}
