//! Element ids, classes and selectors the page markup must provide.

pub const STATS_CONTAINER: &str = "stats-container";
pub const COUNTERS: &str = "#stats-container p[data-target]";

pub const LEAD_MODAL: &str = "lead-modal";
pub const LEAD_MODAL_TRIGGER: &str = "lead-modal-trigger";
pub const CLOSE_MODAL: &str = "close-modal";

pub const LEAD_FORM: &str = "lead-capture-form";
pub const PROBLEM_SELECT: &str = "#lead-capture-form select[name=\"problem\"]";

pub const COOKIE_BANNER: &str = "cookie-banner";
pub const ACCEPT_COOKIES: &str = "accept-cookies";
/// Several links on a page may share this id.
pub const COOKIE_SETTINGS_LINKS: &str = "#cookie-settings";

pub const CASE_STUDY_FILTERS: &str = "case-study-filters";
pub const CASE_STUDIES_GRID: &str = "case-studies-grid";
pub const CASE_STUDY_CARDS: &str = ".case-study-card";
pub const FILTER_ALL: &str = "#filter-all";

pub const ACTIVE_CLASS: &str = "active";
pub const FILTERED_OUT_CLASS: &str = "filtered-out";

pub const CONFIG_SCRIPT: &str = "gibes-config";
