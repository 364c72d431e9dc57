/// Read access to the current page URL's query string.
pub trait QueryParams {
    fn get(&self, name: &str) -> Option<String>;
}

pub const TYPE_PARAM: &str = "type";

/// Maps a campaign `type` parameter to the lead form's problem option.
pub fn problem_for(campaign_type: &str) -> Option<&'static str> {
    match campaign_type {
        "audit" => Some("Downtime"),
        "retrofit" => Some("Retrofit"),
        "prototype" => Some("Prototype"),
        "energy" => Some("Energy"),
        "compliance" => Some("Compliance"),
        _ => None,
    }
}

/// The `type` parameter, if present and non-empty.
pub fn campaign_type(query: &dyn QueryParams) -> Option<String> {
    query.get(TYPE_PARAM).filter(|value| !value.is_empty())
}
