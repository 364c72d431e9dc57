use gibes::PageConfig;
use gibes::markup;

/// Reads overrides from `<script type="application/json" id="gibes-config">`.
pub fn load(document: &web_sys::Document) -> PageConfig {
    match document
        .get_element_by_id(markup::CONFIG_SCRIPT)
        .and_then(|script| script.text_content())
    {
        Some(raw) => PageConfig::from_json(&raw),
        None => PageConfig::default(),
    }
}
