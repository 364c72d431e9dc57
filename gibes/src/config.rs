use serde::Deserialize;
use std::time::Duration;

/// Tunables for the page behaviors. Every field has a default so a page can
/// override only what it needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub counter_duration_ms: u64,
    pub visibility_threshold: f64,
    pub auto_open_delay_ms: u64,
    pub privacy_policy_href: String,
    pub lead_success_message: String,
    pub cookie_settings_message: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            counter_duration_ms: 2500,
            visibility_threshold: 0.5,
            auto_open_delay_ms: 100,
            privacy_policy_href: "privacy-policy.html".to_string(),
            lead_success_message: "Success! Your audit request has been sent. We will contact you within 4 hours.".to_string(),
            cookie_settings_message: "Cookie Preferences: You can manage consent via the banner at the bottom or review our data usage in the Privacy Policy. Clicking 'Accept All' enables analytics.".to_string(),
        }
    }
}

impl PageConfig {
    /// Parses an inline configuration block. Malformed input falls back to the
    /// defaults so a bad override never disables the page.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed page configuration: {}", e);
                Self::default()
            }
        }
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub fn auto_open_delay(&self) -> Duration {
        Duration::from_millis(self.auto_open_delay_ms)
    }
}
