//! Analytics records pushed to the tag manager queue.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    QuickCapture,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Interaction {
    LeadModalOpen {
        form_type: FormType,
    },
    LeadFormSubmitSuccess {
        #[serde(skip_serializing_if = "Option::is_none")]
        lead_region: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lead_problem: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentMode {
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageGrant {
    Granted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsentUpdate {
    pub consent: ConsentMode,
    pub ad_storage: StorageGrant,
    pub analytics_storage: StorageGrant,
}

impl ConsentUpdate {
    pub fn grant_all() -> Self {
        Self {
            consent: ConsentMode::Update,
            ad_storage: StorageGrant::Granted,
            analytics_storage: StorageGrant::Granted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsEvent {
    Interaction(Interaction),
    Consent(ConsentUpdate),
}

impl AnalyticsEvent {
    pub fn modal_open() -> Self {
        AnalyticsEvent::Interaction(Interaction::LeadModalOpen {
            form_type: FormType::QuickCapture,
        })
    }

    pub fn lead_submitted(region: Option<String>, problem: Option<String>) -> Self {
        AnalyticsEvent::Interaction(Interaction::LeadFormSubmitSuccess {
            lead_region: region,
            lead_problem: problem,
        })
    }

    pub fn consent_granted() -> Self {
        AnalyticsEvent::Consent(ConsentUpdate::grant_all())
    }
}

/// Push-only destination for analytics records.
pub trait EventSink {
    fn record(&self, event: &AnalyticsEvent);
}

/// Loads the tracking scripts once the visitor has consented.
pub trait AnalyticsLoader {
    fn load(&self);
}
