use crate::analytics::AnalyticsEvent;
use crate::dom::{Display, Document, Element, EventKind, Outcome};
use crate::markup;
use crate::page::Services;
use crate::storage::ConsentFlag;

/// Records consent, hides the banner and hands over to the analytics loader.
pub fn accept<E: Element>(banner: Option<&E>, services: &Services) {
    if let Err(e) = ConsentFlag::Accepted.save(services.storage.as_ref()) {
        tracing::warn!("Failed to persist cookie consent: {}", e);
    }

    if let Some(banner) = banner {
        banner.set_display(Display::None);
    }

    services.analytics.record(&AnalyticsEvent::consent_granted());
    services.loader.load();
    tracing::info!("Cookie consent accepted");
}

pub fn open_settings(services: &Services) {
    services.window.alert(&services.config.cookie_settings_message);
    services.window.redirect(&services.config.privacy_policy_href);
}

/// Shows the banner when no decision is stored and wires the accept button
/// and every cookie-settings link. Returns false when none of them exist.
pub fn attach<D: Document>(document: &D, services: &Services) -> bool {
    let banner = document.element_by_id(markup::COOKIE_BANNER);
    let accept_button = document.element_by_id(markup::ACCEPT_COOKIES);
    let settings_links = document.query_all(markup::COOKIE_SETTINGS_LINKS);

    for link in &settings_links {
        let services = services.clone();
        link.listen(
            EventKind::Click,
            Box::new(move |_| {
                open_settings(&services);
                Outcome::PreventDefault
            }),
        );
    }

    if let Some(banner) = &banner {
        match ConsentFlag::load(services.storage.as_ref()) {
            None => banner.set_display(Display::Flex),
            Some(status) => tracing::debug!("Cookie consent already recorded: {}", status),
        }
    }

    if let Some(button) = &accept_button {
        let banner = banner.clone();
        let services = services.clone();
        button.listen(
            EventKind::Click,
            Box::new(move |_| {
                accept(banner.as_ref(), &services);
                Outcome::Proceed
            }),
        );
    }

    banner.is_some() || accept_button.is_some() || !settings_links.is_empty()
}
