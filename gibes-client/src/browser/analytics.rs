use anyhow::{Result, anyhow};
use gibes::analytics::{AnalyticsEvent, AnalyticsLoader, EventSink};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

fn js_error(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// The Google Tag Manager queue on `window.dataLayer`, when the page has one.
pub struct DataLayer {
    window: web_sys::Window,
}

impl DataLayer {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    fn push(&self, event: &AnalyticsEvent) -> Result<()> {
        let layer = js_sys::Reflect::get(&self.window, &JsValue::from_str("dataLayer"))
            .map_err(js_error)?;
        if layer.is_undefined() || layer.is_null() {
            tracing::debug!("No dataLayer on page, dropping {:?}", event);
            return Ok(());
        }

        let push = js_sys::Reflect::get(&layer, &JsValue::from_str("push"))
            .map_err(js_error)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| anyhow!("dataLayer.push is not a function"))?;

        let record = event
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| anyhow!("Failed to convert {:?}: {}", event, e))?;
        push.call1(&layer, &record).map_err(js_error)?;
        Ok(())
    }
}

impl EventSink for DataLayer {
    fn record(&self, event: &AnalyticsEvent) {
        if let Err(e) = self.push(event) {
            tracing::warn!("Failed to push analytics event: {}", e);
        }
    }
}

/// Placeholder until the tracking scripts are loaded on consent.
pub struct ConsoleLoader;

impl AnalyticsLoader for ConsoleLoader {
    fn load(&self) {
        gloo_console::log!("Analytics initialized/loaded based on consent.");
    }
}
