use std::time::Duration;

use gibes::dom::Window;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub struct BrowserWindow {
    window: web_sys::Window,
}

impl BrowserWindow {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Window for BrowserWindow {
    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!("Failed to show alert: {:?}", e);
        }
    }

    fn redirect(&self, href: &str) {
        if let Err(e) = self.window.location().set_href(href) {
            tracing::error!("Failed to navigate to {}: {:?}", href, e);
        }
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(e) = self.window.request_animation_frame(closure.unchecked_ref()) {
            tracing::error!("Failed to request animation frame: {:?}", e);
        }
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, callback).forget();
    }
}
