mod browser;
mod config;

use std::rc::Rc;

use dioxus_logger::tracing::{Level, info};
use gibes::{Services, Wiring};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use browser::{BrowserStorage, BrowserWindow, ConsoleLoader, DataLayer, LocationQuery, WebDocument};

fn run(window: web_sys::Window) -> Wiring {
    let document = window.document().expect("window has no document");

    let services = Services {
        window: Rc::new(BrowserWindow::new(window.clone())),
        analytics: Rc::new(DataLayer::new(window.clone())),
        loader: Rc::new(ConsoleLoader),
        storage: Rc::new(BrowserStorage),
        query: Rc::new(LocationQuery::current(&window)),
        config: Rc::new(config::load(&document)),
    };

    gibes::start(&WebDocument::new(document), &services)
}

pub fn launch() {
    dioxus_logger::init(Level::INFO).expect("failed to init logger");

    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("window has no document");

    if document.ready_state() != "loading" {
        run(window);
        return;
    }

    info!("Waiting for DOMContentLoaded");
    let closure = Closure::once_into_js(move || {
        run(window);
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref())
        .expect("failed to add event listener");
}

#[wasm_bindgen(start)]
pub fn main() {
    launch();
}
