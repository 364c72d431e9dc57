//! Behaviors for the Gibes marketing pages: stat counters, the lead capture
//! modal and form, the cookie consent banner and case study filtering.
//!
//! Everything here is written against the capability traits in [`dom`],
//! [`analytics`], [`storage`] and [`query`]. The browser bindings live in the
//! `gibes-client` crate. The `memory` feature adds headless implementations
//! under `memory`.

pub mod analytics;
pub mod config;
pub mod consent;
pub mod counter;
pub mod dom;
pub mod filter;
pub mod lead_form;
pub mod markup;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod modal;
pub mod page;
pub mod query;
pub mod storage;

pub use config::PageConfig;
pub use page::{Services, Wiring, start};
