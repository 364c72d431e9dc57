//! In-memory implementations of every capability, for tests and headless use.

mod dom;
mod selector;
mod window;

pub use dom::{MemoryDocument, MemoryElement, Node};
pub use selector::Selector;
pub use window::MemoryWindow;

use anyhow::{Result, bail};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::analytics::{AnalyticsEvent, AnalyticsLoader, EventSink};
use crate::config::PageConfig;
use crate::page::Services;
use crate::query::QueryParams;
use crate::storage::KeyValueStore;

/// Keeps every pushed record.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &AnalyticsEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[derive(Debug, Default)]
pub struct CountingLoader {
    loads: Cell<usize>,
}

impl CountingLoader {
    pub fn count(&self) -> usize {
        self.loads.get()
    }
}

impl AnalyticsLoader for CountingLoader {
    fn load(&self) {
        self.loads.set(self.loads.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    /// A store that rejects writes, like a browser with storage disabled.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            bail!("storage is read-only");
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticQuery {
    params: HashMap<String, String>,
}

impl StaticQuery {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl QueryParams for StaticQuery {
    fn get(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }
}

/// In-memory services with typed handles to each double.
pub struct Harness {
    pub window: MemoryWindow,
    pub sink: Rc<MemorySink>,
    pub loader: Rc<CountingLoader>,
    pub store: Rc<MemoryStore>,
    pub query: Rc<StaticQuery>,
    pub services: Services,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        let window = MemoryWindow::new();
        let sink = Rc::new(MemorySink::default());
        let loader = Rc::new(CountingLoader::default());
        let store = Rc::new(MemoryStore::default());
        let query = Rc::new(StaticQuery::default());

        let services = Services {
            window: Rc::new(window.clone()),
            analytics: sink.clone(),
            loader: loader.clone(),
            storage: store.clone(),
            query: query.clone(),
            config: Rc::new(PageConfig::default()),
        };

        Self {
            window,
            sink,
            loader,
            store,
            query,
            services,
        }
    }

    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = Rc::new(store);
        self.services.storage = self.store.clone();
        self
    }

    pub fn with_query(mut self, query: StaticQuery) -> Self {
        self.query = Rc::new(query);
        self.services.query = self.query.clone();
        self
    }

    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.services.config = Rc::new(config);
        self
    }

    /// Recorded analytics events as the JSON objects pushed to the queue.
    pub fn recorded(&self) -> Vec<serde_json::Value> {
        self.sink
            .events()
            .iter()
            .map(|event| serde_json::to_value(event).unwrap_or_default())
            .collect()
    }
}
