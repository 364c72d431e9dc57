use anyhow::Result;

pub enum StorageKey {
    CookieConsent,
}

impl StorageKey {
    pub fn as_str(&self) -> &str {
        match self {
            StorageKey::CookieConsent => "gibes_cookie_consent",
        }
    }
}

/// Origin-scoped durable string store (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentFlag {
    Accepted,
}

impl ConsentFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentFlag::Accepted => "accepted",
        }
    }

    /// Reads the stored flag. An empty value counts as no decision.
    pub fn load(store: &dyn KeyValueStore) -> Option<String> {
        store
            .get(StorageKey::CookieConsent.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(StorageKey::CookieConsent.as_str(), self.as_str())
    }
}
