mod analytics;
mod dom;
mod query;
mod storage;
mod window;

pub use analytics::{ConsoleLoader, DataLayer};
pub use dom::{WebDocument, WebElement};
pub use query::LocationQuery;
pub use storage::BrowserStorage;
pub use window::BrowserWindow;
