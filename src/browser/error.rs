use std::time::Duration;

use thiserror::Error;

/// Failures reported by a page driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The locator did not resolve to any element on the current page
    #[error("element '{locator}' not found")]
    ElementNotFound { locator: String },

    /// A previously resolved element is no longer attached to the page
    #[error("element '{element}' is stale")]
    StaleElement { element: String },

    /// The element exists but cannot take input or clicks right now
    #[error("element '{element}' is not interactable")]
    NotInteractable { element: String },

    /// Any other failure reported by the WebDriver client
    #[error("webdriver command '{command}' failed: {source}")]
    WebDriver {
        command: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },

    #[error("webdriver command '{command}' timed out after {timeout:?}")]
    CommandTimedOut { command: String, timeout: Duration },

    /// The async runtime backing the session could not start
    #[error("failed to start webdriver runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The session was already closed
    #[error("browser session is closed")]
    SessionClosed,
}

impl DriverError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::ElementNotFound { .. })
    }
}
