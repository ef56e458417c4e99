use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde_json::{Map, Value, json};
use thirtyfour::error::WebDriverError;
use thirtyfour::{WebDriver, WebElement};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::browser::driver::{DriverFactory, ElementRef, PageDriver};
use crate::browser::error::DriverError;
use crate::browser::locator::Locator;

/// Connection settings for a WebDriver endpoint (chromedriver, geckodriver, Selenium Grid).
#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    pub endpoint: String,
    pub browser: String,
    pub headless: bool,
    pub maximize: bool,
    /// Upper bound for any single WebDriver command
    pub request_timeout: Duration,
}

impl Default for WebDriverOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".to_string(),
            browser: "chrome".to_string(),
            headless: false,
            maximize: true,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// `alwaysMatch` capabilities asking for `browser`, optionally headless.
pub fn capabilities(browser: &str, headless: bool) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".into(), Value::String(browser.to_string()));

    if headless {
        let (key, args) = match browser {
            "firefox" => ("moz:firefoxOptions", json!({ "args": ["-headless"] })),
            "MicrosoftEdge" | "msedge" => ("ms:edgeOptions", json!({ "args": ["--headless=new"] })),
            _ => ("goog:chromeOptions", json!({ "args": ["--headless=new"] })),
        };
        caps.insert(key.into(), args);
    }

    caps
}

/// A browser session driven through `thirtyfour`.
///
/// `PageDriver` is synchronous, so the session owns a current-thread tokio
/// runtime and blocks on each command. The latest element found for each
/// locator is kept until the next navigation. The session quits on [`PageDriver::quit`] or when dropped.
pub struct WebDriverSession {
    runtime: Runtime,
    driver: Option<WebDriver>,
    elements: HashMap<String, WebElement>,
    request_timeout: Duration,
}

impl WebDriverSession {
    /// Start a new browser session on the configured endpoint.
    pub fn launch(options: &WebDriverOptions) -> Result<Self, DriverError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(DriverError::Runtime)?;

        let mut session = WebDriverSession {
            runtime,
            driver: None,
            elements: HashMap::new(),
            request_timeout: options.request_timeout,
        };

        let caps = capabilities(&options.browser, options.headless);
        let driver = session.block("new session", WebDriver::new(options.endpoint.as_str(), caps))?;
        debug!(endpoint = %options.endpoint, browser = %options.browser, "webdriver session started");
        session.driver = Some(driver);

        if options.maximize {
            let driver = session.driver()?;
            // Headless browsers and some grids refuse window management.
            if let Err(e) = session.block("maximize", driver.maximize_window()) {
                warn!("could not maximize browser window: {}", e);
            }
        }

        Ok(session)
    }

    fn driver(&self) -> Result<&WebDriver, DriverError> {
        self.driver.as_ref().ok_or(DriverError::SessionClosed)
    }

    fn element(&self, element: &ElementRef) -> Result<&WebElement, DriverError> {
        self.elements
            .get(element.id())
            .ok_or_else(|| DriverError::StaleElement {
                element: element.id().to_string(),
            })
    }

    /// Run one command to completion, bounded by the request timeout.
    fn block<T, F>(&self, command: &str, fut: F) -> Result<T, DriverError>
    where
        F: Future<Output = Result<T, WebDriverError>>,
    {
        let timeout = self.request_timeout;
        match self.runtime.block_on(async { tokio::time::timeout(timeout, fut).await }) {
            Ok(result) => result.map_err(|e| map_error(command, e)),
            Err(_) => Err(DriverError::CommandTimedOut {
                command: command.to_string(),
                timeout,
            }),
        }
    }
}

/// Sort a `thirtyfour` error into the driver error taxonomy.
fn map_error(command: &str, err: WebDriverError) -> DriverError {
    let message = err.to_string();
    match err {
        WebDriverError::NoSuchElement(_) => DriverError::ElementNotFound { locator: message },
        WebDriverError::StaleElementReference(_) => DriverError::StaleElement { element: message },
        WebDriverError::ElementNotInteractable(_) | WebDriverError::ElementClickIntercepted(_) => {
            DriverError::NotInteractable { element: message }
        }
        WebDriverError::InvalidSessionId(_) => DriverError::SessionClosed,
        other => DriverError::WebDriver {
            command: command.to_string(),
            source: other,
        },
    }
}

impl PageDriver for WebDriverSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        let driver = self.driver()?;
        self.block("navigate", driver.goto(url))?;
        self.elements.clear();
        Ok(())
    }

    fn find_element(&mut self, locator: &Locator) -> Result<ElementRef, DriverError> {
        let driver = self.driver()?;
        let found = self
            .block("find element", driver.find(locator.to_by()))
            .map_err(|e| match e {
                DriverError::ElementNotFound { .. } => DriverError::ElementNotFound {
                    locator: locator.to_string(),
                },
                other => other,
            })?;

        // Re-resolving a locator replaces its cached element.
        let id = locator.to_string();
        self.elements.insert(id.clone(), found);
        Ok(ElementRef::new(id, locator.clone()))
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        let found = self.element(element)?;
        self.block("send keys", found.send_keys(text))
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), DriverError> {
        let found = self.element(element)?;
        self.block("click", found.click())
    }

    fn element_text(&mut self, element: &ElementRef) -> Result<String, DriverError> {
        let found = self.element(element)?;
        self.block("element text", found.text())
    }

    fn is_interactable(&mut self, element: &ElementRef) -> Result<bool, DriverError> {
        let found = self.element(element)?;
        if !self.block("element displayed", found.is_displayed())? {
            return Ok(false);
        }
        self.block("element enabled", found.is_enabled())
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        let driver = self.driver()?;
        Ok(self.block("current url", driver.current_url())?.to_string())
    }

    fn current_title(&mut self) -> Result<String, DriverError> {
        let driver = self.driver()?;
        self.block("title", driver.title())
    }

    fn page_source(&mut self) -> Result<String, DriverError> {
        let driver = self.driver()?;
        self.block("page source", driver.source())
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        let Some(driver) = self.driver.take() else {
            return Ok(());
        };
        self.elements.clear();
        match self.block("delete session", driver.quit()) {
            Ok(()) => debug!("webdriver session closed"),
            Err(e) => warn!("failed to close webdriver session: {}", e),
        }
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

/// Launches one [`WebDriverSession`] per call.
#[derive(Debug, Clone, Default)]
pub struct WebDriverFactory {
    pub options: WebDriverOptions,
}

impl WebDriverFactory {
    pub fn new(options: WebDriverOptions) -> Self {
        Self { options }
    }
}

impl DriverFactory for WebDriverFactory {
    fn open(&self) -> Result<Box<dyn PageDriver>, DriverError> {
        Ok(Box::new(WebDriverSession::launch(&self.options)?))
    }
}
