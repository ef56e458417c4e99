use tracing::{debug, warn};

use crate::browser::driver::{ElementRef, PageDriver};
use crate::browser::error::DriverError;
use crate::browser::locator::Locator;
use crate::catalog::pages::Pages;
use crate::scenario::scenario_model::{ExpectedOutcome, FailureCause, Step};
use crate::wait::conditions::{
    element_clickable, element_present, element_text_contains, element_text_is, element_text_is_or_absent,
    title_is, url_is,
};
use crate::wait::policy::{WaitConfig, WaitOutcome, WaitSpec, wait_until};

/// What a step did when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An action completed
    Done,

    /// An action completed without its side effect (see [`Step::AddToCart`])
    Skipped { reason: String },

    /// An assertion held; `actual` is the value that was read
    Passed { actual: String },
}

impl From<DriverError> for FailureCause {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::ElementNotFound { locator } => FailureCause::ElementNotFound { locator },
            other => FailureCause::Driver {
                message: other.to_string(),
            },
        }
    }
}

/// Executes single steps against a driver, using the storefront's locators
/// and the configured wait bounds.
pub struct StepExecutor<'a> {
    pages: &'a Pages,
    waits: WaitConfig,
}

impl<'a> StepExecutor<'a> {
    pub fn new(pages: &'a Pages, waits: WaitConfig) -> Self {
        Self { pages, waits }
    }

    pub fn execute(&self, driver: &mut dyn PageDriver, step: &Step) -> Result<StepOutcome, FailureCause> {
        match step {
            Step::Navigate { url } => {
                driver.navigate(url)?;
                Ok(StepOutcome::Done)
            }

            Step::Login { username, password } => {
                self.login(driver, username, password)?;
                Ok(StepOutcome::Done)
            }

            Step::Logout => {
                self.logout(driver)?;
                Ok(StepOutcome::Done)
            }

            Step::AddToCart { product } => self.add_to_cart(driver, product),

            Step::Click { locator } => {
                let element = self.resolve_clickable(driver, locator)?;
                driver.click(&element)?;
                Ok(StepOutcome::Done)
            }

            Step::Type { locator, text } => {
                let element = self.resolve(driver, locator)?;
                driver.send_keys(&element, text)?;
                Ok(StepOutcome::Done)
            }

            Step::Expect { outcome } => self.check(driver, outcome),
        }
    }

    fn login(&self, driver: &mut dyn PageDriver, username: &str, password: &str) -> Result<(), DriverError> {
        let username_field = self.resolve(driver, &self.pages.username_field)?;
        let password_field = driver.find_element(&self.pages.password_field)?;
        let login_button = driver.find_element(&self.pages.login_button)?;

        driver.send_keys(&username_field, username)?;
        driver.send_keys(&password_field, password)?;
        driver.click(&login_button)
    }

    fn logout(&self, driver: &mut dyn PageDriver) -> Result<(), DriverError> {
        let menu = self.resolve_clickable(driver, &self.pages.menu_button)?;
        driver.click(&menu)?;

        // The sidebar slides in, so the link is only clickable once it has rendered.
        let logout = self.resolve_clickable(driver, &self.pages.logout_link)?;
        driver.click(&logout)
    }

    fn add_to_cart(&self, driver: &mut dyn PageDriver, product: &str) -> Result<StepOutcome, FailureCause> {
        let locator = Locator::add_to_cart_button(product);
        debug!(%locator, "locating add-to-cart button for '{}'", product);

        let outcome = wait_until(driver, &self.waits.element(), element_clickable(&locator));
        match outcome {
            WaitOutcome::Satisfied { .. } => {
                let button = driver.find_element(&locator)?;
                driver.click(&button)?;
                Ok(StepOutcome::Done)
            }
            WaitOutcome::TimedOut { elapsed, .. } => {
                warn!(
                    %locator,
                    "add-to-cart button for '{}' not clickable after {:?}, skipping click",
                    product, elapsed
                );
                Ok(StepOutcome::Skipped {
                    reason: format!("'{}' was not clickable within {:?}", product, elapsed),
                })
            }
        }
    }

    /// Wait for the expected state, then read the actual state and compare.
    /// A timed-out wait falls through to the read, so the failure carries the actual value.
    fn check(&self, driver: &mut dyn PageDriver, outcome: &ExpectedOutcome) -> Result<StepOutcome, FailureCause> {
        let page = self.waits.page();
        let element = self.waits.element();

        match outcome {
            ExpectedOutcome::Url { expected } => {
                self.settle(driver, &page, url_is(expected), outcome);
                let actual = driver.current_url()?;
                compare(actual == *expected, expected, actual, "URL validation failed")
            }

            ExpectedOutcome::Title { expected } => {
                let waited = self.settle(driver, &page, title_is(expected), outcome);
                if !waited.is_satisfied() {
                    match driver.page_source() {
                        Ok(source) => debug!("page source at title timeout:\n{}", source),
                        Err(e) => debug!("could not read page source: {}", e),
                    }
                }
                let actual = driver.current_title()?;
                compare(actual.contains(expected.as_str()), expected, actual, "Title validation failed")
            }

            ExpectedOutcome::ErrorMessage { expected } => {
                let banner = &self.pages.error_banner;
                self.settle(driver, &element, element_text_is(banner, expected), outcome);
                let actual = read_text(driver, banner)?;
                compare(actual == *expected, expected, actual, "Error message validation failed")
            }

            ExpectedOutcome::ItemCount { expected } => {
                let badge = &self.pages.cart_badge;
                let expected_text = expected.to_string();

                // An empty cart renders no badge at all.
                if *expected == 0 {
                    self.settle(driver, &element, element_text_is_or_absent(badge, &expected_text), outcome);
                } else {
                    self.settle(driver, &element, element_text_is(badge, &expected_text), outcome);
                }

                let actual = match read_text(driver, badge) {
                    Ok(text) => text,
                    Err(e) if e.is_not_found() && *expected == 0 => "0".to_string(),
                    Err(e) => return Err(e.into()),
                };
                let matches = actual.parse::<u32>().is_ok_and(|n| n == *expected);
                compare(matches, &expected_text, actual, "Cart item count validation failed")
            }

            ExpectedOutcome::ContainsText { expected, locator } => {
                self.settle(driver, &element, element_text_contains(locator, expected), outcome);
                let actual = read_text(driver, locator)?;
                compare(actual.contains(expected.as_str()), expected, actual, "Text validation failed")
            }
        }
    }

    fn settle<P>(
        &self,
        driver: &mut dyn PageDriver,
        spec: &WaitSpec,
        predicate: P,
        outcome: &ExpectedOutcome,
    ) -> WaitOutcome
    where
        P: FnMut(&mut dyn PageDriver) -> bool,
    {
        let waited = wait_until(driver, spec, predicate);
        match waited {
            WaitOutcome::Satisfied { elapsed, polls } => {
                debug!("{} settled after {:?} ({} polls)", outcome, elapsed, polls)
            }
            WaitOutcome::TimedOut { elapsed, .. } => {
                warn!("timed out after {:?} waiting for {}, reading current state", elapsed, outcome)
            }
        }
        waited
    }

    /// Wait for the element to exist, then resolve it. Not found after the wait is a hard error.
    fn resolve(&self, driver: &mut dyn PageDriver, locator: &Locator) -> Result<ElementRef, DriverError> {
        wait_until(driver, &self.waits.element(), element_present(locator));
        driver.find_element(locator)
    }

    fn resolve_clickable(&self, driver: &mut dyn PageDriver, locator: &Locator) -> Result<ElementRef, DriverError> {
        wait_until(driver, &self.waits.element(), element_clickable(locator));
        driver.find_element(locator)
    }
}

fn read_text(driver: &mut dyn PageDriver, locator: &Locator) -> Result<String, DriverError> {
    let element = driver.find_element(locator)?;
    Ok(driver.element_text(&element)?.trim().to_string())
}

fn compare(passed: bool, expected: &str, actual: String, message: &str) -> Result<StepOutcome, FailureCause> {
    if passed {
        Ok(StepOutcome::Passed { actual })
    } else {
        Err(FailureCause::Mismatch {
            expected: expected.to_string(),
            actual,
            message: message.to_string(),
        })
    }
}
