//! Predicates for [`wait_until`](crate::wait::policy::wait_until).
//!
//! Driver errors while evaluating a condition (element not rendered yet,
//! stale reference, page mid-navigation) count as "not yet".

use crate::browser::driver::PageDriver;
use crate::browser::locator::Locator;

pub fn title_is(expected: &str) -> impl FnMut(&mut dyn PageDriver) -> bool + '_ {
    move |driver| driver.current_title().is_ok_and(|title| title == expected)
}

pub fn url_is(expected: &str) -> impl FnMut(&mut dyn PageDriver) -> bool + '_ {
    move |driver| driver.current_url().is_ok_and(|url| url == expected)
}

pub fn element_present(locator: &Locator) -> impl FnMut(&mut dyn PageDriver) -> bool + '_ {
    move |driver| driver.find_element(locator).is_ok()
}

pub fn element_clickable(locator: &Locator) -> impl FnMut(&mut dyn PageDriver) -> bool + '_ {
    move |driver| match driver.find_element(locator) {
        Ok(element) => driver.is_interactable(&element).unwrap_or(false),
        Err(_) => false,
    }
}

pub fn element_text_is<'a>(
    locator: &'a Locator,
    expected: &'a str,
) -> impl FnMut(&mut dyn PageDriver) -> bool + 'a {
    move |driver| read_text(driver, locator).is_some_and(|text| text.trim() == expected)
}

pub fn element_text_contains<'a>(
    locator: &'a Locator,
    expected: &'a str,
) -> impl FnMut(&mut dyn PageDriver) -> bool + 'a {
    move |driver| read_text(driver, locator).is_some_and(|text| text.contains(expected))
}

/// Holds when the element reads `expected`, or when it is not on the page at all.
pub fn element_text_is_or_absent<'a>(
    locator: &'a Locator,
    expected: &'a str,
) -> impl FnMut(&mut dyn PageDriver) -> bool + 'a {
    move |driver| match driver.find_element(locator) {
        Ok(element) => driver
            .element_text(&element)
            .is_ok_and(|text| text.trim() == expected),
        Err(e) => e.is_not_found(),
    }
}

fn read_text(driver: &mut dyn PageDriver, locator: &Locator) -> Option<String> {
    let element = driver.find_element(locator).ok()?;
    driver.element_text(&element).ok()
}
