use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thirtyfour::By;

/// How a locator resolves an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Id,
    Css,
    XPath,
}

/// An opaque element descriptor, written as `id=...`, `css=...` or `xpath=...`.
///
/// A string without a known prefix is taken as a CSS selector. Locators
/// serialize back to their prefixed string form so they read naturally in
/// scenario YAML.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Id,
            value: value.into(),
        }
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: value.into(),
        }
    }

    /// The add-to-cart button inside the inventory card whose name contains `product`.
    pub fn add_to_cart_button(product: &str) -> Self {
        Self::xpath(format!(
            "//div[contains(text(), {})]/ancestor::div[@class='inventory_item']//button",
            xpath_literal(product)
        ))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The selector as WebDriver sees it. There is no id strategy in W3C, so ids go through CSS.
    pub fn w3c_selector(&self) -> (Strategy, String) {
        match self.strategy {
            Strategy::Id => (Strategy::Css, format!("[id=\"{}\"]", self.value)),
            Strategy::Css => (Strategy::Css, self.value.clone()),
            Strategy::XPath => (Strategy::XPath, self.value.clone()),
        }
    }

    pub fn to_by(&self) -> By {
        match self.w3c_selector() {
            (Strategy::XPath, value) => By::XPath(value),
            (_, value) => By::Css(value),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.strategy {
            Strategy::Id => "id",
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
        };
        write!(f, "{}={}", prefix, self.value)
    }
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("locator must not be empty".into());
        }

        let locator = if let Some(rest) = s.strip_prefix("id=") {
            Locator::id(rest)
        } else if let Some(rest) = s.strip_prefix("css=") {
            Locator::css(rest)
        } else if let Some(rest) = s.strip_prefix("xpath=") {
            Locator::xpath(rest)
        } else {
            Locator::css(s)
        };

        if locator.value.is_empty() {
            return Err(format!("locator '{}' has an empty selector", s));
        }
        Ok(locator)
    }
}

impl TryFrom<String> for Locator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}

/// Quote `text` as an XPath string literal.
///
/// XPath 1.0 has no escape sequences, so text containing both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
