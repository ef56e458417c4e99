use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::locator::Locator;

/// A username/password pair. Either field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A complete user flow: open `start_url` in a fresh session, then run `steps` in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name for this scenario
    pub name: String,

    /// URL loaded when the session opens
    pub start_url: String,

    /// Primary credential of the flow. When set and no step logs in, the
    /// runner logs in with it before the first step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,

    /// Ordered list of steps
    pub steps: Vec<Step>,
}

/// Whether a step has a side effect or checks state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Action,
    Assertion,
}

/// One user action or one assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Load a URL in the current session
    Navigate { url: String },

    /// Type the credential into the login form and submit it
    Login {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },

    /// Open the navigation menu and log out
    Logout,

    /// Click the add-to-cart button of a product, skipping the click if it never becomes clickable
    AddToCart { product: String },

    /// Click an element
    Click { locator: Locator },

    /// Type text into an element
    Type { locator: Locator, text: String },

    /// Check the page against an expected outcome
    Expect { outcome: ExpectedOutcome },
}

impl Scenario {
    /// The login the runner performs before the steps, if any.
    pub fn implicit_login(&self) -> Option<Step> {
        let logs_in = self.steps.iter().any(|step| matches!(step, Step::Login { .. }));
        match &self.credential {
            Some(credential) if !logs_in => Some(Step::login(credential)),
            _ => None,
        }
    }
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Expect { .. } => StepKind::Assertion,
            _ => StepKind::Action,
        }
    }

    pub fn login(credential: &Credential) -> Self {
        Step::Login {
            username: credential.username.clone(),
            password: credential.password.clone(),
        }
    }

    pub fn expect(outcome: ExpectedOutcome) -> Self {
        Step::Expect { outcome }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate { url } => write!(f, "navigate to {}", url),
            Step::Login { username, .. } => write!(f, "log in as '{}'", username),
            Step::Logout => write!(f, "log out"),
            Step::AddToCart { product } => write!(f, "add '{}' to cart", product),
            Step::Click { locator } => write!(f, "click {}", locator),
            Step::Type { locator, text } => write!(f, "type '{}' into {}", text, locator),
            Step::Expect { outcome } => write!(f, "expect {}", outcome),
        }
    }
}

/// What the page should show after the preceding actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectedOutcome {
    /// Current URL equals `expected`
    Url { expected: String },

    /// Page title contains `expected` (after waiting for an exact match)
    Title { expected: String },

    /// The login error banner reads exactly `expected`
    ErrorMessage { expected: String },

    /// The cart badge shows `expected` items
    ItemCount { expected: u32 },

    /// The element at `locator` has text containing `expected`
    ContainsText { expected: String, locator: Locator },
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedOutcome::Url { expected } => write!(f, "url = {}", expected),
            ExpectedOutcome::Title { expected } => write!(f, "title contains \"{}\"", expected),
            ExpectedOutcome::ErrorMessage { expected } => write!(f, "error message = \"{}\"", expected),
            ExpectedOutcome::ItemCount { expected } => write!(f, "cart item count = {}", expected),
            ExpectedOutcome::ContainsText { expected, locator } => {
                write!(f, "{} contains \"{}\"", locator, expected)
            }
        }
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum FailureCause {
    /// The page state did not match the expectation
    Mismatch {
        expected: String,
        actual: String,
        message: String,
    },

    /// A locator did not resolve
    ElementNotFound { locator: String },

    /// Any other driver failure while running the step
    Driver { message: String },

    /// The browser session could not be opened or loaded
    Session { message: String },
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Mismatch {
                expected,
                actual,
                message,
            } => write!(f, "{}. Expected: {}, Actual: {}", message, expected, actual),
            FailureCause::ElementNotFound { locator } => write!(f, "element '{}' not found", locator),
            FailureCause::Driver { message } => write!(f, "driver error: {}", message),
            FailureCause::Session { message } => write!(f, "session error: {}", message),
        }
    }
}

/// The first failing step of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepFailure {
    /// Index of the failing step, `None` when the session itself failed
    pub step_index: Option<usize>,

    /// Display form of the failing step
    pub step: String,

    pub cause: FailureCause,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step_index {
            Some(i) => write!(f, "Step {} ({}): {}", i, self.step, self.cause),
            None => write!(f, "{}: {}", self.step, self.cause),
        }
    }
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,

    /// True when every step ran and every assertion passed
    pub passed: bool,

    /// Steps completed before the first failure (all of them on success)
    pub passed_steps: usize,

    pub steps_total: usize,

    /// Assertions evaluated, passing or not
    pub assertions_run: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_failure: Option<StepFailure>,

    pub duration_ms: u128,
}
