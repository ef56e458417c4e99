//! An in-memory stand-in for the Swag Labs storefront.
//!
//! Implements `PageDriver` with the same pages, locators, titles and login
//! rules as the live site, plus knobs for render latency so wait behavior
//! can be exercised deterministically.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use swag_scenarios::browser::driver::{ElementRef, PageDriver};
use swag_scenarios::browser::error::DriverError;
use swag_scenarios::browser::locator::Locator;
use swag_scenarios::catalog::pages::{DEFAULT_BASE_URL, Pages};

pub const PRODUCTS: [&str; 6] = [
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Bolt T-Shirt",
    "Sauce Labs Fleece Jacket",
    "Sauce Labs Onesie",
    "Test.allTheThings() T-Shirt (Red)",
];

const VALID_USERS: [&str; 5] = [
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

pub const COMPLETE_TEXT: &str =
    "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Login | Page::Inventory => "Swag Labs",
            Page::Cart => "Your Cart",
            Page::CheckoutInfo => "Checkout: Your Information",
            Page::CheckoutOverview => "Checkout: Overview",
            Page::CheckoutComplete => "Checkout: Complete!",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Page::Login => "",
            Page::Inventory => "inventory.html",
            Page::Cart => "cart.html",
            Page::CheckoutInfo => "checkout-step-one.html",
            Page::CheckoutOverview => "checkout-step-two.html",
            Page::CheckoutComplete => "checkout-complete.html",
        }
    }
}

/// Shared counters a test keeps after the store has been boxed and dropped.
#[derive(Debug, Default)]
pub struct SessionLog {
    pub sessions_opened: usize,
    pub sessions_quit: usize,
    pub visited: Vec<String>,
    pub clicks: Vec<String>,
}

pub type SharedLog = Rc<RefCell<SessionLog>>;

pub fn session_log() -> SharedLog {
    Rc::new(RefCell::new(SessionLog::default()))
}

/// Latency and fault knobs.
#[derive(Debug, Clone, Default)]
pub struct StoreBehavior {
    /// Title reads that return an empty string after each page change
    pub title_lag_reads: u32,
    /// Products whose button needs this many interactability checks before it is clickable
    pub slow_products: HashMap<String, u32>,
    /// Products whose card never renders
    pub missing_products: Vec<String>,
    /// Panic on the first click, to exercise unwinding
    pub panic_on_click: bool,
}

pub struct FakeStore {
    pages: Pages,
    behavior: StoreBehavior,
    session_log: SharedLog,

    page: Page,
    user: Option<String>,
    username_input: String,
    password_input: String,
    error: Option<String>,
    menu_open: bool,
    cart: Vec<String>,
    checkout: [String; 3],
    title_lag: u32,
    interactable_checks: HashMap<String, u32>,
    closed: bool,
}

impl FakeStore {
    pub fn new(session_log: SharedLog) -> Self {
        Self::with_behavior(session_log, StoreBehavior::default())
    }

    pub fn with_behavior(session_log: SharedLog, behavior: StoreBehavior) -> Self {
        session_log.borrow_mut().sessions_opened += 1;
        FakeStore {
            pages: Pages::new(DEFAULT_BASE_URL),
            behavior,
            session_log,
            page: Page::Login,
            user: None,
            username_input: String::new(),
            password_input: String::new(),
            error: None,
            menu_open: false,
            cart: Vec::new(),
            checkout: Default::default(),
            title_lag: 0,
            interactable_checks: HashMap::new(),
            closed: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn cart(&self) -> &[String] {
        &self.cart
    }

    fn url_of(&self, page: Page) -> String {
        format!("{}{}", self.pages.login_url(), page.path())
    }

    fn go(&mut self, page: Page) {
        self.page = page;
        self.menu_open = false;
        self.title_lag = self.behavior.title_lag_reads;
        let url = self.url_of(page);
        self.session_log.borrow_mut().visited.push(url);
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            Err(DriverError::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// Product whose add-to-cart button this locator targets, if rendered.
    fn product_for(&self, locator: &Locator) -> Option<&'static str> {
        PRODUCTS.iter().copied().find(|name| {
            *locator == Locator::add_to_cart_button(name)
                && !self.behavior.missing_products.iter().any(|m| m.as_str() == *name)
        })
    }

    /// Whether `locator` resolves on the current page.
    fn present(&self, locator: &Locator) -> bool {
        let p = &self.pages;
        let logged_in_page = self.page != Page::Login;

        match self.page {
            Page::Login => {
                if *locator == p.username_field || *locator == p.password_field || *locator == p.login_button {
                    return true;
                }
                if *locator == p.error_banner {
                    return self.error.is_some();
                }
            }
            Page::Inventory => {
                if self.product_for(locator).is_some() {
                    return true;
                }
            }
            Page::Cart => {
                if *locator == p.checkout_button {
                    return true;
                }
            }
            Page::CheckoutInfo => {
                if *locator == p.first_name_field
                    || *locator == p.last_name_field
                    || *locator == p.postal_code_field
                    || *locator == p.cart_button
                {
                    return true;
                }
                if *locator == p.error_banner {
                    return self.error.is_some();
                }
            }
            Page::CheckoutOverview => {
                if *locator == p.cart_button {
                    return true;
                }
            }
            Page::CheckoutComplete => {
                if *locator == p.complete_text {
                    return true;
                }
            }
        }

        if logged_in_page {
            if *locator == p.menu_button || *locator == p.logout_link || *locator == p.cart_link {
                return true;
            }
            if *locator == p.cart_badge {
                return !self.cart.is_empty();
            }
        }

        false
    }

    fn resolve(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.ensure_open()?;
        if self.present(element.locator()) {
            Ok(())
        } else {
            Err(DriverError::StaleElement {
                element: element.id().to_string(),
            })
        }
    }

    fn submit_login(&mut self) {
        let user = self.username_input.clone();
        let password = self.password_input.clone();

        let error = if user.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if user == "locked_out_user" && password == "secret_sauce" {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else if VALID_USERS.contains(&user.as_str()) && password == "secret_sauce" {
            None
        } else {
            Some("Epic sadface: Username and password do not match any user in this service")
        };

        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.error = None;
                self.user = Some(user);
                self.go(Page::Inventory);
            }
        }
    }

    fn logout(&mut self) {
        self.user = None;
        self.cart.clear();
        self.username_input.clear();
        self.password_input.clear();
        self.error = None;
        self.go(Page::Login);
    }
}

impl PageDriver for FakeStore {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        let target = [
            Page::Login,
            Page::Inventory,
            Page::Cart,
            Page::CheckoutInfo,
            Page::CheckoutOverview,
            Page::CheckoutComplete,
        ]
        .into_iter()
        .find(|page| self.url_of(*page) == url || (*page == Page::Login && url == DEFAULT_BASE_URL.trim_end_matches('/')));

        match target {
            Some(Page::Login) | None => {
                self.error = None;
                self.username_input.clear();
                self.password_input.clear();
                self.go(Page::Login);
            }
            Some(page) if self.user.is_none() => {
                self.go(Page::Login);
                self.error = Some(format!(
                    "Epic sadface: You can only access '/{}' when you are logged in.",
                    page.path()
                ));
            }
            Some(page) => self.go(page),
        }
        Ok(())
    }

    fn find_element(&mut self, locator: &Locator) -> Result<ElementRef, DriverError> {
        self.ensure_open()?;
        if self.present(locator) {
            Ok(ElementRef::new(locator.to_string(), locator.clone()))
        } else {
            Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        self.resolve(element)?;
        let p = &self.pages;
        let locator = element.locator();

        let field = if *locator == p.username_field {
            &mut self.username_input
        } else if *locator == p.password_field {
            &mut self.password_input
        } else if *locator == p.first_name_field {
            &mut self.checkout[0]
        } else if *locator == p.last_name_field {
            &mut self.checkout[1]
        } else if *locator == p.postal_code_field {
            &mut self.checkout[2]
        } else {
            return Err(DriverError::NotInteractable {
                element: format!("{} does not accept text", locator),
            });
        };
        field.push_str(text);
        Ok(())
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), DriverError> {
        self.resolve(element)?;
        if self.behavior.panic_on_click {
            panic!("simulated browser crash");
        }
        self.session_log.borrow_mut().clicks.push(element.id().to_string());

        let locator = element.locator().clone();
        let p = self.pages.clone();

        if locator == p.login_button {
            self.submit_login();
        } else if locator == p.menu_button {
            self.menu_open = true;
        } else if locator == p.logout_link {
            if !self.menu_open {
                return Err(DriverError::NotInteractable {
                    element: "logout link is hidden".into(),
                });
            }
            self.logout();
        } else if locator == p.cart_link {
            self.go(Page::Cart);
        } else if locator == p.checkout_button {
            self.go(Page::CheckoutInfo);
        } else if locator == p.cart_button {
            match self.page {
                Page::CheckoutInfo => {
                    if self.checkout.iter().any(|f| f.is_empty()) {
                        self.error = Some("Error: First Name is required".into());
                    } else {
                        self.error = None;
                        self.go(Page::CheckoutOverview);
                    }
                }
                Page::CheckoutOverview => {
                    self.cart.clear();
                    self.go(Page::CheckoutComplete);
                }
                _ => {}
            }
        } else if let Some(product) = self.product_for(&locator) {
            match self.cart.iter().position(|item| item == product) {
                Some(i) => {
                    self.cart.remove(i);
                }
                None => self.cart.push(product.to_string()),
            }
        }
        Ok(())
    }

    fn element_text(&mut self, element: &ElementRef) -> Result<String, DriverError> {
        self.resolve(element)?;
        let p = &self.pages;
        let locator = element.locator();

        let text = if *locator == p.error_banner {
            self.error.clone().unwrap_or_default()
        } else if *locator == p.cart_badge {
            self.cart.len().to_string()
        } else if *locator == p.complete_text {
            COMPLETE_TEXT.to_string()
        } else if *locator == p.login_button {
            "Login".to_string()
        } else if let Some(product) = self.product_for(locator) {
            if self.cart.iter().any(|item| item == product) {
                "Remove".to_string()
            } else {
                "Add to cart".to_string()
            }
        } else {
            String::new()
        };
        Ok(text)
    }

    fn is_interactable(&mut self, element: &ElementRef) -> Result<bool, DriverError> {
        self.resolve(element)?;
        let locator = element.locator();

        if *locator == self.pages.logout_link {
            return Ok(self.menu_open);
        }

        if let Some(product) = self.product_for(locator) {
            if let Some(needed) = self.behavior.slow_products.get(product).copied() {
                let seen = self.interactable_checks.entry(product.to_string()).or_insert(0);
                *seen += 1;
                return Ok(*seen > needed);
            }
        }

        Ok(true)
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        self.ensure_open()?;
        Ok(self.url_of(self.page))
    }

    fn current_title(&mut self) -> Result<String, DriverError> {
        self.ensure_open()?;
        if self.title_lag > 0 {
            self.title_lag -= 1;
            return Ok(String::new());
        }
        Ok(self.page.title().to_string())
    }

    fn page_source(&mut self) -> Result<String, DriverError> {
        self.ensure_open()?;
        Ok(format!(
            "<html><head><title>{}</title></head><body data-page=\"{:?}\"></body></html>",
            self.page.title(),
            self.page
        ))
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        if !self.closed {
            self.closed = true;
            self.session_log.borrow_mut().sessions_quit += 1;
        }
        Ok(())
    }
}

/// A factory closure handing out fresh stores that report into `session_log`.
pub fn store_factory(
    session_log: &SharedLog,
    behavior: StoreBehavior,
) -> impl Fn() -> Result<Box<dyn PageDriver>, DriverError> {
    let session_log = session_log.clone();
    move || {
        let store = FakeStore::with_behavior(session_log.clone(), behavior.clone());
        Ok(Box::new(store) as Box<dyn PageDriver>)
    }
}
