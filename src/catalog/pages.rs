use crate::browser::locator::Locator;

/// Default address of the storefront under test.
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Title shared by the login and inventory pages.
pub const INVENTORY_TITLE: &str = "Swag Labs";
pub const CART_TITLE: &str = "Your Cart";
pub const CHECKOUT_INFO_TITLE: &str = "Checkout: Your Information";
pub const CHECKOUT_OVERVIEW_TITLE: &str = "Checkout: Overview";
pub const CHECKOUT_COMPLETE_TITLE: &str = "Checkout: Complete!";

/// URLs and element locators of the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct Pages {
    base_url: String,

    pub username_field: Locator,
    pub password_field: Locator,
    pub login_button: Locator,
    pub error_banner: Locator,

    pub menu_button: Locator,
    pub logout_link: Locator,

    pub cart_badge: Locator,
    pub cart_link: Locator,
    pub checkout_button: Locator,

    pub first_name_field: Locator,
    pub last_name_field: Locator,
    pub postal_code_field: Locator,
    /// Shared by the "Continue" and "Finish" buttons
    pub cart_button: Locator,

    pub complete_text: Locator,
}

impl Pages {
    pub fn new(base_url: &str) -> Self {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Pages {
            base_url: base,
            username_field: Locator::id("user-name"),
            password_field: Locator::id("password"),
            login_button: Locator::id("login-button"),
            error_banner: Locator::css("[data-test='error']"),
            menu_button: Locator::id("react-burger-menu-btn"),
            logout_link: Locator::id("logout_sidebar_link"),
            cart_badge: Locator::css(".shopping_cart_badge"),
            cart_link: Locator::css(".shopping_cart_link"),
            checkout_button: Locator::css(".checkout_button"),
            first_name_field: Locator::id("first-name"),
            last_name_field: Locator::id("last-name"),
            postal_code_field: Locator::id("postal-code"),
            cart_button: Locator::css(".cart_button"),
            complete_text: Locator::xpath("//div[@class='complete-text']"),
        }
    }

    /// The login page, which is also the site root.
    pub fn login_url(&self) -> &str {
        &self.base_url
    }

    pub fn inventory_url(&self) -> String {
        self.page("inventory.html")
    }

    pub fn cart_url(&self) -> String {
        self.page("cart.html")
    }

    pub fn checkout_info_url(&self) -> String {
        self.page("checkout-step-one.html")
    }

    pub fn checkout_overview_url(&self) -> String {
        self.page("checkout-step-two.html")
    }

    pub fn checkout_complete_url(&self) -> String {
        self.page("checkout-complete.html")
    }

    fn page(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }
}

impl Default for Pages {
    fn default() -> Self {
        Pages::new(DEFAULT_BASE_URL)
    }
}
