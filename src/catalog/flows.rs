use std::fmt;

use clap::ValueEnum;

use crate::catalog::credentials::{
    LOCKED_OUT_ERROR, locked_out_user, negative_login_table, other_users, standard_user,
};
use crate::catalog::pages::{
    CART_TITLE, CHECKOUT_COMPLETE_TITLE, CHECKOUT_INFO_TITLE, CHECKOUT_OVERVIEW_TITLE,
    INVENTORY_TITLE, Pages,
};
use crate::scenario::scenario_model::{Credential, ExpectedOutcome, Scenario, Step};

/// Products bought by the purchase flow, in order.
pub const SANITY_PRODUCTS: [&str; 2] = ["Sauce Labs Backpack", "Sauce Labs Bolt T-Shirt"];

pub const CHECKOUT_FIRST_NAME: &str = "John";
pub const CHECKOUT_LAST_NAME: &str = "Doe";
pub const CHECKOUT_POSTAL_CODE: &str = "12345";

pub const ORDER_CONFIRMATION: &str = "Your order has been dispatched";

/// Named groups of catalog scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Flow {
    /// standard_user logs in and lands on the inventory
    StandardLogin,
    /// The remaining valid users log in and out in turn
    OtherUsers,
    /// locked_out_user is rejected
    LockedOut,
    /// Each rejected credential shows its error
    NegativeLogin,
    /// Add two products, check out, confirm the order
    Sanity,
    /// Every flow above, in order
    All,
}

impl Flow {
    /// The concrete flows this selection stands for.
    pub fn expand(self) -> Vec<Flow> {
        match self {
            Flow::All => vec![
                Flow::StandardLogin,
                Flow::OtherUsers,
                Flow::LockedOut,
                Flow::NegativeLogin,
                Flow::Sanity,
            ],
            other => vec![other],
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flow::StandardLogin => "standard-login",
            Flow::OtherUsers => "other-users",
            Flow::LockedOut => "locked-out",
            Flow::NegativeLogin => "negative-login",
            Flow::Sanity => "sanity",
            Flow::All => "all",
        };
        f.write_str(name)
    }
}

/// Builds the catalog scenarios against a set of storefront pages.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pages: Pages,
}

impl Catalog {
    pub fn new(pages: Pages) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Scenarios for the given flows, duplicates removed, in first-seen order.
    pub fn scenarios(&self, flows: &[Flow]) -> Vec<Scenario> {
        let mut seen = Vec::new();
        for flow in flows.iter().flat_map(|f| f.expand()) {
            if !seen.contains(&flow) {
                seen.push(flow);
            }
        }
        seen.into_iter().flat_map(|flow| self.flow(flow)).collect()
    }

    pub fn flow(&self, flow: Flow) -> Vec<Scenario> {
        match flow {
            Flow::StandardLogin => vec![self.standard_login()],
            Flow::OtherUsers => vec![self.other_users_login()],
            Flow::LockedOut => vec![self.locked_out()],
            Flow::NegativeLogin => self.negative_login(),
            Flow::Sanity => vec![self.sanity()],
            Flow::All => self.scenarios(&[Flow::All]),
        }
    }

    pub fn standard_login(&self) -> Scenario {
        let credential = standard_user();
        let mut steps = vec![Step::login(&credential)];
        steps.extend(self.expect_page(self.pages.inventory_url(), INVENTORY_TITLE));

        Scenario {
            name: format!("Login: {}", credential.username),
            start_url: self.pages.login_url().to_string(),
            credential: Some(credential),
            steps,
        }
    }

    /// All remaining valid users in one session, logging out after each.
    pub fn other_users_login(&self) -> Scenario {
        let mut steps = Vec::new();
        for user in &other_users() {
            steps.push(Step::login(user));
            steps.extend(self.expect_page(self.pages.inventory_url(), INVENTORY_TITLE));
            steps.push(Step::Logout);
            steps.push(Step::expect(ExpectedOutcome::Url {
                expected: self.pages.login_url().to_string(),
            }));
        }

        Scenario {
            name: "Login: other users with logout".to_string(),
            start_url: self.pages.login_url().to_string(),
            // Several users log in, so there is no single credential.
            credential: None,
            steps,
        }
    }

    pub fn locked_out(&self) -> Scenario {
        self.rejected_login(
            format!("Login rejected: {}", locked_out_user().username),
            locked_out_user(),
            LOCKED_OUT_ERROR,
        )
    }

    /// One scenario per rejected credential, each in its own session.
    pub fn negative_login(&self) -> Vec<Scenario> {
        negative_login_table()
            .into_iter()
            .enumerate()
            .map(|(i, (credential, error))| {
                let name = format!(
                    "Login rejected #{}: '{}' / '{}'",
                    i + 1,
                    credential.username,
                    credential.password
                );
                self.rejected_login(name, credential, error)
            })
            .collect()
    }

    /// Log in, buy the sanity products, and check every stage of checkout.
    pub fn sanity(&self) -> Scenario {
        let credential = standard_user();
        let pages = &self.pages;
        let mut steps = Vec::new();

        steps.push(Step::login(&credential));
        steps.extend(self.expect_page(pages.inventory_url(), INVENTORY_TITLE));

        for product in SANITY_PRODUCTS {
            steps.push(Step::AddToCart {
                product: product.to_string(),
            });
        }
        let count = SANITY_PRODUCTS.len() as u32;
        steps.push(Step::expect(ExpectedOutcome::ItemCount { expected: count }));

        steps.push(Step::Click {
            locator: pages.cart_link.clone(),
        });
        steps.extend(self.expect_page(pages.cart_url(), CART_TITLE));
        steps.push(Step::expect(ExpectedOutcome::ItemCount { expected: count }));

        steps.push(Step::Click {
            locator: pages.checkout_button.clone(),
        });
        steps.extend(self.expect_page(pages.checkout_info_url(), CHECKOUT_INFO_TITLE));

        for (locator, text) in [
            (&pages.first_name_field, CHECKOUT_FIRST_NAME),
            (&pages.last_name_field, CHECKOUT_LAST_NAME),
            (&pages.postal_code_field, CHECKOUT_POSTAL_CODE),
        ] {
            steps.push(Step::Type {
                locator: locator.clone(),
                text: text.to_string(),
            });
        }

        // "Continue" and "Finish" share a locator.
        steps.push(Step::Click {
            locator: pages.cart_button.clone(),
        });
        steps.extend(self.expect_page(pages.checkout_overview_url(), CHECKOUT_OVERVIEW_TITLE));

        steps.push(Step::Click {
            locator: pages.cart_button.clone(),
        });
        steps.extend(self.expect_page(pages.checkout_complete_url(), CHECKOUT_COMPLETE_TITLE));

        steps.push(Step::expect(ExpectedOutcome::ContainsText {
            expected: ORDER_CONFIRMATION.to_string(),
            locator: pages.complete_text.clone(),
        }));

        Scenario {
            name: "Sanity: purchase two products".to_string(),
            start_url: pages.login_url().to_string(),
            credential: Some(credential),
            steps,
        }
    }

    fn rejected_login(&self, name: String, credential: Credential, error: &str) -> Scenario {
        Scenario {
            name,
            start_url: self.pages.login_url().to_string(),
            steps: vec![
                Step::login(&credential),
                Step::expect(ExpectedOutcome::ErrorMessage {
                    expected: error.to_string(),
                }),
            ],
            credential: Some(credential),
        }
    }

    fn expect_page(&self, url: String, title: &str) -> [Step; 2] {
        [
            Step::expect(ExpectedOutcome::Url { expected: url }),
            Step::expect(ExpectedOutcome::Title {
                expected: title.to_string(),
            }),
        ]
    }
}
