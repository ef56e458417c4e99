use crate::scenario::scenario_model::Credential;

/// Password shared by every account on the storefront.
pub const VALID_PASSWORD: &str = "secret_sauce";

pub const STANDARD_USER: &str = "standard_user";
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Accounts other than `standard_user` that can log in.
pub const OTHER_USERS: [&str; 4] = [
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

pub const MISMATCH_ERROR: &str = "Epic sadface: Username and password do not match any user in this service";
pub const PASSWORD_REQUIRED_ERROR: &str = "Epic sadface: Password is required";
pub const USERNAME_REQUIRED_ERROR: &str = "Epic sadface: Username is required";
pub const LOCKED_OUT_ERROR: &str = "Epic sadface: Sorry, this user has been locked out.";

pub fn standard_user() -> Credential {
    Credential::new(STANDARD_USER, VALID_PASSWORD)
}

pub fn locked_out_user() -> Credential {
    Credential::new(LOCKED_OUT_USER, VALID_PASSWORD)
}

pub fn other_users() -> Vec<Credential> {
    OTHER_USERS
        .iter()
        .map(|user| Credential::new(*user, VALID_PASSWORD))
        .collect()
}

/// Every account expected to reach the inventory page, standard user first.
pub fn valid_users() -> Vec<Credential> {
    let mut users = vec![standard_user()];
    users.extend(other_users());
    users
}

/// Error message the catalog expects for a rejected credential.
///
/// An entirely empty form asks for the username; a form with only one field
/// filled asks for the password.
pub fn expected_login_error(credential: &Credential) -> &'static str {
    match (credential.username.is_empty(), credential.password.is_empty()) {
        (true, true) => USERNAME_REQUIRED_ERROR,
        (true, false) | (false, true) => PASSWORD_REQUIRED_ERROR,
        (false, false) if credential.username == LOCKED_OUT_USER && credential.password == VALID_PASSWORD => {
            LOCKED_OUT_ERROR
        }
        (false, false) => MISMATCH_ERROR,
    }
}

/// Rejected credentials in table order. The empty pair appears twice.
pub fn negative_login_table() -> Vec<(Credential, &'static str)> {
    [
        ("standard_user", "incorrect_password"),
        ("incorrect_user", "secret_sauce"),
        ("", "correct_password"),
        ("correct_user", ""),
        ("", ""),
        ("", ""),
    ]
    .into_iter()
    .map(|(user, password)| {
        let credential = Credential::new(user, password);
        let error = expected_login_error(&credential);
        (credential, error)
    })
    .collect()
}
