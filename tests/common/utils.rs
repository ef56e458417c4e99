use std::time::Duration;

use swag_scenarios::catalog::pages::Pages;
use swag_scenarios::wait::policy::WaitConfig;

/// Short waits so timeouts in tests resolve in milliseconds.
pub fn fast_waits() -> WaitConfig {
    WaitConfig {
        element_timeout: Duration::from_millis(60),
        page_timeout: Duration::from_millis(80),
        poll_interval: Duration::from_millis(2),
    }
}

pub fn pages() -> Pages {
    Pages::default()
}
