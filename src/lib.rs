//! Browser scenarios for the Swag Labs demo storefront.
//!
//! A [`scenario::runner::ScenarioRunner`] opens a fresh [`browser::driver::PageDriver`]
//! per scenario, runs its steps in order, and stops at the first failing
//! assertion. Every read of page state is preceded by a bounded
//! [`wait::policy::wait_until`] poll.

pub mod browser;
pub mod catalog;
pub mod cli;
pub mod report;
pub mod scenario;
pub mod trace;
pub mod wait;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
