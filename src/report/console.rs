use crate::report::report_model::SuiteReport;
use crate::scenario::scenario_model::FailureCause;

/// Format a suite report for the terminal.
///
/// ```text
/// === Suite: Swag Labs ===
///
/// ✓ PASS  Login: standard_user (3/3 steps, 2 assertions)
/// ✗ FAIL  Login rejected #3: '' / 'correct_password' (1/2 steps, 1 assertions)
///     [FAIL] Step 1 (expect error message = "..."): Error message validation failed
///            expected: Epic sadface: Password is required
///            actual:   Epic sadface: Username is required
///
/// === Results: 1 passed, 1 failed (2 total) in 4.2s ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Suite: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({}/{} steps, {} assertions)\n",
            marker, result.scenario_name, result.passed_steps, result.steps_total, result.assertions_run
        ));

        let Some(failure) = &result.first_failure else {
            continue;
        };

        let location = match failure.step_index {
            Some(i) => format!("Step {} ({})", i, failure.step),
            None => failure.step.clone(),
        };

        match &failure.cause {
            FailureCause::Mismatch {
                expected,
                actual,
                message,
            } => {
                out.push_str(&format!("    [FAIL] {}: {}\n", location, message));
                out.push_str(&format!("           expected: {}\n", expected));
                out.push_str(&format!("           actual:   {}\n", actual));
            }
            FailureCause::ElementNotFound { locator } => {
                out.push_str(&format!("    [ERROR] {}: element '{}' not found\n", location, locator));
            }
            FailureCause::Driver { message } | FailureCause::Session { message } => {
                out.push_str(&format!("    [ERROR] {}: {}\n", location, message));
            }
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
