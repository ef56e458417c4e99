use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::browser::driver::DriverFactory;
use crate::browser::webdriver::WebDriverFactory;
use crate::catalog::flows::{Catalog, Flow};
use crate::catalog::pages::Pages;
use crate::cli::config::Settings;
use crate::report::console::format_console_report;
use crate::report::report_model::SuiteReport;
use crate::scenario::runner::ScenarioRunner;
use crate::scenario::scenario_model::Scenario;
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

/// Run catalog flows (or scenario files) against a live WebDriver endpoint.
/// Returns whether every scenario passed.
pub fn cmd_run(
    settings: &Settings,
    flows: &[Flow],
    scenarios: Option<&str>,
    format: &str,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let factory = WebDriverFactory::new(settings.webdriver.clone());
    run_with_factory(factory, settings, flows, scenarios, format, output)
}

/// Same as [`cmd_run`] with any driver factory.
pub fn run_with_factory<F: DriverFactory>(
    factory: F,
    settings: &Settings,
    flows: &[Flow],
    scenarios: Option<&str>,
    format: &str,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let pages = Pages::new(&settings.base_url);
    let scenarios = match scenarios {
        Some(path) => load_scenarios(path)?,
        None => Catalog::new(pages.clone()).scenarios(&selected_flows(flows)),
    };

    info!(
        scenarios = scenarios.len(),
        repeat = settings.repeat,
        "starting run against {}",
        settings.base_url
    );

    let tracer = match &settings.trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    if tracer.is_enabled() {
        debug!("step trace enabled");
    }
    let runner = ScenarioRunner::new(factory, pages, settings.waits).with_tracer(tracer);

    let start = Instant::now();
    let results = runner.run_all(&scenarios, settings.repeat);
    let duration = start.elapsed().as_millis();

    let report = SuiteReport::from_results("Swag Labs", results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

fn selected_flows(flows: &[Flow]) -> Vec<Flow> {
    if flows.is_empty() {
        vec![Flow::All]
    } else {
        flows.to_vec()
    }
}

/// Load scenarios from a single YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut scenarios = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let p = entry?.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                let content = std::fs::read_to_string(&p)?;
                let scenario: Scenario = serde_yaml::from_str(&content)
                    .map_err(|e| format!("{}: {}", p.display(), e))?;
                scenarios.push(scenario);
            }
        }
        // Sort by name for deterministic order
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    } else {
        let content = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_yaml::from_str(&content)?;
        Ok(vec![scenario])
    }
}

// ============================================================================
// catalog subcommand
// ============================================================================

/// Write each catalog scenario to `output_dir` as numbered YAML files.
/// Returns the paths written.
pub fn cmd_catalog(settings: &Settings, output_dir: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let catalog = Catalog::new(Pages::new(&settings.base_url));
    let scenarios = catalog.scenarios(&[Flow::All]);

    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(scenarios.len());
    for (i, scenario) in scenarios.iter().enumerate() {
        let filename = format!("{:03}_{}.yaml", i + 1, sanitize_filename(&scenario.name));
        let path = Path::new(output_dir).join(&filename);
        let yaml = serde_yaml::to_string(scenario)?;
        std::fs::write(&path, &yaml)?;
        debug!("wrote {}", path.display());
        written.push(path.display().to_string());
    }

    println!("Wrote {} scenarios to {}/", written.len(), output_dir);
    Ok(written)
}

// ============================================================================
// list subcommand
// ============================================================================

/// Flows with the names of the scenarios they expand to.
pub fn cmd_list(settings: &Settings) -> String {
    let catalog = Catalog::new(Pages::new(&settings.base_url));
    let mut out = String::new();

    for flow in Flow::All.expand() {
        out.push_str(&format!("{}\n", flow));
        for scenario in catalog.flow(flow) {
            out.push_str(&format!("  - {} ({} steps)\n", scenario.name, scenario.steps.len()));
        }
    }

    out
}

// ============================================================================
// Helpers
// ============================================================================

/// Sanitize a scenario name into a safe filename.
pub fn sanitize_filename(name: &str) -> String {
    let raw: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase();

    // Collapse runs of underscores left by punctuation and spaces.
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}
