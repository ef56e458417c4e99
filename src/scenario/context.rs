use std::time::Instant;

use crate::scenario::scenario_model::{ScenarioResult, StepFailure};

/// Tracks progress through one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    /// Steps that finished without failing
    pub passed_steps: usize,

    /// Assertions evaluated so far
    pub assertions_run: usize,

    started: Instant,
}

impl ScenarioContext {
    pub fn new() -> Self {
        ScenarioContext {
            passed_steps: 0,
            assertions_run: 0,
            started: Instant::now(),
        }
    }

    pub fn record_pass(&mut self) {
        self.passed_steps += 1;
    }

    pub fn record_assertion(&mut self) {
        self.assertions_run += 1;
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Close the run with an optional failure.
    pub fn finish(self, scenario_name: &str, steps_total: usize, failure: Option<StepFailure>) -> ScenarioResult {
        ScenarioResult {
            scenario_name: scenario_name.to_string(),
            passed: failure.is_none(),
            passed_steps: self.passed_steps,
            steps_total,
            assertions_run: self.assertions_run,
            first_failure: failure,
            duration_ms: self.elapsed_ms(),
        }
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new()
    }
}
