use std::time::Instant;

use tracing::{debug, info, warn};

use crate::browser::driver::{DriverFactory, PageDriver};
use crate::catalog::pages::Pages;
use crate::scenario::context::ScenarioContext;
use crate::scenario::scenario_model::{FailureCause, Scenario, ScenarioResult, StepFailure, StepKind};
use crate::scenario::steps::{StepExecutor, StepOutcome};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::wait::policy::WaitConfig;

/// Owns one driver for the lifetime of one scenario and quits it on every
/// exit path, including unwinding.
struct ScopedSession {
    driver: Box<dyn PageDriver>,
}

impl ScopedSession {
    fn driver(&mut self) -> &mut dyn PageDriver {
        self.driver.as_mut()
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        match self.driver.quit() {
            Ok(()) => debug!("browser session released"),
            Err(e) => warn!("failed to release browser session: {}", e),
        }
    }
}

/// Runs scenarios, each in its own fresh browser session.
pub struct ScenarioRunner<F: DriverFactory> {
    factory: F,
    pages: Pages,
    waits: WaitConfig,
    tracer: TraceLogger,
}

impl<F: DriverFactory> ScenarioRunner<F> {
    pub fn new(factory: F, pages: Pages, waits: WaitConfig) -> Self {
        Self {
            factory,
            pages,
            waits,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Run one scenario.
    ///
    /// Steps run strictly in order. The first failing step ends the scenario
    /// and is recorded with its cause; actions only fail on driver errors.
    pub fn run(&self, scenario: &Scenario) -> ScenarioResult {
        info!(scenario = %scenario.name, steps = scenario.steps.len(), "running scenario");
        let mut ctx = ScenarioContext::new();
        let total = scenario.steps.len();

        let driver = match self.factory.open() {
            Ok(driver) => driver,
            Err(e) => return self.session_failure(ctx, scenario, "open browser session", e.to_string()),
        };
        let mut session = ScopedSession { driver };

        if let Err(e) = session.driver().navigate(&scenario.start_url) {
            let label = format!("load {}", scenario.start_url);
            return self.session_failure(ctx, scenario, &label, e.to_string());
        }

        let executor = StepExecutor::new(&self.pages, self.waits);

        if let Some(login) = scenario.implicit_login() {
            let started = Instant::now();
            let result = executor.execute(session.driver(), &login);
            let elapsed = started.elapsed().as_millis();

            if let Err(cause) = result {
                warn!(scenario = %scenario.name, "{} failed: {}", login, cause);
                self.tracer.log(
                    &TraceEvent::now(&scenario.name, "failed")
                        .with_label(&login)
                        .with_detail(&cause)
                        .with_elapsed(elapsed),
                );
                let failure = StepFailure {
                    step_index: None,
                    step: login.to_string(),
                    cause,
                };
                return ctx.finish(&scenario.name, total, Some(failure));
            }

            debug!(scenario = %scenario.name, "{} -> done", login);
            self.tracer.log(
                &TraceEvent::now(&scenario.name, "done")
                    .with_label(&login)
                    .with_elapsed(elapsed),
            );
        }

        for (i, step) in scenario.steps.iter().enumerate() {
            if step.kind() == StepKind::Assertion {
                ctx.record_assertion();
            }

            let started = Instant::now();
            let result = executor.execute(session.driver(), step);
            let elapsed = started.elapsed().as_millis();

            match result {
                Ok(outcome) => {
                    ctx.record_pass();
                    let (label, detail) = match outcome {
                        StepOutcome::Done => ("done", None),
                        StepOutcome::Skipped { reason } => ("skipped", Some(reason)),
                        StepOutcome::Passed { actual } => ("passed", Some(actual)),
                    };
                    debug!(scenario = %scenario.name, step = i, "{} -> {}", step, label);

                    let mut event = TraceEvent::now(&scenario.name, label)
                        .with_step(i, step)
                        .with_elapsed(elapsed);
                    if let Some(detail) = detail {
                        event = event.with_detail(detail);
                    }
                    self.tracer.log(&event);
                }
                Err(cause) => {
                    warn!(scenario = %scenario.name, step = i, "{} failed: {}", step, cause);
                    self.tracer.log(
                        &TraceEvent::now(&scenario.name, "failed")
                            .with_step(i, step)
                            .with_detail(&cause)
                            .with_elapsed(elapsed),
                    );

                    let failure = StepFailure {
                        step_index: Some(i),
                        step: step.to_string(),
                        cause,
                    };
                    return ctx.finish(&scenario.name, total, Some(failure));
                }
            }
        }

        let result = ctx.finish(&scenario.name, total, None);
        info!(scenario = %scenario.name, duration_ms = result.duration_ms as u64, "scenario passed");
        result
    }

    /// Run every scenario `repeat` times, in order, one session each.
    pub fn run_all(&self, scenarios: &[Scenario], repeat: usize) -> Vec<ScenarioResult> {
        let repeat = repeat.max(1);
        let mut results = Vec::with_capacity(scenarios.len() * repeat);

        for round in 1..=repeat {
            if repeat > 1 {
                info!("round {}/{}", round, repeat);
            }
            for scenario in scenarios {
                let mut result = self.run(scenario);
                if repeat > 1 {
                    result.scenario_name = format!("{} [run {}/{}]", result.scenario_name, round, repeat);
                }
                results.push(result);
            }
        }

        results
    }

    fn session_failure(
        &self,
        ctx: ScenarioContext,
        scenario: &Scenario,
        label: &str,
        message: String,
    ) -> ScenarioResult {
        warn!(scenario = %scenario.name, "{} failed: {}", label, message);
        self.tracer.log(
            &TraceEvent::now(&scenario.name, "failed")
                .with_label(label)
                .with_detail(&message),
        );

        let failure = StepFailure {
            step_index: None,
            step: label.to_string(),
            cause: FailureCause::Session { message },
        };
        ctx.finish(&scenario.name, scenario.steps.len(), Some(failure))
    }
}
