use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::scenario::scenario_model::{Step, StepKind};

/// One line of the JSONL step trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub scenario: String,

    /// `None` for session-level events
    pub step_index: Option<usize>,
    pub step: String,
    pub kind: Option<String>,

    /// done, skipped, passed, failed
    pub outcome: String,
    pub detail: Option<String>,
    pub elapsed_ms: Option<u128>,
}

impl TraceEvent {
    pub fn now(scenario: &str, outcome: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            scenario: scenario.to_string(),
            step_index: None,
            step: String::new(),
            kind: None,
            outcome: outcome.to_string(),
            detail: None,
            elapsed_ms: None,
        }
    }

    pub fn with_step(mut self, index: usize, step: &Step) -> Self {
        self.step_index = Some(index);
        self.step = step.to_string();
        self.kind = Some(
            match step.kind() {
                StepKind::Action => "action",
                StepKind::Assertion => "assertion",
            }
            .to_string(),
        );
        self
    }

    pub fn with_label(mut self, label: impl ToString) -> Self {
        self.step = label.to_string();
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_elapsed(mut self, elapsed_ms: u128) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }
}
