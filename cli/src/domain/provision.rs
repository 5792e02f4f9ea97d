//! Provisioning stages and the per-run report.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stages of the provisioning sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    SetHostname,
    InstallPublicKey,
    ClearEphemeralPassword,
    InstallEngine,
    WaitEngineReady,
    ConfigureClusterAuth,
    ConfigureClusterJoin,
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum StepOutcome {
    Succeeded,
    /// Failed, but the step is best-effort so the sequence went on.
    Ignored { reason: String },
    /// Not run at all.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub stage: Stage,
    pub step: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Record of a successful provisioning run. Failed runs return an error instead.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub machine: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
}

impl ProvisionReport {
    #[must_use]
    pub fn new(machine: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: Stage, step: impl Into<String>, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            stage,
            step: step.into(),
            outcome,
        });
    }

    /// Steps whose failure was deliberately ignored.
    pub fn ignored(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::Ignored { .. }))
    }

    pub fn outcome_of(&self, step: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.outcome)
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}
