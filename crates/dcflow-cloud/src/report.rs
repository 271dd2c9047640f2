//! Outcome of an orchestration pass

use crate::remote::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a step did to one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Created,
    Unchanged,
    Attached,
    Associated,
    RouteAdded,
    Deleted,
    Absent,
    Skipped,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Created => write!(f, "created"),
            StepOutcome::Unchanged => write!(f, "unchanged"),
            StepOutcome::Attached => write!(f, "attached"),
            StepOutcome::Associated => write!(f, "associated"),
            StepOutcome::RouteAdded => write!(f, "route added"),
            StepOutcome::Deleted => write!(f, "deleted"),
            StepOutcome::Absent => write!(f, "already absent"),
            StepOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// A single step of a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: StepOutcome,
    pub detail: Option<String>,
}

/// Ordered record of every step of a pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub steps: Vec<StepRecord>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Report {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, kind: ResourceKind, name: impl Into<String>, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            kind,
            name: name.into(),
            outcome,
            detail: None,
        });
    }

    pub fn record_with(
        &mut self,
        kind: ResourceKind,
        name: impl Into<String>,
        outcome: StepOutcome,
        detail: impl Into<String>,
    ) {
        self.steps.push(StepRecord {
            kind,
            name: name.into(),
            outcome,
            detail: Some(detail.into()),
        });
    }

    /// Stamp the elapsed time
    pub fn finish(&mut self) {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        self.duration_ms = elapsed.num_milliseconds().max(0) as u64;
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }

    /// Steps for one resource kind, in order
    pub fn steps_for(&self, kind: ResourceKind) -> Vec<&StepRecord> {
        self.steps.iter().filter(|s| s.kind == kind).collect()
    }

    pub fn outcome_of(&self, kind: ResourceKind, name: &str) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.kind == kind && s.name == name)
            .map(|s| s.outcome)
    }

    pub fn has_changes(&self) -> bool {
        self.steps.iter().any(|s| {
            !matches!(
                s.outcome,
                StepOutcome::Unchanged | StepOutcome::Absent | StepOutcome::Skipped
            )
        })
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            created: self.count(StepOutcome::Created),
            changed: self.count(StepOutcome::Attached)
                + self.count(StepOutcome::Associated)
                + self.count(StepOutcome::RouteAdded),
            unchanged: self.count(StepOutcome::Unchanged),
            deleted: self.count(StepOutcome::Deleted),
            absent: self.count(StepOutcome::Absent),
            skipped: self.count(StepOutcome::Skipped),
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts per outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub absent: usize,
    pub skipped: usize,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} changed, {} unchanged, {} deleted, {} already absent, {} skipped",
            self.created, self.changed, self.unchanged, self.deleted, self.absent, self.skipped
        )
    }
}

/// Where a provisioned instance can be reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInventory {
    pub name: String,
    pub public_ip: Option<String>,
    pub dns_name: Option<String>,
}

impl fmt::Display for InstanceInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ip) = &self.public_ip {
            write!(f, " {}", ip)?;
        }
        if let Some(dns) = &self.dns_name {
            write!(f, " {}", dns)?;
        }
        Ok(())
    }
}
