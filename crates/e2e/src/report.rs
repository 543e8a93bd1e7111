//! Structured results collected while the scenario runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a step or group ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASS",
            Outcome::Failed => "FAIL",
            Outcome::Skipped => "SKIP",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting bucket for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    Cleanup,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Cleanup => "cleanup",
        };
        f.write_str(s)
    }
}

/// One HTTP step and its verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub group: String,
    pub step: String,
    pub outcome: Outcome,
    pub detail: String,
    pub at: DateTime<Utc>,
}

/// Result of running a single group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResult {
    pub name: String,
    pub priority: Priority,
    pub outcome: Outcome,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
    pub error: Option<String>,
}

impl GroupResult {
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.outcome == Outcome::Failed)
    }
}

/// Result of the whole scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub groups: Vec<GroupResult>,
    /// Identifiers left in the shared state at the end of the run
    pub created: BTreeMap<String, String>,
}

impl SuiteResult {
    pub fn from_groups(
        base_url: impl Into<String>,
        groups: Vec<GroupResult>,
        created: BTreeMap<String, String>,
        duration_ms: u64,
    ) -> Self {
        let count = |o: Outcome| groups.iter().filter(|g| g.outcome == o).count();
        Self {
            base_url: base_url.into(),
            total: groups.len(),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            skipped: count(Outcome::Skipped),
            duration_ms,
            groups,
            created,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Groups that did not pass, in run order
    pub fn not_passed(&self) -> impl Iterator<Item = &GroupResult> {
        self.groups.iter().filter(|g| g.outcome != Outcome::Passed)
    }

    pub fn group(&self, name: &str) -> Option<&GroupResult> {
        self.groups.iter().find(|g| g.name == name)
    }
}
