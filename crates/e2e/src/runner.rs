//! Scenario runner: plan validation, sequential execution, result collection

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};
use crate::group::{GroupContext, TestGroup};
use crate::groups;
use crate::report::{GroupResult, Outcome, SuiteResult};
use crate::state::{EntityKey, SharedState};

/// Runs the groups of a scenario one after another against one backend
pub struct TestRunner {
    client: ApiClient,
    groups: Vec<Box<dyn TestGroup>>,
    state: SharedState,
}

impl TestRunner {
    /// Runner for the full StudioMate scenario
    pub fn new(config: HarnessConfig) -> E2eResult<Self> {
        let config = config.validate()?;
        let groups = groups::scenario(&config);
        Self::with_groups(&config, groups)
    }

    /// Runner for a custom list of groups
    pub fn with_groups(config: &HarnessConfig, groups: Vec<Box<dyn TestGroup>>) -> E2eResult<Self> {
        validate_plan(&groups)?;
        Ok(Self {
            client: ApiClient::new(config)?,
            groups,
            state: SharedState::new(),
        })
    }

    pub fn groups(&self) -> &[Box<dyn TestGroup>] {
        &self.groups
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Run every group in order; a failing group never stops the next one
    pub async fn run_all(&mut self) -> SuiteResult {
        let start = Instant::now();
        info!("Running {} group(s) against {}", self.groups.len(), self.client.base_url());

        let mut results = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let result = run_group(group.as_ref(), &self.client, &mut self.state).await;
            match result.outcome {
                Outcome::Passed => info!("✓ {} ({} ms)", result.name, result.duration_ms),
                Outcome::Skipped => warn!(
                    "- {} skipped: {}",
                    result.name,
                    result.error.as_deref().unwrap_or("missing precondition")
                ),
                Outcome::Failed => error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let suite = SuiteResult::from_groups(
            self.client.base_url(),
            results,
            self.state.created(),
            duration_ms,
        );

        info!(
            "Results: {} passed, {} failed, {} skipped ({} ms)",
            suite.passed, suite.failed, suite.skipped, duration_ms
        );
        suite
    }
}

/// Check that every field a group reads is written by some earlier group
pub fn validate_plan(groups: &[Box<dyn TestGroup>]) -> E2eResult<()> {
    let mut written: BTreeSet<EntityKey> = BTreeSet::new();
    for group in groups {
        let access = group.access();
        if let Some(key) = access.inputs().find(|key| !written.contains(key)) {
            return Err(E2eError::InvalidPlan {
                group: group.name().to_string(),
                key,
            });
        }
        written.extend(access.writes.iter().copied());
    }
    Ok(())
}

async fn run_group(
    group: &dyn TestGroup,
    client: &ApiClient,
    state: &mut SharedState,
) -> GroupResult {
    let start = Instant::now();
    let access = group.access();
    info!("Testing {}...", group.name());

    let missing: Vec<String> = access
        .requires
        .iter()
        .filter(|key| !state.contains(**key))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return GroupResult {
            name: group.name().to_string(),
            priority: group.priority(),
            outcome: Outcome::Skipped,
            duration_ms: 0,
            steps: vec![],
            error: Some(format!("missing precondition: {}", missing.join(", "))),
        };
    }

    let mut ctx = GroupContext::new(group.name(), access, client, state);
    let result = group.run(&mut ctx).await;
    let steps = ctx.into_steps();

    let outcome = match &result {
        Ok(()) => Outcome::Passed,
        Err(_) if steps.iter().any(|s| s.outcome == Outcome::Failed) => Outcome::Failed,
        Err(e) if e.is_skip() => Outcome::Skipped,
        Err(_) => Outcome::Failed,
    };

    GroupResult {
        name: group.name().to_string(),
        priority: group.priority(),
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
        steps,
        error: result.err().map(|e| e.to_string()),
    }
}

/// Write the suite result as `test-results.json` inside `dir`
pub fn write_results(results: &SuiteResult, dir: &Path) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}
