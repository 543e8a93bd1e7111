//! Test group abstraction and the per-group execution context

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::client::{ApiCall, ApiClient};
use crate::error::{E2eError, E2eResult};
use crate::report::{Outcome, Priority, StepRecord};
use crate::response::Envelope;
use crate::state::{EntityKey, SharedState};

/// Shared-state fields a group touches.
///
/// `requires` must be present for the group to run at all, `reads` are
/// passed along as `null` when absent, `writes` are the fields the group
/// owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct Access {
    pub requires: &'static [EntityKey],
    pub reads: &'static [EntityKey],
    pub writes: &'static [EntityKey],
}

impl Access {
    /// Every field the group looks at, required or not
    pub fn inputs(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.requires.iter().chain(self.reads.iter()).copied()
    }
}

/// One resource family's scripted sequence of steps
#[async_trait]
pub trait TestGroup: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> Priority;

    fn access(&self) -> Access;

    /// Run the steps in order.
    ///
    /// Returning `Err` stops the group; the failing step has already been
    /// recorded on the context.
    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()>;
}

/// Everything a group needs while running
pub struct GroupContext<'a> {
    group: &'static str,
    access: Access,
    client: &'a ApiClient,
    state: &'a mut SharedState,
    steps: Vec<StepRecord>,
}

impl<'a> GroupContext<'a> {
    pub fn new(
        group: &'static str,
        access: Access,
        client: &'a ApiClient,
        state: &'a mut SharedState,
    ) -> Self {
        Self {
            group,
            access,
            client,
            state,
            steps: Vec::new(),
        }
    }

    /// Owned copy of an identifier, for building payloads
    pub fn id(&self, key: EntityKey) -> Option<String> {
        self.state.get(key).map(str::to_string)
    }

    /// Store an identifier this group created
    pub fn record_id(&mut self, key: EntityKey, id: &str) {
        debug_assert!(
            self.access.writes.contains(&key),
            "group {} writes undeclared field {}",
            self.group,
            key
        );
        self.state.record(key, id);
    }

    /// Identifier that a step cannot do without; records a skip when absent
    pub fn require(&mut self, step: &str, key: EntityKey) -> E2eResult<String> {
        match self.id(key) {
            Some(id) => Ok(id),
            None => {
                let reason = format!("{} not available", key);
                self.skip(step, &reason);
                Err(E2eError::MissingPrecondition(reason))
            }
        }
    }

    /// Send a call; transport, status and JSON failures are recorded
    pub async fn call(&mut self, step: &str, call: ApiCall) -> E2eResult<Envelope> {
        let result = self.client.send(&call).await;
        self.check(step, result)
    }

    /// Send a call and run the shape check on its envelope
    pub async fn expect<T>(
        &mut self,
        step: &str,
        call: ApiCall,
        check: impl FnOnce(&Envelope) -> E2eResult<T> + Send,
    ) -> E2eResult<T> {
        let envelope = self.call(step, call).await?;
        let result = check(&envelope);
        self.check(step, result)
    }

    /// Record a failure for `step` if `result` is an error
    pub fn check<T>(&mut self, step: &str, result: E2eResult<T>) -> E2eResult<T> {
        if let Err(e) = &result {
            self.fail(step, &e.to_string());
        }
        result
    }

    pub fn pass(&mut self, step: &str, detail: impl Into<String>) {
        self.push(step, Outcome::Passed, detail.into());
    }

    pub fn fail(&mut self, step: &str, detail: impl Into<String>) {
        self.push(step, Outcome::Failed, detail.into());
    }

    pub fn skip(&mut self, step: &str, reason: impl Into<String>) {
        self.push(step, Outcome::Skipped, format!("missing precondition: {}", reason.into()));
    }

    fn push(&mut self, step: &str, outcome: Outcome, detail: String) {
        match outcome {
            Outcome::Passed => info!(group = self.group, "PASS {} - {}", step, detail),
            Outcome::Skipped => warn!(group = self.group, "SKIP {} - {}", step, detail),
            Outcome::Failed => error!(group = self.group, "FAIL {} - {}", step, detail),
        }
        self.steps.push(StepRecord {
            group: self.group.to_string(),
            step: step.to_string(),
            outcome,
            detail,
            at: Utc::now(),
        });
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }
}
