//! Best-effort cleanup of everything the scenario created
//!
//! Intermediate deletions are recorded but never stop the group. The group
//! verdict is the project deletion alone.

use async_trait::async_trait;

use crate::client::ApiCall;
use crate::error::{E2eError, E2eResult};
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

/// Dependents the backend removes together with their project
const CASCADED: [(&str, &str); 3] = [
    ("audio files", "/audio-files"),
    ("comments", "/comments"),
    ("messages", "/messages"),
];

pub struct CleanupGroup;

impl CleanupGroup {
    async fn delete_best_effort(
        &self,
        ctx: &mut GroupContext<'_>,
        step: &str,
        key: EntityKey,
        path: &str,
        detail: &str,
    ) {
        let Some(id) = ctx.id(key) else {
            ctx.skip(step, format!("{} not available", key));
            return;
        };
        let call = ApiCall::delete(format!("{}/{}", path, id));
        if ctx.expect(step, call, |env| env.require_success()).await.is_ok() {
            ctx.pass(step, detail);
        }
    }

    async fn verify_cascade(&self, ctx: &mut GroupContext<'_>, project_id: &str) {
        for (label, path) in CASCADED {
            let step = format!("Verify Cascade ({})", label);
            let call = ApiCall::get(path).query("projectId", Some(project_id));
            let result = ctx
                .expect(&step, call, |env| {
                    let items = env.list()?;
                    if items.is_empty() {
                        Ok(())
                    } else {
                        Err(E2eError::shape(
                            format!("no {} left for deleted project", label),
                            env.body(),
                        ))
                    }
                })
                .await;
            if result.is_ok() {
                ctx.pass(&step, format!("No {} left for deleted project", label));
            }
        }
    }
}

#[async_trait]
impl TestGroup for CleanupGroup {
    fn name(&self) -> &'static str {
        "delete_operations"
    }

    fn priority(&self) -> Priority {
        Priority::Cleanup
    }

    fn access(&self) -> Access {
        Access {
            requires: &[],
            reads: &[EntityKey::AudioFile, EntityKey::Session, EntityKey::Project],
            writes: &[],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        self.delete_best_effort(
            ctx,
            "Delete Audio File",
            EntityKey::AudioFile,
            "/audio-files",
            "Audio file deleted successfully",
        )
        .await;
        self.delete_best_effort(
            ctx,
            "Delete Session",
            EntityKey::Session,
            "/sessions",
            "Session deleted successfully",
        )
        .await;

        let step = "Delete Project (Cascade)";
        let Some(project_id) = ctx.id(EntityKey::Project) else {
            ctx.skip(step, "project_id not available");
            return Ok(());
        };
        ctx.expect(
            step,
            ApiCall::delete(format!("/projects/{}", project_id)),
            |env| env.require_success(),
        )
        .await?;
        ctx.pass(step, "Project and related data deleted successfully");

        self.verify_cascade(ctx, &project_id).await;
        Ok(())
    }
}
