//! Session scheduling

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

pub struct SessionsGroup;

fn new_session(project_id: Option<String>) -> Value {
    json!({
        "title": "Vocal Recording Session",
        "projectId": project_id,
        "date": "2024-03-15",
        "startTime": "14:00",
        "endTime": "18:00",
        "studio": "Studio A",
        "engineer": "Alex Johnson",
        "artist": "Sarah Williams",
        "notes": "Recording lead vocals for track 3 and 7",
        "status": "scheduled"
    })
}

#[async_trait]
impl TestGroup for SessionsGroup {
    fn name(&self) -> &'static str {
        "sessions_management"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn access(&self) -> Access {
        Access {
            requires: &[],
            reads: &[EntityKey::Project],
            writes: &[EntityKey::Session],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let step = "Create Session";
        let body = new_session(ctx.id(EntityKey::Project));
        let id = ctx
            .expect(step, ApiCall::post("/sessions", body), |env| env.data_id())
            .await?;
        ctx.record_id(EntityKey::Session, &id);
        ctx.pass(step, format!("Session created with ID: {}", id));

        let step = "List Sessions";
        let count = ctx
            .expect(step, ApiCall::get("/sessions"), |env| env.list().map(<[_]>::len))
            .await?;
        ctx.pass(step, format!("Found {} sessions", count));

        let step = "Update Session";
        let update = json!({
            "status": "completed",
            "notes": "Session completed successfully. Great vocal takes recorded."
        });
        ctx.expect(
            step,
            ApiCall::put(format!("/sessions/{}", id), update),
            |env| env.require_success(),
        )
        .await?;
        ctx.pass(step, "Session updated successfully");

        Ok(())
    }
}
