//! Project CRUD

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::ApiCall;
use crate::error::{E2eError, E2eResult};
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::response::Envelope;
use crate::state::EntityKey;

pub struct ProjectsGroup;

fn new_project() -> Value {
    json!({
        "name": "Epic Album Recording",
        "description": "Recording sessions for the new album with multiple artists",
        "client": "Harmony Records",
        "status": "active",
        "budget": 15000,
        "deadline": "2024-06-30"
    })
}

fn project_update() -> Value {
    json!({
        "name": "Epic Album Recording - Updated",
        "status": "in_progress",
        "budget": 18000
    })
}

/// Listing after one create; it may not have shrunk below `before + 1`
fn grown_by_one(env: &Envelope, before: usize) -> E2eResult<usize> {
    let count = env.list()?.len();
    if count < before + 1 {
        return Err(E2eError::shape(
            format!("at least {} projects", before + 1),
            env.body(),
        ));
    }
    Ok(count)
}

#[async_trait]
impl TestGroup for ProjectsGroup {
    fn name(&self) -> &'static str {
        "projects_crud"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn access(&self) -> Access {
        Access {
            writes: &[EntityKey::Project],
            ..Access::default()
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let step = "Count Projects";
        let before = ctx
            .expect(step, ApiCall::get("/projects"), |env| env.list().map(<[_]>::len))
            .await?;
        ctx.pass(step, format!("{} projects before create", before));

        let step = "Create Project";
        let id = ctx
            .expect(step, ApiCall::post("/projects", new_project()), |env| env.data_id())
            .await?;
        ctx.record_id(EntityKey::Project, &id);
        ctx.pass(step, format!("Project created with ID: {}", id));

        let step = "List Projects";
        let count = ctx
            .expect(step, ApiCall::get("/projects"), move |env| grown_by_one(env, before))
            .await?;
        ctx.pass(step, format!("Found {} projects", count));

        let step = "Get Single Project";
        let expected = id.clone();
        let name = ctx
            .expect(step, ApiCall::get(format!("/projects/{}", id)), move |env| {
                if env.data_id()? != expected {
                    return Err(E2eError::shape(format!("data.id = {}", expected), env.body()));
                }
                Ok(env
                    .data()
                    .and_then(|d| d.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string())
            })
            .await?;
        ctx.pass(step, format!("Retrieved project: {}", name));

        let step = "Update Project";
        ctx.expect(
            step,
            ApiCall::put(format!("/projects/{}", id), project_update()),
            |env| env.require_success(),
        )
        .await?;
        ctx.pass(step, "Project updated successfully");

        Ok(())
    }
}
