//! Backend reachability check

use async_trait::async_trait;

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;

/// Lists projects to prove the backend and its database answer
pub struct ConnectivityGroup;

#[async_trait]
impl TestGroup for ConnectivityGroup {
    fn name(&self) -> &'static str {
        "connectivity"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn access(&self) -> Access {
        Access::default()
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        const STEP: &str = "Database Connection";

        let count = ctx
            .expect(STEP, ApiCall::get("/projects"), |env| env.list().map(<[_]>::len))
            .await?;
        ctx.pass(STEP, format!("Database connected and responding ({} projects)", count));
        Ok(())
    }
}
