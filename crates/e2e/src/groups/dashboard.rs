//! Dashboard aggregates

use async_trait::async_trait;
use serde_json::Value;

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;

/// Aggregates the dashboard must report; their values are not checked
pub const REQUIRED_STATS: [&str; 4] =
    ["activeProjects", "weekSessions", "monthRevenue", "filesProcessed"];

pub struct DashboardGroup;

#[async_trait]
impl TestGroup for DashboardGroup {
    fn name(&self) -> &'static str {
        "dashboard_stats"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn access(&self) -> Access {
        Access::default()
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let step = "Dashboard Statistics";
        let summary = ctx
            .expect(step, ApiCall::get("/dashboard-stats"), |env| {
                let stats = env.object_with(&REQUIRED_STATS)?;
                Ok(format!(
                    "Stats: {} projects, ${} revenue",
                    stats.get("activeProjects").unwrap_or(&Value::Null),
                    stats.get("monthRevenue").unwrap_or(&Value::Null)
                ))
            })
            .await?;
        ctx.pass(step, summary);
        Ok(())
    }
}
