//! Project chat

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

pub struct ChatGroup;

const OPENING: &str =
    "Hey team! The vocal recordings are sounding amazing. Ready to move on to the guitar overdubs?";
const REPLY: &str = "Absolutely! I'm ready when you are. The guitar setup is already prepared.";

fn message(project_id: &str, text: &str, sender: &str) -> Value {
    json!({
        "projectId": project_id,
        "text": text,
        "sender": sender,
        "type": "text"
    })
}

/// First `max` characters, on a char boundary
fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl TestGroup for ChatGroup {
    fn name(&self) -> &'static str {
        "project_chat"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn access(&self) -> Access {
        Access {
            requires: &[EntityKey::Project],
            reads: &[],
            writes: &[EntityKey::Message],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let project_id = ctx.require("Create Message", EntityKey::Project)?;

        let step = "Create Message";
        let call = ApiCall::post("/messages", message(&project_id, OPENING, "Producer Mike"));
        let id = ctx.expect(step, call, |env| env.data_id()).await?;
        ctx.record_id(EntityKey::Message, &id);
        ctx.pass(step, format!("Message created: {}...", preview(OPENING, 50)));

        let step = "Create Reply Message";
        let call = ApiCall::post("/messages", message(&project_id, REPLY, "Engineer Alex"));
        ctx.expect(step, call, |env| env.require_success()).await?;
        ctx.pass(step, "Reply message sent successfully");

        let step = "List Messages";
        let call = ApiCall::get("/messages").query("projectId", Some(&project_id));
        let filter = project_id.clone();
        let count = ctx
            .expect(step, call, move |env| {
                env.list_filtered("projectId", &filter).map(<[_]>::len)
            })
            .await?;
        ctx.pass(step, format!("Found {} messages in project chat", count));

        Ok(())
    }
}
