//! Timestamped feedback on audio files

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

pub struct CommentsGroup;

/// `timestamp` is the offset into the audio file, in seconds
fn comment(
    project_id: &str,
    file_id: Option<&str>,
    timestamp: f64,
    text: &str,
    author: &str,
    kind: &str,
) -> Value {
    json!({
        "projectId": project_id,
        "fileId": file_id,
        "timestamp": timestamp,
        "text": text,
        "author": author,
        "type": kind
    })
}

#[async_trait]
impl TestGroup for CommentsGroup {
    fn name(&self) -> &'static str {
        "comments_system"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn access(&self) -> Access {
        Access {
            requires: &[EntityKey::Project],
            reads: &[EntityKey::AudioFile],
            writes: &[EntityKey::Comment],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let project_id = ctx.require("Create Comment", EntityKey::Project)?;
        let file_id = ctx.id(EntityKey::AudioFile);

        let step = "Create Comment";
        let body = comment(
            &project_id,
            file_id.as_deref(),
            45.5,
            "The vocal harmony at this point needs to be adjusted. Consider lowering the pitch slightly.",
            "Producer Mike",
            "feedback",
        );
        let id = ctx
            .expect(step, ApiCall::post("/comments", body), |env| env.data_id())
            .await?;
        ctx.record_id(EntityKey::Comment, &id);
        ctx.pass(step, "Comment created at timestamp 45.5s");

        let step = "Create Second Comment";
        let body = comment(
            &project_id,
            file_id.as_deref(),
            120.8,
            "Great take! This section sounds perfect.",
            "Artist Sarah",
            "approval",
        );
        ctx.expect(step, ApiCall::post("/comments", body), |env| env.require_success())
            .await?;
        ctx.pass(step, "Second comment created at 120.8s");

        let step = "List Comments by Project";
        let call = ApiCall::get("/comments").query("projectId", Some(&project_id));
        let filter = project_id.clone();
        let count = ctx
            .expect(step, call, move |env| {
                env.list_filtered("projectId", &filter).map(<[_]>::len)
            })
            .await?;
        ctx.pass(step, format!("Found {} comments for project", count));

        let step = "List Comments by File";
        match file_id {
            Some(file_id) => {
                let call = ApiCall::get("/comments").query("fileId", Some(&file_id));
                let count = ctx
                    .expect(step, call, move |env| {
                        env.list_filtered("fileId", &file_id).map(<[_]>::len)
                    })
                    .await?;
                ctx.pass(step, format!("Found {} comments for audio file", count));
            }
            None => ctx.skip(step, "audio_file_id not available"),
        }

        Ok(())
    }
}
