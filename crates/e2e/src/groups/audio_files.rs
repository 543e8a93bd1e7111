//! Audio file upload and management

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::ApiCall;
use crate::error::{E2eError, E2eResult};
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::response::Envelope;
use crate::state::EntityKey;

const UPLOAD_FILE_NAME: &str = "vocal_track_lead.wav";

/// Chunked upload, direct creation and filtered listing of audio files
pub struct AudioFilesGroup {
    chunks: u32,
}

impl AudioFilesGroup {
    pub fn new(chunks: u32) -> Self {
        Self { chunks: chunks.max(1) }
    }
}

fn chunk_payload(index: u32, total: u32, project_id: &str) -> Value {
    json!({
        "fileName": UPLOAD_FILE_NAME,
        "chunk": format!("fake_chunk_data_{}", index),
        "totalChunks": total,
        "chunkIndex": index,
        "projectId": project_id
    })
}

/// Progress reported for a non-final chunk; must exceed `previous`
fn chunk_progress(env: &Envelope, previous: Option<f64>) -> E2eResult<f64> {
    env.require_success()?;
    if env.field("completed").and_then(Value::as_bool) == Some(true) {
        return Err(E2eError::shape("upload still in progress", env.body()));
    }
    let progress = env
        .field("progress")
        .and_then(Value::as_f64)
        .ok_or_else(|| E2eError::shape("numeric progress", env.body()))?;
    if let Some(previous) = previous {
        if progress <= previous {
            return Err(E2eError::shape(
                format!("progress above {:.1}", previous),
                env.body(),
            ));
        }
    }
    Ok(progress)
}

/// Identifier of the file assembled by the final chunk
fn upload_completed(env: &Envelope) -> E2eResult<String> {
    env.require_success()?;
    if env.field("completed").and_then(Value::as_bool) != Some(true) {
        return Err(E2eError::shape("completed: true", env.body()));
    }
    env.data_id()
}

#[async_trait]
impl TestGroup for AudioFilesGroup {
    fn name(&self) -> &'static str {
        "audio_files_upload"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn access(&self) -> Access {
        Access {
            requires: &[EntityKey::Project],
            reads: &[],
            writes: &[EntityKey::AudioFile],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let project_id = ctx.require("Chunked File Upload", EntityKey::Project)?;

        let step = "Chunked File Upload";
        let mut progress = None;
        for index in 0..self.chunks {
            let call = ApiCall::post("/upload", chunk_payload(index, self.chunks, &project_id));

            if index + 1 == self.chunks {
                let id = ctx.expect(step, call, upload_completed).await?;
                ctx.record_id(EntityKey::AudioFile, &id);
                ctx.pass(step, format!("File uploaded successfully: {}", id));
            } else {
                let previous = progress;
                let current = ctx
                    .expect(step, call, move |env| chunk_progress(env, previous))
                    .await?;
                debug!(
                    "chunk {}/{} uploaded ({:.1}%)",
                    index + 1,
                    self.chunks,
                    current
                );
                progress = Some(current);
            }
        }

        let step = "Create Audio File";
        let body = json!({
            "name": "background_vocals.wav",
            "projectId": project_id,
            "size": 25600000,
            "uploadedBy": "Producer Mike",
            "version": "v2",
            "type": "overdub"
        });
        let id = ctx
            .expect(step, ApiCall::post("/audio-files", body), |env| env.data_id())
            .await?;
        ctx.pass(step, format!("Audio file created: {}", id));

        let step = "List Audio Files";
        let call = ApiCall::get("/audio-files").query("projectId", Some(&project_id));
        let filter = project_id.clone();
        let count = ctx
            .expect(step, call, move |env| {
                env.list_filtered("projectId", &filter).map(<[_]>::len)
            })
            .await?;
        ctx.pass(step, format!("Found {} audio files for project", count));

        Ok(())
    }
}
