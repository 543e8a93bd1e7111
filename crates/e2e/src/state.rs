//! Identifiers threaded between test groups

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of entity whose identifier is carried across groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKey {
    Project,
    Session,
    AudioFile,
    Comment,
    Message,
    Invoice,
}

impl EntityKey {
    pub const ALL: [EntityKey; 6] = [
        EntityKey::Project,
        EntityKey::Session,
        EntityKey::AudioFile,
        EntityKey::Comment,
        EntityKey::Message,
        EntityKey::Invoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKey::Project => "project_id",
            EntityKey::Session => "session_id",
            EntityKey::AudioFile => "audio_file_id",
            EntityKey::Comment => "comment_id",
            EntityKey::Message => "message_id",
            EntityKey::Invoice => "invoice_id",
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-created identifier of each entity kind.
///
/// Every field starts out absent and is only filled once the step that
/// creates the entity has passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    pub project_id: Option<String>,
    pub session_id: Option<String>,
    pub audio_file_id: Option<String>,
    pub comment_id: Option<String>,
    pub message_id: Option<String>,
    pub invoice_id: Option<String>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: EntityKey) -> &Option<String> {
        match key {
            EntityKey::Project => &self.project_id,
            EntityKey::Session => &self.session_id,
            EntityKey::AudioFile => &self.audio_file_id,
            EntityKey::Comment => &self.comment_id,
            EntityKey::Message => &self.message_id,
            EntityKey::Invoice => &self.invoice_id,
        }
    }

    fn slot_mut(&mut self, key: EntityKey) -> &mut Option<String> {
        match key {
            EntityKey::Project => &mut self.project_id,
            EntityKey::Session => &mut self.session_id,
            EntityKey::AudioFile => &mut self.audio_file_id,
            EntityKey::Comment => &mut self.comment_id,
            EntityKey::Message => &mut self.message_id,
            EntityKey::Invoice => &mut self.invoice_id,
        }
    }

    /// Identifier for `key`, if a group has produced one
    pub fn get(&self, key: EntityKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.slot(key).is_some()
    }

    /// Record a freshly created identifier, replacing any earlier one
    pub fn record(&mut self, key: EntityKey, id: impl Into<String>) {
        *self.slot_mut(key) = Some(id.into());
    }

    /// Identifiers collected so far, keyed by field name
    pub fn created(&self) -> BTreeMap<String, String> {
        EntityKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|id| (key.to_string(), id.to_string())))
            .collect()
    }
}
