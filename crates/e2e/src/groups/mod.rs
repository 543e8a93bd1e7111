//! The StudioMate scenario, one module per resource family

mod audio_files;
mod chat;
mod cleanup;
mod comments;
mod connectivity;
mod dashboard;
mod email;
mod invoices;
mod payments;
mod projects;
mod sessions;

pub use audio_files::AudioFilesGroup;
pub use chat::ChatGroup;
pub use cleanup::CleanupGroup;
pub use comments::CommentsGroup;
pub use connectivity::ConnectivityGroup;
pub use dashboard::DashboardGroup;
pub use email::EmailGroup;
pub use invoices::InvoicesGroup;
pub use payments::{Handoff, PaypalGroup, StripeGroup};
pub use projects::ProjectsGroup;
pub use sessions::SessionsGroup;

use crate::config::HarnessConfig;
use crate::group::TestGroup;

/// The fixed run order
pub fn scenario(config: &HarnessConfig) -> Vec<Box<dyn TestGroup>> {
    vec![
        Box::new(ConnectivityGroup),
        Box::new(ProjectsGroup),
        Box::new(SessionsGroup),
        Box::new(AudioFilesGroup::new(config.upload_chunks)),
        Box::new(CommentsGroup),
        Box::new(ChatGroup),
        Box::new(InvoicesGroup),
        Box::new(StripeGroup),
        Box::new(PaypalGroup),
        Box::new(EmailGroup),
        Box::new(DashboardGroup),
        Box::new(CleanupGroup),
    ]
}
