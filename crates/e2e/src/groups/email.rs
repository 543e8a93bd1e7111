//! Templated email notifications

use async_trait::async_trait;
use serde_json::json;

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

use super::invoices::INVOICE_AMOUNT;

pub struct EmailGroup;

#[async_trait]
impl TestGroup for EmailGroup {
    fn name(&self) -> &'static str {
        "email_notifications"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn access(&self) -> Access {
        Access {
            requires: &[],
            reads: &[EntityKey::Invoice],
            writes: &[],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let step = "Send Email Notification";
        let to = "client@harmonyrecords.com";
        let body = json!({
            "to": to,
            "subject": "Recording Session Confirmation",
            "type": "session_confirmation",
            "data": {
                "sessionTitle": "Vocal Recording Session",
                "date": "2024-03-15",
                "time": "14:00-18:00",
                "studio": "Studio A"
            }
        });
        ctx.expect(step, ApiCall::post("/send-email", body), |env| env.require_success())
            .await?;
        ctx.pass(step, format!("Email sent to {}", to));

        let step = "Send Invoice Email";
        let body = json!({
            "to": "billing@harmonyrecords.com",
            "subject": "Invoice #INV-001 - Recording Services",
            "type": "invoice",
            "data": {
                "invoiceId": ctx.id(EntityKey::Invoice),
                "amount": INVOICE_AMOUNT,
                "dueDate": "2024-04-15"
            }
        });
        ctx.expect(step, ApiCall::post("/send-email", body), |env| env.require_success())
            .await?;
        ctx.pass(step, "Invoice email sent successfully");

        Ok(())
    }
}
