//! Billing and invoices

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::ApiCall;
use crate::error::E2eResult;
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

pub struct InvoicesGroup;

/// Amount billed by the scenario's invoice
pub const INVOICE_AMOUNT: f64 = 2500.00;

#[derive(Debug, Serialize)]
struct LineItem {
    description: &'static str,
    quantity: u32,
    rate: u32,
    amount: u32,
}

const LINE_ITEMS: [LineItem; 4] = [
    LineItem { description: "Studio time (4 hours)", quantity: 4, rate: 150, amount: 600 },
    LineItem { description: "Engineer services", quantity: 1, rate: 800, amount: 800 },
    LineItem { description: "Equipment rental", quantity: 1, rate: 300, amount: 300 },
    LineItem { description: "Mixing services", quantity: 1, rate: 800, amount: 800 },
];

fn new_invoice(project_id: Option<String>) -> Value {
    json!({
        "projectId": project_id,
        "clientName": "Harmony Records",
        "clientEmail": "billing@harmonyrecords.com",
        "amount": INVOICE_AMOUNT,
        "description": "Recording session fees for Epic Album project",
        "dueDate": "2024-04-15",
        "items": LINE_ITEMS
    })
}

#[async_trait]
impl TestGroup for InvoicesGroup {
    fn name(&self) -> &'static str {
        "billing_invoices"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn access(&self) -> Access {
        Access {
            requires: &[],
            reads: &[EntityKey::Project],
            writes: &[EntityKey::Invoice],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let step = "Create Invoice";
        let body = new_invoice(ctx.id(EntityKey::Project));
        let id = ctx
            .expect(step, ApiCall::post("/invoices", body), |env| env.data_id())
            .await?;
        ctx.record_id(EntityKey::Invoice, &id);
        ctx.pass(step, format!("Invoice created for ${:.2}", INVOICE_AMOUNT));

        let step = "List Invoices";
        let count = ctx
            .expect(step, ApiCall::get("/invoices"), |env| env.list().map(<[_]>::len))
            .await?;
        ctx.pass(step, format!("Found {} invoices", count));

        Ok(())
    }
}
