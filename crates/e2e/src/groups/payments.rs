//! Two-phase payment flows against the fake Stripe and PayPal endpoints
//!
//! Phase one hands its identifier to phase two through [`Handoff`]. When
//! phase one fails, phase two records a skipped step and stops instead of
//! sending a request without an identifier.

use async_trait::async_trait;
use serde_json::json;

use crate::client::ApiCall;
use crate::error::{E2eError, E2eResult};
use crate::group::{Access, GroupContext, TestGroup};
use crate::report::Priority;
use crate::state::EntityKey;

use super::invoices::INVOICE_AMOUNT;

/// Output of a create phase, consumed by the matching confirm phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    Ready(String),
    Unavailable { reason: String },
}

impl Handoff {
    fn from_result(result: E2eResult<String>) -> Self {
        match result {
            Ok(id) => Handoff::Ready(id),
            Err(e) => Handoff::Unavailable { reason: e.to_string() },
        }
    }

    /// The identifier, or a skip recorded against `step`
    pub fn take(self, ctx: &mut GroupContext<'_>, step: &str) -> E2eResult<String> {
        match self {
            Handoff::Ready(id) => Ok(id),
            Handoff::Unavailable { reason } => {
                let reason = format!("previous phase failed ({})", reason);
                ctx.skip(step, &reason);
                Err(E2eError::MissingPrecondition(reason))
            }
        }
    }
}

/// Fake card payment: create a payment intent, then confirm it
pub struct StripeGroup;

impl StripeGroup {
    async fn create_intent(&self, ctx: &mut GroupContext<'_>) -> Handoff {
        let step = "Stripe Create Payment Intent";
        // Stripe amounts are in cents
        let body = json!({
            "amount": (INVOICE_AMOUNT * 100.0) as u64,
            "currency": "usd"
        });
        let result = ctx
            .expect(step, ApiCall::post("/stripe/create-payment-intent", body), |env| {
                env.data_id()
            })
            .await;
        if let Ok(id) = &result {
            ctx.pass(step, format!("Payment intent created: {}", id));
        }
        Handoff::from_result(result)
    }

    async fn confirm(&self, ctx: &mut GroupContext<'_>, intent: Handoff) -> E2eResult<()> {
        let step = "Stripe Confirm Payment";
        let intent_id = intent.take(ctx, step)?;

        let body = json!({ "paymentIntentId": intent_id });
        ctx.expect(step, ApiCall::post("/stripe/confirm-payment", body), |env| {
            env.require_success()
        })
        .await?;
        ctx.pass(step, "Payment confirmed successfully");
        Ok(())
    }
}

#[async_trait]
impl TestGroup for StripeGroup {
    fn name(&self) -> &'static str {
        "stripe_payment"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn access(&self) -> Access {
        Access::default()
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let intent = self.create_intent(ctx).await;
        self.confirm(ctx, intent).await
    }
}

/// Fake PayPal payment: create an order, then capture it
pub struct PaypalGroup;

impl PaypalGroup {
    async fn create_order(&self, ctx: &mut GroupContext<'_>, invoice_id: Option<&str>) -> Handoff {
        let step = "PayPal Create Order";
        let body = json!({
            "amount": INVOICE_AMOUNT,
            "invoiceId": invoice_id
        });
        let result = ctx
            .expect(step, ApiCall::post("/paypal/create-order", body), |env| {
                env.top_level_id("orderId")
            })
            .await;
        if let Ok(id) = &result {
            ctx.pass(step, format!("PayPal order created: {}", id));
        }
        Handoff::from_result(result)
    }

    async fn capture(
        &self,
        ctx: &mut GroupContext<'_>,
        order: Handoff,
        invoice_id: Option<&str>,
    ) -> E2eResult<()> {
        let step = "PayPal Capture Order";
        let order_id = order.take(ctx, step)?;

        let body = json!({
            "orderId": order_id,
            "invoiceId": invoice_id
        });
        ctx.expect(step, ApiCall::post("/paypal/capture-order", body), |env| {
            env.require_success()
        })
        .await?;
        ctx.pass(step, "PayPal payment captured successfully");
        Ok(())
    }
}

#[async_trait]
impl TestGroup for PaypalGroup {
    fn name(&self) -> &'static str {
        "paypal_payment"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn access(&self) -> Access {
        Access {
            requires: &[],
            reads: &[EntityKey::Invoice],
            writes: &[],
        }
    }

    async fn run(&self, ctx: &mut GroupContext<'_>) -> E2eResult<()> {
        let invoice_id = ctx.id(EntityKey::Invoice);
        let order = self.create_order(ctx, invoice_id.as_deref()).await;
        self.capture(ctx, order, invoice_id.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::config::HarnessConfig;
    use crate::report::Outcome;
    use crate::state::SharedState;

    #[test]
    fn test_unavailable_handoff_records_skip() {
        let client = ApiClient::new(&HarnessConfig::default()).unwrap();
        let mut state = SharedState::new();
        let mut ctx = GroupContext::new("stripe_payment", Access::default(), &client, &mut state);

        let handoff = Handoff::from_result(Err(E2eError::Status {
            status: 500,
            body: "down".into(),
        }));
        let err = handoff.take(&mut ctx, "Stripe Confirm Payment").unwrap_err();

        assert!(err.is_skip());
        let steps = ctx.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].outcome, Outcome::Skipped);
        assert!(steps[0].detail.contains("HTTP 500: down"));
    }

    #[test]
    fn test_ready_handoff_yields_id() {
        let client = ApiClient::new(&HarnessConfig::default()).unwrap();
        let mut state = SharedState::new();
        let mut ctx = GroupContext::new("paypal_payment", Access::default(), &client, &mut state);

        let id = Handoff::Ready("order-1".into()).take(&mut ctx, "PayPal Capture Order").unwrap();
        assert_eq!(id, "order-1");
        assert!(ctx.steps().is_empty());
    }
}
