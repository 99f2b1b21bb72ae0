use tracing::instrument;

use crate::client::ApiClient;
use crate::domain::{Error, Money, Order, PaymentResult, Transport};
use crate::panel::{RequestSlot, required};

/// Settles orders and keeps every result it has seen, newest first.
#[derive(Debug, Default)]
pub struct PaymentPanel {
    pub order_id: String,
    pub user_id: String,
    pub amount: String,
    history: Vec<PaymentResult>,
    slot: RequestSlot<PaymentResult>,
}

impl PaymentPanel {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn history(&self) -> &[PaymentResult] {
        &self.history
    }

    /// Fills blank order fields from an order created elsewhere in the app.
    /// The amount is only taken when the payment is for that same order.
    pub fn prefill(&mut self, order: &Order) {
        if self.order_id.trim().is_empty() {
            self.order_id = order.id.clone();
        }
        if self.amount.trim().is_empty() && self.order_id.trim() == order.id {
            self.amount = order.amount.to_string();
        }
    }

    #[instrument(skip_all, fields(order_id = %self.order_id, user_id = %self.user_id))]
    pub async fn process_payment<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<String>, Error> {
        let amount = self.validate().map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api
            .process_payment(self.order_id.trim(), self.user_id.trim(), amount)
            .await;

        let settled = self.slot.settle(token, outcome)?.cloned();
        let Some(result) = settled else {
            return Ok(None);
        };

        let message = format!(
            "Payment processed: {}",
            if result.success { "Success" } else { "Failed" }
        );
        self.history.insert(0, result);
        self.order_id.clear();
        self.amount.clear();
        Ok(Some(message))
    }

    fn validate(&self) -> Result<Money, Error> {
        required(&self.order_id, "Order ID")?;
        required(&self.user_id, "User ID")?;
        required(&self.amount, "Amount")?;
        Money::positive_from_input(&self.amount)
    }
}
