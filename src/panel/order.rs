use tracing::instrument;

use crate::client::ApiClient;
use crate::domain::{Error, Money, Order, Transport};
use crate::panel::{RequestSlot, required};

/// Last thing the order panel received from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderView {
    Created(Order),
    Fetched(Order),
    Listed(Vec<Order>),
}

#[derive(Debug, Default)]
pub struct OrderPanel {
    pub user_id: String,
    pub amount: String,
    pub description: String,
    slot: RequestSlot<OrderView>,
}

impl OrderPanel {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn slot(&self) -> &RequestSlot<OrderView> {
        &self.slot
    }

    /// Submits the form. The amount and description are cleared once the
    /// backend accepts the order.
    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn create_order<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<Order>, Error> {
        let amount = self.validate().map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api
            .create_order(&self.user_id, amount, self.description.trim())
            .await
            .map(OrderView::Created);

        let created = match self.slot.settle(token, outcome)? {
            Some(OrderView::Created(order)) => Some(order.clone()),
            _ => None,
        };
        if created.is_some() {
            self.amount.clear();
            self.description.clear();
        }
        Ok(created)
    }

    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn list_orders<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<Vec<Order>>, Error> {
        required(&self.user_id, "User ID").map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api.get_orders(&self.user_id).await.map(OrderView::Listed);
        match self.slot.settle(token, outcome)? {
            Some(OrderView::Listed(orders)) => Ok(Some(orders.clone())),
            _ => Ok(None),
        }
    }

    #[instrument(skip(self, api))]
    pub async fn get_order<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        order_id: &str,
    ) -> Result<Option<Order>, Error> {
        required(order_id, "Order ID").map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api.get_order(order_id.trim()).await.map(OrderView::Fetched);
        match self.slot.settle(token, outcome)? {
            Some(OrderView::Fetched(order)) => Ok(Some(order.clone())),
            _ => Ok(None),
        }
    }

    fn validate(&self) -> Result<Money, Error> {
        required(&self.user_id, "User ID")?;
        required(&self.description, "Description")?;
        Money::positive_from_input(&self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaymentRoute;
    use crate::domain::OrderStatus;
    use crate::fake_backend::FakeBackend;

    fn setup() -> (FakeBackend, ApiClient<FakeBackend>) {
        let backend = FakeBackend::new();
        let api = ApiClient::new(backend.clone(), PaymentRoute::ProcessPayment);
        (backend, api)
    }

    #[tokio::test]
    async fn create_clears_the_form() {
        let (_backend, api) = setup();
        let mut panel = OrderPanel::new("alice");
        panel.amount = "12.50".to_string();
        panel.description = "  lamp ".to_string();

        let order = panel.create_order(&api).await.unwrap().unwrap();
        assert_eq!(order.description, "lamp");
        assert_eq!(order.amount, Money::positive_from_input("12.5").unwrap());
        assert_eq!(order.status, OrderStatus::Created);
        assert!(panel.amount.is_empty());
        assert!(panel.description.is_empty());
        assert_eq!(panel.slot().value(), Some(&OrderView::Created(order)));
    }

    #[tokio::test]
    async fn incomplete_form_is_rejected_locally() {
        let (backend, api) = setup();
        let mut panel = OrderPanel::new("alice");
        panel.amount = "10".to_string();

        let err = panel.create_order(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Description is required");

        panel.description = "cup".to_string();
        panel.amount = "-1".to_string();
        assert!(panel.create_order(&api).await.unwrap_err().is_validation());

        assert_eq!(backend.calls(), 0);
        // The form keeps what the user typed.
        assert_eq!(panel.amount, "-1");
    }

    #[tokio::test]
    async fn list_then_get() {
        let (_backend, api) = setup();
        let mut panel = OrderPanel::new("alice");
        panel.amount = "4".to_string();
        panel.description = "tea".to_string();
        let created = panel.create_order(&api).await.unwrap().unwrap();

        let listed = panel.list_orders(&api).await.unwrap().unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let fetched = panel.get_order(&api, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }
}
