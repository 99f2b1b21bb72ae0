use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::domain::{Action, ActionStream, Error, Notifier, Order, Renderer, Tab, Transport};
use crate::panel::{AccountPanel, OrderPanel, PaymentPanel};

/// Root composition: tab navigation, the current user, and the orders the
/// user has seen, wired to one panel per domain.
#[derive(Debug)]
pub struct App<I, R, N, T>
where
    I: ActionStream,
    R: Renderer,
    N: Notifier,
    T: Transport,
{
    ingestion: I,
    renderer: R,
    notifier: N,
    api: ApiClient<T>,

    tab: Tab,
    user_id: String,
    latest_order: Option<Order>,
    orders: Vec<Order>,

    accounts: AccountPanel,
    order_form: OrderPanel,
    payments: PaymentPanel,
}

impl<I, R, N, T> App<I, R, N, T>
where
    I: ActionStream,
    R: Renderer,
    N: Notifier,
    T: Transport,
{
    pub fn new(ingestion: I, renderer: R, notifier: N, api: ApiClient<T>, user_id: String) -> Self {
        Self {
            ingestion,
            renderer,
            notifier,
            api,
            tab: Tab::default(),
            accounts: AccountPanel::new(user_id.clone()),
            order_form: OrderPanel::new(user_id.clone()),
            payments: PaymentPanel::new(user_id.clone()),
            user_id,
            latest_order: None,
            orders: Vec::new(),
        }
    }

    /// Loads the current user's orders, then runs every scripted action in
    /// order. Failures are shown to the user and processing moves on; only a
    /// broken output aborts.
    pub async fn process(&mut self) -> Result<(), Error> {
        self.load_orders().await;
        let mut actions = self.ingestion.stream();

        while let Some(action) = actions.next().await {
            match action {
                Ok(action) => {
                    debug!(?action, tab = %self.tab, "dispatching");
                    match self.apply(action).await {
                        Ok(Some(message)) => self.notifier.success(&message),
                        Ok(None) => {}
                        Err(e) => self.notifier.error(&e),
                    }
                    self.render()?;
                }
                Err(e) => self.notifier.error(&e),
            }
        }

        Ok(())
    }

    async fn apply(&mut self, action: Action) -> Result<Option<String>, Error> {
        if let Some(tab) = action.tab() {
            self.tab = tab;
        }

        match action {
            Action::SelectTab(tab) => {
                self.tab = tab;
                Ok(None)
            }
            Action::SetUser(user_id) => self.switch_user(user_id).await,
            Action::CreateOrder {
                amount,
                description,
            } => {
                self.order_form.amount = amount;
                self.order_form.description = description;
                let Some(order) = self.order_form.create_order(&self.api).await? else {
                    return Ok(None);
                };

                let message = format!("Order created with ID: {}", order.id);
                self.orders.push(order.clone());
                self.latest_order = Some(order);
                Ok(Some(message))
            }
            Action::ListOrders => {
                let Some(orders) = self.order_form.list_orders(&self.api).await? else {
                    return Ok(None);
                };
                self.orders = orders;
                Ok(Some(format!("Loaded {} orders", self.orders.len())))
            }
            Action::GetOrder { order_id } => {
                let Some(order) = self.order_form.get_order(&self.api, &order_id).await? else {
                    return Ok(None);
                };

                let message = format!("Order {} is {}", order.id, order.status);
                match self.orders.iter_mut().find(|o| o.id == order.id) {
                    Some(known) => *known = order,
                    None => self.orders.push(order),
                }
                Ok(Some(message))
            }
            Action::CreateAccount => self.accounts.create_account(&self.api).await,
            Action::GetAccount => self.accounts.get_account(&self.api).await,
            Action::Deposit { amount } => {
                self.accounts.deposit_amount = amount;
                self.accounts.deposit(&self.api).await
            }
            Action::Pay { order_id, amount } => {
                self.payments.order_id = order_id.unwrap_or_default();
                self.payments.amount = amount.unwrap_or_default();
                if let Some(order) = &self.latest_order {
                    self.payments.prefill(order);
                }
                self.payments.process_payment(&self.api).await
            }
        }
    }

    /// Changing the user re-reads their orders.
    async fn switch_user(&mut self, user_id: String) -> Result<Option<String>, Error> {
        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(Error::validation("User ID is required"));
        }

        info!(%user_id, "switching user");
        self.accounts = AccountPanel::new(user_id.clone());
        self.order_form = OrderPanel::new(user_id.clone());
        self.payments.user_id = user_id.clone();
        self.user_id = user_id;
        self.latest_order = None;
        self.orders.clear();
        self.load_orders().await;

        Ok(Some(format!("Signed in as {}", self.user_id)))
    }

    /// Replaces the order list with the current user's orders. A failed read
    /// is only logged; the list keeps what it had.
    async fn load_orders(&mut self) {
        match self.order_form.list_orders(&self.api).await {
            Ok(Some(orders)) => self.orders = orders,
            Ok(None) => {}
            Err(e) => warn!(user_id = %self.user_id, error = %e, "could not load orders"),
        }
    }

    fn render(&mut self) -> Result<(), Error> {
        match self.tab {
            Tab::Orders => self.renderer.orders(&self.orders),
            Tab::Accounts => self.renderer.account(self.accounts.account()),
            Tab::Payments => self.renderer.payments(self.payments.history()),
        }
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.renderer.flush()
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[cfg(test)]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}
