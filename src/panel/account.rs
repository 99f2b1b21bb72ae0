use tracing::instrument;

use crate::client::ApiClient;
use crate::domain::{Account, Error, Money, Transport};
use crate::panel::{RequestSlot, required};

/// Create, look up and top up one user's account.
#[derive(Debug, Default)]
pub struct AccountPanel {
    pub user_id: String,
    pub deposit_amount: String,
    slot: RequestSlot<Account>,
}

impl AccountPanel {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn slot(&self) -> &RequestSlot<Account> {
        &self.slot
    }

    pub fn account(&self) -> Option<&Account> {
        self.slot.value()
    }

    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn create_account<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<String>, Error> {
        required(&self.user_id, "User ID").map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api.create_account(&self.user_id).await;
        Ok(self
            .slot
            .settle(token, outcome)?
            .map(|_| "Account created successfully!".to_string()))
    }

    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn get_account<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<String>, Error> {
        required(&self.user_id, "User ID").map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api.get_account(&self.user_id).await;
        Ok(self
            .slot
            .settle(token, outcome)?
            .map(|account| format!("Balance for {}: {}", account.user_id, account.balance)))
    }

    /// Validation happens before anything touches the network.
    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn deposit<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
    ) -> Result<Option<String>, Error> {
        let amount = required(&self.user_id, "User ID")
            .and_then(|_| Money::positive_from_input(&self.deposit_amount))
            .map_err(|e| self.slot.reject(e))?;

        let token = self.slot.begin();
        let outcome = api.deposit(&self.user_id, amount).await;
        let message = self
            .slot
            .settle(token, outcome)?
            .map(|account| format!("Deposit successful! Balance: {}", account.balance));

        if message.is_some() {
            self.deposit_amount.clear();
        }
        Ok(message)
    }
}
