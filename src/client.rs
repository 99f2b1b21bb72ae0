use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::config::PaymentRoute;
use crate::domain::{
    Account, Error, HttpRequest, HttpResponse, Money, Operation, Order, OrderStatus,
    PaymentResult, RequestError, Surface, Transport,
};

/// One async function per backend operation.
///
/// Nothing here retries, and creates carry no idempotency key: calling
/// [`ApiClient::create_order`] twice creates two orders.
#[derive(Debug, Clone)]
pub struct ApiClient<T: Transport> {
    transport: T,
    payment_route: PaymentRoute,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, payment_route: PaymentRoute) -> Self {
        Self {
            transport,
            payment_route,
        }
    }

    #[instrument(skip(self, description))]
    pub async fn create_order(
        &self,
        user_id: &str,
        amount: Money,
        description: &str,
    ) -> Result<Order, Error> {
        let request = HttpRequest::post(
            Surface::Orders,
            "/orders/create",
            json!({ "user_id": user_id, "amount": amount, "description": description }),
        );

        let order = self
            .call::<OrderWire>(request)
            .await
            .and_then(Order::try_from)
            .map_err(|e| e.during(Operation::CreateOrder))?;

        info!(order_id = %order.id, "order created");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn get_orders(&self, user_id: &str) -> Result<Vec<Order>, Error> {
        let request =
            HttpRequest::get(Surface::Orders, "/orders/list").with_query("user_id", user_id);

        self.list(request)
            .await
            .map_err(|e| e.during(Operation::ListOrders))
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order, Error> {
        let request = HttpRequest::get(Surface::Orders, "/orders/get").with_query("id", order_id);

        self.call::<OrderWire>(request)
            .await
            .and_then(Order::try_from)
            .map_err(|e| e.during(Operation::GetOrder))
    }

    #[instrument(skip(self))]
    pub async fn create_account(&self, user_id: &str) -> Result<Account, Error> {
        let request = HttpRequest::post(
            Surface::Payments,
            "/payments/create-account",
            json!({ "user_id": user_id }),
        );

        self.call::<AccountWire>(request)
            .await
            .and_then(Account::try_from)
            .map_err(|e| e.during(Operation::CreateAccount))
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, user_id: &str) -> Result<Account, Error> {
        self.fetch_account(user_id)
            .await
            .map_err(|e| e.during(Operation::GetAccount))
    }

    /// Deposits and returns the updated account. Backends that answer with an
    /// empty body get the account re-read; a failed re-read is reported as
    /// such, since the money has already moved.
    #[instrument(skip(self))]
    pub async fn deposit(&self, user_id: &str, amount: Money) -> Result<Account, Error> {
        let request = HttpRequest::post(
            Surface::Payments,
            "/payments/deposit",
            json!({ "user_id": user_id, "amount": amount }),
        );

        let response = self
            .exchange(request)
            .await
            .map_err(|e| e.during(Operation::Deposit))?;

        if response.body.trim().is_empty() {
            return self
                .fetch_account(user_id)
                .await
                .map_err(|e| e.during(Operation::RefreshAfterDeposit));
        }

        decode::<AccountWire>(&response)
            .and_then(Account::try_from)
            .map_err(|e| e.during(Operation::Deposit))
    }

    #[instrument(skip(self))]
    pub async fn process_payment(
        &self,
        order_id: &str,
        user_id: &str,
        amount: Money,
    ) -> Result<PaymentResult, Error> {
        let request = HttpRequest::post(
            Surface::Payments,
            self.payment_route.path(),
            json!({ "order_id": order_id, "user_id": user_id, "amount": amount }),
        );

        let result = self
            .call::<PaymentWire>(request)
            .await
            .map(PaymentResult::from)
            .map_err(|e| e.during(Operation::ProcessPayment))?;

        info!(success = result.success, "payment processed");
        Ok(result)
    }

    async fn fetch_account(&self, user_id: &str) -> Result<Account, RequestError> {
        let request = HttpRequest::get(Surface::Payments, "/payments/get-account")
            .with_query("user_id", user_id);

        self.call::<AccountWire>(request)
            .await
            .and_then(Account::try_from)
    }

    /// Sends the request and insists on a 2xx status.
    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "backend rejected request");
            return Err(RequestError::Http {
                status: response.status,
                message: error_message(&response),
            });
        }
        Ok(response)
    }

    async fn call<W: DeserializeOwned>(&self, request: HttpRequest) -> Result<W, RequestError> {
        let response = self.exchange(request).await?;
        decode(&response)
    }

    async fn list(&self, request: HttpRequest) -> Result<Vec<Order>, RequestError> {
        let response = self.exchange(request).await?;
        match parse_json(&response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| from_value::<OrderWire>(item).and_then(Order::try_from))
                .collect(),
            // Anything that isn't a list (Go's `null` included) means no orders.
            _ => Ok(Vec::new()),
        }
    }
}

fn parse_json(response: &HttpResponse) -> Result<Value, RequestError> {
    let body = response.body.trim();
    if body.is_empty() {
        return Err(RequestError::EmptyBody);
    }
    serde_json::from_str(body).map_err(|e| RequestError::InvalidJson(e.to_string()))
}

fn decode<W: DeserializeOwned>(response: &HttpResponse) -> Result<W, RequestError> {
    from_value(parse_json(response)?)
}

fn from_value<W: DeserializeOwned>(value: Value) -> Result<W, RequestError> {
    serde_json::from_value(value).map_err(|e| RequestError::Schema(e.to_string()))
}

/// Best human-readable reason from a failed response: the JSON `error` field,
/// else the first line of a plain-text body, else the bare status.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(&response.body) {
        if let Some(Value::String(error)) = fields.get("error") {
            return error.clone();
        }
    }

    match response.body.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) if !line.starts_with('{') && !line.starts_with('<') => line.to_string(),
        _ => format!("HTTP error! status: {}", response.status),
    }
}

/// Internal shapes used only for JSON deserialization.
#[derive(Debug, Deserialize)]
struct OrderWire {
    id: String,
    user_id: String,
    amount: Money,
    #[serde(default)]
    description: String,
    status: String,
}

impl TryFrom<OrderWire> for Order {
    type Error = RequestError;

    fn try_from(wire: OrderWire) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_wire(&wire.status).ok_or_else(|| {
            RequestError::Schema(format!("unknown order status '{}'", wire.status))
        })?;

        if wire.amount <= Money::zero() {
            return Err(RequestError::Schema(format!(
                "order {} has non-positive amount {}",
                wire.id, wire.amount
            )));
        }

        Ok(Order {
            id: wire.id,
            user_id: wire.user_id,
            amount: wire.amount,
            description: wire.description,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccountWire {
    #[serde(default)]
    id: Option<String>,
    user_id: String,
    balance: Money,
}

impl TryFrom<AccountWire> for Account {
    type Error = RequestError;

    fn try_from(wire: AccountWire) -> Result<Self, Self::Error> {
        if wire.balance.is_negative() {
            return Err(RequestError::Schema(format!(
                "account {} has negative balance {}",
                wire.user_id, wire.balance
            )));
        }

        Ok(Account {
            id: wire.id.filter(|id| !id.is_empty()),
            user_id: wire.user_id,
            balance: wire.balance,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PaymentWire {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    amount: Option<Money>,
}

impl From<PaymentWire> for PaymentResult {
    fn from(wire: PaymentWire) -> Self {
        PaymentResult {
            success: wire.success,
            message: wire.message,
            order_id: wire.order_id.filter(|id| !id.is_empty()),
            amount: wire.amount,
        }
    }
}
