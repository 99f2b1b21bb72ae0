//! In-memory stand-in for the order and payment services, speaking the same
//! JSON the real gateway does.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::domain::{HttpRequest, HttpResponse, Money, RequestError, Transport};

#[derive(Debug, Default)]
struct State {
    orders: Vec<Value>,
    accounts: HashMap<String, Decimal>,
    next_order: u32,
    calls: Vec<HttpRequest>,
    forced: Option<HttpResponse>,
    forced_paths: HashMap<String, HttpResponse>,
    offline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following request gets this response verbatim.
    pub fn respond_with(&self, status: u16, body: &str) {
        self.state.lock().forced = Some(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    /// Every following request to `path` gets this response verbatim.
    pub fn respond_to(&self, path: &str, status: u16, body: &str) {
        self.state.lock().forced_paths.insert(
            path.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Every following request fails before reaching a server.
    pub fn go_offline(&self) {
        self.state.lock().offline = true;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn last_call(&self) -> Option<HttpRequest> {
        self.state.lock().calls.last().cloned()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock();
        if let Some(forced) = state.forced.as_ref().or(state.forced_paths.get(&request.path)) {
            return forced.clone();
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        match request.path.as_str() {
            "/orders/create" => {
                state.next_order += 1;
                let order = json!({
                    "id": format!("order-{}", state.next_order),
                    "user_id": body["user_id"],
                    "amount": body["amount"],
                    "description": body["description"],
                    "status": "NEW",
                });
                state.orders.push(order.clone());
                ok(order)
            }
            "/orders/list" => {
                let user = request.query_value("user_id").unwrap_or_default();
                let orders: Vec<Value> = state
                    .orders
                    .iter()
                    .filter(|o| o["user_id"] == user)
                    .cloned()
                    .collect();
                // Go encodes an empty nil slice as null.
                if orders.is_empty() {
                    ok(Value::Null)
                } else {
                    ok(Value::Array(orders))
                }
            }
            "/orders/get" => {
                let id = request.query_value("id").unwrap_or_default();
                match state.orders.iter().find(|o| o["id"] == id) {
                    Some(order) => ok(order.clone()),
                    None => text(500, "sql: no rows in result set\n"),
                }
            }
            "/payments/create-account" => {
                let user = body["user_id"].as_str().unwrap_or_default().to_string();
                if state.accounts.contains_key(&user) {
                    return text(500, "account already exists\n");
                }
                state.accounts.insert(user.clone(), Decimal::ZERO);
                ok(account_json(&user, Decimal::ZERO))
            }
            "/payments/get-account" => {
                let user = request.query_value("user_id").unwrap_or_default();
                match state.accounts.get(user) {
                    Some(balance) => ok(account_json(user, *balance)),
                    None => text(500, "account not found\n"),
                }
            }
            "/payments/deposit" => {
                let user = body["user_id"].as_str().unwrap_or_default().to_string();
                let amount = amount_of(&body);
                match state.accounts.get_mut(&user) {
                    Some(balance) => {
                        *balance += amount;
                        HttpResponse {
                            status: 200,
                            body: String::new(),
                        }
                    }
                    None => text(500, "account not found\n"),
                }
            }
            "/payments/process" | "/payments/process-payment" => {
                let user = body["user_id"].as_str().unwrap_or_default().to_string();
                let order_id = body["order_id"].as_str().unwrap_or_default().to_string();
                let amount = amount_of(&body);

                let success = match state.accounts.get_mut(&user) {
                    Some(balance) if *balance >= amount => {
                        *balance -= amount;
                        true
                    }
                    _ => false,
                };
                if let Some(order) = state.orders.iter_mut().find(|o| o["id"] == order_id) {
                    order["status"] = json!(if success { "PAID" } else { "CANCELLED" });
                }

                let message = if success {
                    "payment processed successfully"
                } else {
                    "insufficient funds"
                };
                ok(json!({
                    "success": success,
                    "message": message,
                    "order_id": order_id,
                    "amount": Money::new(amount),
                }))
            }
            _ => text(404, "404 page not found\n"),
        }
    }
}

impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.state.lock().calls.push(request.clone());
        if self.state.lock().offline {
            return Err(RequestError::Network("connection refused".to_string()));
        }
        Ok(self.handle(&request))
    }
}

fn ok(body: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: body.to_string(),
    }
}

fn text(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn account_json(user: &str, balance: Decimal) -> Value {
    json!({
        "id": format!("acc-{}", user),
        "user_id": user,
        "balance": Money::new(balance),
    })
}

fn amount_of(body: &Value) -> Decimal {
    serde_json::from_value::<Money>(body["amount"].clone())
        .map(|m| m.as_decimal())
        .unwrap_or_default()
}
