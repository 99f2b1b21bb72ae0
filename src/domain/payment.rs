use crate::domain::Money;

/// Outcome of one settlement attempt; lives for a single response cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    pub success: bool,
    pub message: String,
    pub order_id: Option<String>,
    pub amount: Option<Money>,
}

impl PaymentResult {
    pub fn status_label(&self) -> &'static str {
        if self.success { "SUCCESS" } else { "FAILED" }
    }
}
