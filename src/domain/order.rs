use crate::domain::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
}

impl OrderStatus {
    /// Maps the backend's status vocabulary onto the three states the UI shows.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created" | "new" => Some(OrderStatus::Created),
            "paid" => Some(OrderStatus::Paid),
            "failed" | "cancelled" | "canceled" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub amount: Money, // always > 0
    pub description: String,
    pub status: OrderStatus,
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "order={},user={},amount={},status={}",
            self.id, self.user_id, self.amount, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus;

    #[test]
    fn backend_vocabulary_maps_to_ui_states() {
        assert_eq!(OrderStatus::from_wire("NEW"), Some(OrderStatus::Created));
        assert_eq!(OrderStatus::from_wire("PAID"), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::from_wire("CANCELLED"), Some(OrderStatus::Failed));
        assert_eq!(OrderStatus::from_wire("failed"), Some(OrderStatus::Failed));
        assert_eq!(OrderStatus::from_wire("SHIPPED"), None);
    }
}
