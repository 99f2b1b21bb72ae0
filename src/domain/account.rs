use crate::domain::Money;

/// Server-owned balance record. The client only ever displays `balance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Option<String>,
    pub user_id: String,
    pub balance: Money, // non-negative
}

impl core::fmt::Display for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "user={},balance={}", self.user_id, self.balance)
    }
}
