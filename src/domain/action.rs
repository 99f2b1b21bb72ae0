/// Which panel the root composition shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Orders,
    Accounts,
    Payments,
}

impl Tab {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "orders" | "order" => Some(Tab::Orders),
            "accounts" | "account" => Some(Tab::Accounts),
            "payments" | "payment" => Some(Tab::Payments),
            _ => None,
        }
    }
}

impl core::fmt::Display for Tab {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Tab::Orders => "orders",
            Tab::Accounts => "accounts",
            Tab::Payments => "payments",
        })
    }
}

/// One user interaction. Amounts stay as typed; panels validate them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    SetUser(String),
    CreateOrder { amount: String, description: String },
    ListOrders,
    GetOrder { order_id: String },
    CreateAccount,
    GetAccount,
    Deposit { amount: String },
    Pay {
        order_id: Option<String>,
        amount: Option<String>,
    },
}

impl Action {
    /// The tab an action belongs to, if it targets a panel.
    pub fn tab(&self) -> Option<Tab> {
        match self {
            Action::SelectTab(_) | Action::SetUser(_) => None,
            Action::CreateOrder { .. } | Action::ListOrders | Action::GetOrder { .. } => {
                Some(Tab::Orders)
            }
            Action::CreateAccount | Action::GetAccount | Action::Deposit { .. } => {
                Some(Tab::Accounts)
            }
            Action::Pay { .. } => Some(Tab::Payments),
        }
    }
}
