use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to {operation}: {source}")]
    Api {
        operation: Operation,
        #[source]
        source: RequestError,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Why a single backend call failed.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("empty response from server")]
    EmptyBody,

    #[error("invalid JSON response from server: {0}")]
    InvalidJson(String),

    #[error("unexpected response shape: {0}")]
    Schema(String),
}

impl RequestError {
    pub fn during(self, operation: Operation) -> Error {
        Error::Api {
            operation,
            source: self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrder,
    ListOrders,
    GetOrder,
    CreateAccount,
    GetAccount,
    Deposit,
    RefreshAfterDeposit,
    ProcessPayment,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Operation::CreateOrder => "create order",
            Operation::ListOrders => "fetch orders",
            Operation::GetOrder => "fetch order",
            Operation::CreateAccount => "create account",
            Operation::GetAccount => "fetch account",
            Operation::Deposit => "deposit",
            Operation::RefreshAfterDeposit => "refresh the account after a completed deposit",
            Operation::ProcessPayment => "process payment",
        };
        f.write_str(text)
    }
}
