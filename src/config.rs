use std::time::Duration;

use reqwest::Url;

use crate::domain::{Error, Surface};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_USER: &str = "test_user";

/// The two settlement endpoints seen in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentRoute {
    Process,
    #[default]
    ProcessPayment,
}

impl PaymentRoute {
    pub fn path(&self) -> &'static str {
        match self {
            PaymentRoute::Process => "/payments/process",
            PaymentRoute::ProcessPayment => "/payments/process-payment",
        }
    }
}

/// Everything the client needs to know about where the backend lives.
/// Built once at startup and handed to the transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub orders_base: Url,
    pub payments_base: Url,
    pub timeout: Option<Duration>,
    pub payment_route: PaymentRoute,
    pub initial_user: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = get("STOREFRONT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = parse_base("STOREFRONT_API_BASE", &api_base)?;

        let orders_base = match get("STOREFRONT_ORDERS_BASE") {
            Some(raw) => parse_base("STOREFRONT_ORDERS_BASE", &raw)?,
            None => api_base.clone(),
        };
        let payments_base = match get("STOREFRONT_PAYMENTS_BASE") {
            Some(raw) => parse_base("STOREFRONT_PAYMENTS_BASE", &raw)?,
            None => api_base,
        };

        let timeout = match get("STOREFRONT_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("STOREFRONT_TIMEOUT_MS must be an integer, got '{}'", raw))
                })?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None => Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
        };

        let payment_route = match get("STOREFRONT_PAYMENT_ROUTE").as_deref().map(str::trim) {
            None | Some("process-payment") => PaymentRoute::ProcessPayment,
            Some("process") => PaymentRoute::Process,
            Some(other) => {
                return Err(Error::Config(format!(
                    "STOREFRONT_PAYMENT_ROUTE must be 'process' or 'process-payment', got '{}'",
                    other
                )));
            }
        };

        let initial_user = get("STOREFRONT_USER").unwrap_or_else(|| DEFAULT_USER.to_string());

        Ok(Self {
            orders_base,
            payments_base,
            timeout,
            payment_route,
            initial_user,
        })
    }

    pub fn base_for(&self, surface: Surface) -> &Url {
        match surface {
            Surface::Orders => &self.orders_base,
            Surface::Payments => &self.payments_base,
        }
    }
}

fn parse_base(key: &str, raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("{} is not a valid URL ({}): {}", key, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            key, other
        ))),
    }
}
