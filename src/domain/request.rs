use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Backend surface a request is addressed to; each may live behind its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Orders,
    Payments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub surface: Surface,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(surface: Surface, path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            surface,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(surface: Surface, path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            surface,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    #[cfg(test)]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
