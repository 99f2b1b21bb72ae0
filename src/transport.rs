use reqwest::Url;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::domain::{Error, HttpRequest, HttpResponse, Method, RequestError, Transport};

/// reqwest-backed transport. The timeout races the whole exchange, body included.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url_for(&self, request: &HttpRequest) -> Result<Url, RequestError> {
        let base = self.config.base_for(request.surface);
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), request.path);
        let mut url = Url::parse(&joined)
            .map_err(|e| RequestError::Network(format!("bad URL {}: {}", joined, e)))?;

        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let url = self.url_for(&request)?;
        debug!(%url, method = ?request.method, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(HttpResponse { status, body })
        };

        let outcome = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| RequestError::Timeout(limit))?,
            None => exchange.await,
        };

        let response = outcome.map_err(|e| RequestError::Network(e.to_string()))?;
        debug!(status = response.status, "response received");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::Surface;

    fn transport(vars: &[(&str, &str)]) -> HttpTransport {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = ClientConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        HttpTransport::new(config).unwrap()
    }

    #[test]
    fn joins_base_path_and_encoded_query() {
        let transport = transport(&[("STOREFRONT_PAYMENTS_BASE", "http://localhost:8081/api/")]);

        let request = HttpRequest::get(Surface::Payments, "/payments/get-account")
            .with_query("user_id", "alice & bob");
        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/api/payments/get-account?user_id=alice+%26+bob"
        );

        let request = HttpRequest::get(Surface::Orders, "/orders/list");
        let url = transport.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/orders/list");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Port 9 (discard) is closed on any sane test host.
        let transport = transport(&[
            ("STOREFRONT_API_BASE", "http://127.0.0.1:9"),
            ("STOREFRONT_TIMEOUT_MS", "2000"),
        ]);
        let err = transport
            .send(HttpRequest::get(Surface::Orders, "/orders/list"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::Network(_) | RequestError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn silent_backend_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let base = format!("http://{}", addr);
        let transport = transport(&[
            ("STOREFRONT_API_BASE", base.as_str()),
            ("STOREFRONT_TIMEOUT_MS", "100"),
        ]);
        let err = transport
            .send(HttpRequest::get(Surface::Orders, "/orders/list"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Timeout(d) if d == Duration::from_millis(100)));
    }
}
