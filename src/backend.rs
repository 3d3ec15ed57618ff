use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use tracing::{event, Level};

use crate::config::AppConfig;
use crate::domain::{NewOrder, NewProduct, OrderRequest, Product};
use crate::error::BffError;

/// Calls into the domain backend. Mocked at this seam in handler tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BackendService: Send + Sync {
    async fn fetch_products(
        &self,
        product_type: &str,
        page_size: i32,
    ) -> Result<Vec<Product>, BffError>;

    async fn create_product(&self, new_product: &NewProduct) -> Result<i64, BffError>;

    async fn create_order(&self, order_request: &OrderRequest) -> Result<i64, BffError>;
}

pub struct HttpBackendService {
    base_url: String,
    auth_token: String,
    timeout: Duration,
    http: Client,
}

impl HttpBackendService {
    pub fn new(config: &AppConfig) -> HttpBackendService {
        HttpBackendService {
            base_url: config.backend_base_url(),
            auth_token: config.auth_token.clone(),
            timeout: config.backend_timeout,
            http: Client::new(),
        }
    }

    /// Pulls the integer `id` out of a creation response. The backend must
    /// supply it; this layer never fabricates one.
    fn extract_id(payload: &Value, missing_message: &str) -> Result<i64, BffError> {
        payload
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| BffError::Internal(String::from(missing_message)))
    }
}

#[async_trait]
impl BackendService for HttpBackendService {
    async fn fetch_products(
        &self,
        product_type: &str,
        page_size: i32,
    ) -> Result<Vec<Product>, BffError> {
        let url = format!("{}/products?type={}", self.base_url, product_type);
        event!(
            Level::DEBUG,
            "fetching products: type={} pageSize={}",
            product_type,
            page_size
        );

        let response = match self.http.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(BffError::UpstreamTimeout(format!(
                    "product listing exceeded {}ms",
                    self.timeout.as_millis()
                )))
            }
            Err(e) => return Err(BffError::UpstreamUnreachable(e.to_string())),
        };

        if !response.status().is_success() {
            return Err(BffError::Upstream(String::from(
                "something went wrong, please check if you provided a valid 'type'",
            )));
        }

        match response.json::<Vec<Product>>().await {
            Ok(products) => Ok(products),
            Err(e) => Err(BffError::Upstream(format!(
                "failed to decode product list: {}",
                e
            ))),
        }
    }

    async fn create_product(&self, new_product: &NewProduct) -> Result<i64, BffError> {
        let url = format!("{}/products", self.base_url);

        let body = match serde_json::to_vec(new_product) {
            Ok(body) => body,
            Err(e) => {
                return Err(BffError::Internal(format!(
                    "failed to serialize product: {}",
                    e
                )))
            }
        };

        let response = match self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authenticate", &self.auth_token)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(BffError::Upstream(e.to_string())),
        };

        if !response.status().is_success() {
            return Err(BffError::Upstream(String::from(
                "something went wrong, please try again",
            )));
        }

        match response.json::<Value>().await {
            Ok(payload) => Self::extract_id(&payload, "something went wrong, please try again"),
            Err(e) => Err(BffError::Upstream(format!(
                "failed to decode create-product response: {}",
                e
            ))),
        }
    }

    async fn create_order(&self, order_request: &OrderRequest) -> Result<i64, BffError> {
        let url = format!("{}/orders", self.base_url);
        let order = NewOrder::pending(order_request);

        let body = match serde_json::to_vec(&order) {
            Ok(body) => body,
            Err(e) => return Err(BffError::Internal(format!("failed to serialize order: {}", e))),
        };

        let response = match self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authenticate", &self.auth_token)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(BffError::Upstream(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            event!(Level::WARN, "order creation rejected by backend: {}", status);
            return Err(BffError::Upstream(format!(
                "received non-success response: {}",
                status
            )));
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(BffError::Upstream(format!(
                    "error reading response body: {}",
                    e
                )))
            }
        };

        if bytes.is_empty() {
            return Err(BffError::Internal(String::from(
                "no order id received in Order API response",
            )));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(payload) => Self::extract_id(&payload, "invalid order id received in response"),
            Err(e) => Err(BffError::Upstream(format!(
                "error unmarshalling response body: {}",
                e
            ))),
        }
    }
}
