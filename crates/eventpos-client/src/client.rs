//! # API Client
//!
//! [`ApiClient`] performs the two calls of the purchase flow. The terminal
//! only sees the [`PosApi`] trait, so its tests can swap in a fake.
//!
//! ## Example
//! ```rust,no_run
//! use eventpos_client::{ApiClient, ApiConfig, PosApi};
//!
//! # async fn demo() -> eventpos_client::ClientResult<()> {
//! let client = ApiClient::new(ApiConfig::new("http://localhost:8000")?)?;
//! let product = client.lookup_product("4901234567894").await?;
//! println!("{} {}", product.name, product.price);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use eventpos_core::validation::validate_code;
use eventpos_core::{Product, PurchaseRequest, RegisterIdentity, TransactionResult};

use crate::config::ApiConfig;
use crate::error::{
    ClientError, ClientResult, PURCHASE_FAILED_MESSAGE, PURCHASE_FAILED_NO_DETAIL_MESSAGE,
};

// =============================================================================
// API Seam
// =============================================================================

/// The remote operations the purchase workflow depends on.
#[async_trait]
pub trait PosApi: Send + Sync {
    /// Fetches one product by barcode.
    ///
    /// Empty or malformed codes fail locally with
    /// [`ClientError::Validation`]; nothing is sent.
    async fn lookup_product(&self, code: &str) -> ClientResult<Product>;

    /// Commits one purchase transaction. Not idempotent: every call that
    /// reaches the server is a new transaction.
    async fn submit_purchase(
        &self,
        identity: &RegisterIdentity,
        products: &[Product],
    ) -> ClientResult<TransactionResult>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// reqwest-backed [`PosApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("eventpos-terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;

        Ok(ApiClient { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn unreachable(err: reqwest::Error) -> ClientError {
    warn!(error = %err, "API request got no response");
    ClientError::Unreachable(err.to_string())
}

#[async_trait]
impl PosApi for ApiClient {
    async fn lookup_product(&self, code: &str) -> ClientResult<Product> {
        let code = validate_code(code)?;
        let url = self.config.product_url(&code)?;
        debug!(code = %code, url = %url, "Looking up product");

        let response = self.http.get(url).send().await.map_err(unreachable)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(code = %code, "Product not found");
            return Err(ClientError::NotFound { code });
        }
        if !status.is_success() {
            warn!(code = %code, status = status.as_u16(), "Product lookup failed");
            return Err(ClientError::LookupFailed {
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let product: Product = response.json().await.map_err(|e| {
            warn!(code = %code, error = %e, "Product response is not a product");
            ClientError::LookupFailed {
                reason: e.to_string(),
            }
        })?;

        debug!(product_id = product.id, name = %product.name, "Product found");
        Ok(product)
    }

    async fn submit_purchase(
        &self,
        identity: &RegisterIdentity,
        products: &[Product],
    ) -> ClientResult<TransactionResult> {
        if products.is_empty() {
            return Err(ClientError::EmptyPurchase);
        }

        let url = self.config.purchase_url()?;
        let request = PurchaseRequest::new(identity, products);
        info!(items = products.len(), store = %identity.store_cd, pos = %identity.pos_no, "Submitting purchase");

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(unreachable)?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<Value>().await {
                Ok(body) => detail_message(&body),
                Err(_) => PURCHASE_FAILED_NO_DETAIL_MESSAGE.to_string(),
            };
            warn!(status = status.as_u16(), message = %message, "Purchase rejected");
            return Err(ClientError::PurchaseFailed {
                status: Some(status.as_u16()),
                message,
            });
        }

        let result: TransactionResult = response.json().await.map_err(|e| {
            warn!(error = %e, "Purchase response is not a transaction result");
            ClientError::PurchaseFailed {
                status: Some(status.as_u16()),
                message: PURCHASE_FAILED_MESSAGE.to_string(),
            }
        })?;

        info!(
            transaction_id = result.transaction_id,
            total = result.total_amount.amount(),
            "Purchase completed"
        );
        Ok(result)
    }
}

/// The `detail` string of an error body, else the generic message.
fn detail_message(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        _ => PURCHASE_FAILED_MESSAGE.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
