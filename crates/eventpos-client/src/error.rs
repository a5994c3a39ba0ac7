//! # Client Error Types
//!
//! Error types for calls to the event API.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Before request │  │     Lookup      │  │       Purchase          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  NotFound       │  │  PurchaseFailed         │ │
//! │  │  EmptyPurchase  │  │  LookupFailed   │  │  (server `detail`)      │ │
//! │  │  InvalidEndpoint│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │                       Unreachable (either call)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use eventpos_core::{LookupFailure, ValidationError};
use thiserror::Error;

/// Result type alias for API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the purchase endpoint fails without a usable `detail`.
pub const PURCHASE_FAILED_MESSAGE: &str = "購入処理に失敗しました。";

/// Shown when the purchase endpoint fails with a body that is not JSON.
pub const PURCHASE_FAILED_NO_DETAIL_MESSAGE: &str =
    "購入処理に失敗しました。サーバーからの詳細情報がありません。";

/// Event API client error.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Local Errors (no request sent)
    // =========================================================================
    /// The code failed local validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Submission attempted with an empty product list.
    #[error("商品がリストに追加されていません")]
    EmptyPurchase,

    /// The configured endpoint cannot be used as a base URL.
    #[error("Invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// The API answered 404 for this code.
    #[error("Product not found: {code}")]
    NotFound { code: String },

    /// Non-2xx other than 404, or a body that is not a Product.
    #[error("Product lookup failed: {reason}")]
    LookupFailed { reason: String },

    // =========================================================================
    // Purchase Errors
    // =========================================================================
    /// The purchase endpoint rejected the transaction.
    #[error("{message}")]
    PurchaseFailed { status: Option<u16>, message: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got an HTTP answer.
    #[error("API server unreachable: {0}")]
    Unreachable(String),
}

impl ClientError {
    /// Maps a failed lookup to what the clerk sees.
    pub fn lookup_failure(&self) -> LookupFailure {
        match self {
            ClientError::NotFound { .. } => LookupFailure::NotFound,
            ClientError::Unreachable(_) => LookupFailure::Unreachable,
            _ => LookupFailure::Failed,
        }
    }

    /// Message for the confirm dialog after a failed submission.
    pub fn purchase_message(&self) -> String {
        match self {
            ClientError::PurchaseFailed { message, .. } => message.clone(),
            ClientError::Unreachable(_) => LookupFailure::Unreachable.to_string(),
            ClientError::EmptyPurchase => self.to_string(),
            _ => PURCHASE_FAILED_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidEndpoint(err.to_string())
    }
}
