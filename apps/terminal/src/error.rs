//! # Application Error Type
//!
//! What the clerk (or the startup log) sees when something fails.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Terminal                           │
//! │                                                                         │
//! │  ValidationError ──┐                                                   │
//! │  CoreError ────────┼──► AppError { code, message } ──► inline / modal  │
//! │  ClientError ──────┤                                   / startup exit  │
//! │  io / toml ────────┘                                                   │
//! │                                                                         │
//! │  Internal details (HTTP reasons, io errors) go to the log with        │
//! │  tracing::error!; the clerk gets a short Japanese message.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use eventpos_client::ClientError;
use eventpos_core::{CoreError, LookupFailure};

/// Result type alias for the terminal app.
pub type AppResult<T> = Result<T, AppError>;

/// Shown when a key press does nothing in the current screen state.
pub const NOT_NOW_MESSAGE: &str = "この操作は現在できません";

/// Application error.
///
/// ## Serialization
/// ```json
/// { "code": "NOT_FOUND", "message": "商品が見つかりませんでした" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message for the screen
    pub message: String,
}

/// Error codes, one per failure kind the clerk can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad barcode input
    ValidationError,

    /// Product lookup answered 404
    NotFound,

    /// Product lookup failed otherwise
    LookupFailed,

    /// API server did not answer
    Unreachable,

    /// Purchase submission rejected
    PurchaseFailed,

    /// Capture device could not be used
    CameraError,

    /// Action not allowed right now
    BusinessLogic,

    /// Startup configuration problem
    ConfigError,

    /// Anything else
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts workflow errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { state, event } => {
                tracing::debug!(state, event, "Rejected event");
                AppError::new(ErrorCode::BusinessLogic, NOT_NOW_MESSAGE)
            }
            CoreError::Validation(e) => AppError::new(ErrorCode::ValidationError, e.to_string()),
            other => AppError::new(ErrorCode::BusinessLogic, other.to_string()),
        }
    }
}

/// Converts API client errors.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(e) => AppError::new(ErrorCode::ValidationError, e.to_string()),
            ClientError::NotFound { .. } => {
                AppError::new(ErrorCode::NotFound, LookupFailure::NotFound.to_string())
            }
            ClientError::LookupFailed { reason } => {
                tracing::error!("Product lookup failed: {}", reason);
                AppError::new(ErrorCode::LookupFailed, LookupFailure::Failed.to_string())
            }
            ClientError::Unreachable(e) => {
                tracing::error!("API server unreachable: {}", e);
                AppError::new(ErrorCode::Unreachable, LookupFailure::Unreachable.to_string())
            }
            ClientError::PurchaseFailed { message, .. } => {
                AppError::new(ErrorCode::PurchaseFailed, message)
            }
            ClientError::EmptyPurchase => {
                AppError::new(ErrorCode::BusinessLogic, ClientError::EmptyPurchase.to_string())
            }
            ClientError::InvalidEndpoint(e) => {
                AppError::config(format!("Invalid API endpoint: {}", e))
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        AppError::internal(format!("I/O error: {}", err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Invalid config file: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use eventpos_core::ValidationError;

    #[test]
    fn test_core_error_conversion() {
        let err = AppError::from(CoreError::InvalidTransition {
            state: "scanning",
            event: "purchase",
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, NOT_NOW_MESSAGE);

        let err = AppError::from(CoreError::EmptyPurchaseList);
        assert_eq!(err.message, "商品がリストに追加されていません");

        let err = AppError::from(CoreError::Validation(ValidationError::MissingCode));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "商品情報を入力してください");
    }

    #[test]
    fn test_client_error_conversion_hides_details() {
        let err = AppError::from(ClientError::LookupFailed {
            reason: "HTTP 502".to_string(),
        });
        assert_eq!(err.code, ErrorCode::LookupFailed);
        assert_eq!(err.message, "商品の取得に失敗しました");

        let err = AppError::from(ClientError::PurchaseFailed {
            status: Some(400),
            message: "在庫が不足しています".to_string(),
        });
        assert_eq!(err.code, ErrorCode::PurchaseFailed);
        assert_eq!(err.message, "在庫が不足しています");
    }

    #[test]
    fn test_serialization() {
        let err = AppError::new(ErrorCode::NotFound, "商品が見つかりませんでした");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "商品が見つかりませんでした");
    }
}
