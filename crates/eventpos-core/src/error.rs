//! # Error Types
//!
//! Domain-specific error types for eventpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  eventpos-core errors (this file)                                      │
//! │  ├── CoreError        - Workflow and business rule violations          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  eventpos-client errors (separate crate)                               │
//! │  └── ClientError      - Lookup / purchase API failures                 │
//! │                                                                         │
//! │  terminal errors (in app)                                              │
//! │  └── AppError         - What the clerk sees (code + message)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Screen                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages that reach the clerk are Japanese, matching the rest of the
//! kiosk; messages only a developer sees (invalid transitions, config) are
//! English.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Returned by [`crate::workflow::Workflow::apply`] when an event is not
/// allowed in the current state. The workflow is left untouched whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The event has no transition from the current state.
    ///
    /// ## When This Occurs
    /// - A stale key press (e.g. "confirm" after the dialog closed)
    /// - A device decode arriving after scanning was cancelled
    #[error("Event '{event}' is not allowed while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    /// Purchase was requested with nothing in the list.
    #[error("商品がリストに追加されていません")]
    EmptyPurchaseList,

    /// "Add" was pressed with no candidate product on screen.
    #[error("追加する商品がありません")]
    NoCandidate,

    /// The candidate was already appended by a scan.
    #[error("この商品はリストに追加済みです")]
    AlreadyAdded,

    /// A purchase submission is still waiting for the API.
    #[error("購入処理中です。しばらくお待ちください")]
    SubmissionInFlight,

    /// Adding the product would push the tax-inclusive total past what the
    /// terminal can represent.
    #[error("合計金額が上限を超えるため追加できません")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The barcode field was empty (or only whitespace).
    #[error("商品情報を入力してください")]
    MissingCode,

    /// A required configuration field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value has the wrong length.
    #[error("{field} must be exactly {expected} characters")]
    WrongLength { field: String, expected: usize },

    /// Invalid format (e.g. non-digit register code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
