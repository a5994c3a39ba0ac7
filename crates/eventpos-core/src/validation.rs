//! # Validation Module
//!
//! Input validation utilities for the event POS terminal.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Workflow (this crate)                                        │
//! │  ├── Empty barcode → inline error, no request                          │
//! │  └── Register identity checked once at config load                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API client (eventpos-client)                                 │
//! │  └── Re-checks the code before building the request URL                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Event API                                                    │
//! │  └── 404 for unknown codes, 4xx/5xx with `detail` on purchase          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eventpos_core::validation::validate_code;
//!
//! assert_eq!(validate_code("  4901234567894 ").unwrap(), "4901234567894");
//! assert!(validate_code("").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::RegisterIdentity;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length of the employee code column on the event API.
pub const EMP_CD_LENGTH: usize = 5;

// =============================================================================
// Barcode Validators
// =============================================================================

/// Validates a scanned or typed barcode and returns it trimmed.
///
/// Only an empty code is rejected locally. Anything else goes to the API as
/// a single percent-encoded path segment, and the server decides whether it
/// names a product.
pub fn validate_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::MissingCode);
    }

    Ok(code.to_string())
}

// =============================================================================
// Register Validators
// =============================================================================

fn validate_digits(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates the register identity sent with every purchase.
///
/// ## Rules
/// - `EMP_CD`: exactly five digits
/// - `STORE_CD`, `POS_NO`: non-empty, digits only
pub fn validate_register_identity(identity: &RegisterIdentity) -> ValidationResult<()> {
    validate_digits("EMP_CD", &identity.emp_cd)?;
    if identity.emp_cd.len() != EMP_CD_LENGTH {
        return Err(ValidationError::WrongLength {
            field: "EMP_CD".to_string(),
            expected: EMP_CD_LENGTH,
        });
    }

    validate_digits("STORE_CD", &identity.store_cd)?;
    validate_digits("POS_NO", &identity.pos_no)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
