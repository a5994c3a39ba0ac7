//! # eventpos-core: Pure Business Logic for the Event POS Terminal
//!
//! This crate holds everything about a purchase that can be decided without
//! touching the network, the scanner, or the screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Event POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/terminal (kiosk shell)                     │   │
//! │  │    Home ──► Scan / Manual ──► Purchase list ──► Confirm ──► Receipt │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Event / Effect                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ eventpos-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ workflow  │  │ validation│  │   │
//! │  │   │  Product  │  │    Yen    │  │ Workflow  │  │   code    │  │   │
//! │  │   │ Purchase  │  │  TaxRate  │  │  Effect   │  │  register │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO DEVICES • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               eventpos-client (HTTP/JSON API)                   │   │
//! │  │            GET /products/{code} • POST /purchase/               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PurchaseList, TransactionResult, ...)
//! - [`money`] - Integer yen with the 10% consumption tax
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (barcodes, register identity)
//! - [`workflow`] - The scan → list → confirm → purchase → receipt state machine
//!
//! ## Example Usage
//!
//! ```rust
//! use eventpos_core::money::Yen;
//!
//! let total = Yen::new(1000) + Yen::new(500);
//! assert_eq!(total.to_string(), "¥1,500");
//! assert_eq!(total.tax_inclusive_label(), "1,650円 (税込)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Yen;
pub use types::*;
pub use workflow::{Effect, Event, LookupFailure, LookupOrigin, Modal, Workflow, WorkflowState};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Japanese consumption tax applied to every purchase (10%).
pub const CONSUMPTION_TAX: TaxRate = TaxRate::from_bps(1000);
