//! # eventpos-client: Event API Client
//!
//! HTTP/JSON client for the two endpoints the terminal needs.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Flow                                    │
//! │                                                                         │
//! │  Terminal controller                                                   │
//! │       │                                                                 │
//! │       │ Effect::Lookup { code }          Effect::Submit(products)       │
//! │       ▼                                        ▼                        │
//! │  ┌────────────────────────┐      ┌─────────────────────────────────┐   │
//! │  │ lookup_product(code)   │      │ submit_purchase(identity, list) │   │
//! │  │ GET /products/{code}   │      │ POST /purchase/                 │   │
//! │  └───────────┬────────────┘      └───────────────┬─────────────────┘   │
//! │              │                                   │                      │
//! │      200 ─► Product                      200 ─► TransactionResult      │
//! │      404 ─► NotFound                     !2xx ─► PurchaseFailed        │
//! │      !2xx ─► LookupFailed                        (detail or generic)   │
//! │      no answer ─► Unreachable            no answer ─► Unreachable      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no timeouts: the clerk decides whether to try again.

pub mod client;
pub mod config;
pub mod error;

pub use client::{ApiClient, PosApi};
pub use config::ApiConfig;
pub use error::{ClientError, ClientResult};
