//! # Domain Types
//!
//! Core domain types for the event POS terminal.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────────┐  │
//! │  │    Product      │   │  PurchaseList    │   │ TransactionResult   │  │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────────  │  │
//! │  │  PRD_ID         │──►│  entries (Vec)   │──►│  transaction_id     │  │
//! │  │  CODE           │   │  total()         │   │  total_amount       │  │
//! │  │  NAME / PRICE   │   │  total_with_tax()│   └─────────────────────┘  │
//! │  └─────────────────┘   └──────────────────┘                             │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌─────────────────┐   ┌──────────────────┐                             │
//! │  │RegisterIdentity │──►│ PurchaseRequest  │  POST /purchase/            │
//! │  │ EMP/STORE/POS   │   │ items: [..]      │                             │
//! │  └─────────────────┘   └──────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The event API speaks upper-case column names (`PRD_ID`, `CODE`, ...).
//! Field names stay snake_case in Rust and serde renames them on the wire.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Yen;
use crate::CONSUMPTION_TAX;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so the consumption tax is 1000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by `GET /products/{code}`.
///
/// Immutable once fetched. The same product may appear several times in a
/// [`PurchaseList`]; each scan is its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product primary key on the event API.
    #[serde(rename = "PRD_ID")]
    pub id: i64,

    /// Barcode (JAN/EAN) as scanned.
    #[serde(rename = "CODE")]
    pub code: String,

    /// Display name.
    #[serde(rename = "NAME")]
    pub name: String,

    /// Unit price, tax exclusive.
    #[serde(rename = "PRICE")]
    pub price: Yen,
}

// =============================================================================
// Purchase List
// =============================================================================

/// The ordered collection of products pending purchase.
///
/// ## Invariants
/// - Insertion order is preserved (the receipt lists items as scanned)
/// - Duplicates are separate entries; there is no quantity column
/// - Only the workflow mutates it: append on add, clear on receipt dismissal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurchaseList {
    entries: Vec<Product>,
}

impl PurchaseList {
    /// Creates an empty list.
    pub fn new() -> Self {
        PurchaseList {
            entries: Vec::new(),
        }
    }

    /// Appends a product.
    ///
    /// Fails only if the new total, with tax, would not fit in [`Yen`]; the
    /// list is left unchanged in that case.
    pub(crate) fn push(&mut self, product: Product) -> Result<(), CoreError> {
        self.total()
            .checked_add(product.price)
            .and_then(|total| total.checked_with_tax(CONSUMPTION_TAX))
            .ok_or(CoreError::AmountOverflow)?;
        self.entries.push(product);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in the order they were added.
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    /// Returns the entry at `index` (0-based), for the detail view.
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of entry prices, tax exclusive.
    pub fn total(&self) -> Yen {
        self.entries.iter().map(|p| p.price).sum()
    }

    /// `floor(total * 1.1)`, what the confirm dialog shows.
    pub fn total_with_tax(&self) -> Yen {
        self.total().with_consumption_tax()
    }
}

// =============================================================================
// Transaction Result
// =============================================================================

/// Response of a successful `POST /purchase/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Transaction number printed on the receipt ("お取引 No.").
    pub transaction_id: i64,

    /// Tax-exclusive total computed by the server.
    pub total_amount: Yen,
}

impl TransactionResult {
    /// Tax-inclusive total shown on the receipt.
    pub fn total_with_tax(&self) -> Yen {
        self.total_amount.with_consumption_tax()
    }
}

// =============================================================================
// Register Identity
// =============================================================================

/// Who and where a purchase is rung up.
///
/// Sent with every purchase and shown as the status chips on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterIdentity {
    /// Employee (clerk) code, five characters on the event API.
    pub emp_cd: String,

    /// Store code.
    pub store_cd: String,

    /// POS terminal number.
    pub pos_no: String,
}

impl Default for RegisterIdentity {
    /// The event's shared register: anonymous clerk, store 30, POS 90.
    fn default() -> Self {
        RegisterIdentity {
            emp_cd: "99999".to_string(),
            store_cd: "30".to_string(),
            pos_no: "90".to_string(),
        }
    }
}

impl RegisterIdentity {
    /// The three status chips on the home screen.
    ///
    /// The clerk chip shows `--` for the shared anonymous clerk.
    pub fn status_chips(&self) -> [String; 3] {
        let clerk = if self.emp_cd == "99999" {
            "--"
        } else {
            self.emp_cd.as_str()
        };
        [
            format!("レジ担当:{}", clerk),
            format!("店舗:{}", self.store_cd),
            format!("POS:{}", self.pos_no),
        ]
    }
}

// =============================================================================
// Purchase Request (wire payload)
// =============================================================================

/// One line of the purchase payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    #[serde(rename = "PRD_ID")]
    pub id: i64,
    #[serde(rename = "PRD_CODE")]
    pub code: String,
    #[serde(rename = "PRD_NAME")]
    pub name: String,
    #[serde(rename = "PRD_PRICE")]
    pub price: Yen,
}

impl From<&Product> for PurchaseItem {
    fn from(product: &Product) -> Self {
        PurchaseItem {
            id: product.id,
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// Body of `POST /purchase/`.
///
/// ```json
/// {"EMP_CD":"99999","STORE_CD":"30","POS_NO":"90",
///  "items":[{"PRD_ID":1,"PRD_CODE":"4901234567894","PRD_NAME":"Test Item","PRD_PRICE":1000}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(rename = "EMP_CD")]
    pub emp_cd: String,
    #[serde(rename = "STORE_CD")]
    pub store_cd: String,
    #[serde(rename = "POS_NO")]
    pub pos_no: String,
    pub items: Vec<PurchaseItem>,
}

impl PurchaseRequest {
    /// Builds the payload for `products`, preserving order and duplicates.
    pub fn new(identity: &RegisterIdentity, products: &[Product]) -> Self {
        PurchaseRequest {
            emp_cd: identity.emp_cd.clone(),
            store_cd: identity.store_cd.clone(),
            pos_no: identity.pos_no.clone(),
            items: products.iter().map(PurchaseItem::from).collect(),
        }
    }
}

// =============================================================================
// Purchase History
// =============================================================================

/// One line of a past purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    pub name: String,
    pub price: Yen,
}

/// A past purchase shown on the history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub datetime: NaiveDateTime,
    pub store: String,
    pub cashier: String,
    pub items: Vec<HistoryItem>,
}

impl HistoryRecord {
    /// Sum of item prices.
    pub fn total(&self) -> Yen {
        self.items.iter().map(|i| i.price).sum()
    }

    /// `2025/10/12 15:47`
    pub fn display_datetime(&self) -> String {
        self.datetime.format("%Y/%m/%d %H:%M").to_string()
    }
}
