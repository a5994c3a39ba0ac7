//! # Purchase Workflow
//!
//! The scan → add-to-list → confirm → purchase → receipt state machine.
//!
//! ## State Diagram
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Workflow States                            │
//! │                                                                         │
//! │             StartScan              Decoded                              │
//! │   ┌──────┐ ───────────► ┌──────────┐ ─────────┐                         │
//! │   │ Idle │ ◄─────────── │ Scanning │          │                         │
//! │   └──┬───┘  Cancel/     └──────────┘          ▼                         │
//! │      │      CameraFailed               ┌────────────┐  LookupFailed     │
//! │      │ OpenManualEntry                 │ LookingUp  │ ─────────► Idle   │
//! │      ▼                 SearchManual    └─────┬──────┘  (inline error)   │
//! │   ┌─────────────┐ ──────────────────────────►│                          │
//! │   │ ManualEntry │                            │ LookupSucceeded          │
//! │   └─────────────┘                            ▼                          │
//! │                                        ┌──────────────┐ AddCandidate    │
//! │                                        │ HasCandidate │ ─────────► Idle │
//! │                                        └──────────────┘                 │
//! │                                                                         │
//! │   Idle / ManualEntry / HasCandidate                                     │
//! │      │ PurchaseClicked (list non-empty)                                 │
//! │      ▼                                                                  │
//! │   ┌────────────┐ ConfirmPurchase ┌────────────┐ PurchaseSucceeded       │
//! │   │ Confirming │ ──────────────► │ Submitting │ ──────────► Complete    │
//! │   └────────────┘ ◄────────────── └────────────┘                │        │
//! │                   PurchaseFailed (error shown, list kept)       │        │
//! │                                                   DismissReceipt│        │
//! │                                     Idle ◄──────────────────────┘        │
//! │                                     (list, receipt, in-flight cleared)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pure Transitions
//! [`Workflow::apply`] never performs I/O. When a transition needs the
//! network it returns an [`Effect`]; the caller runs it and feeds the outcome
//! back as [`Event::LookupSucceeded`] / [`Event::PurchaseFailed`] etc.
//!
//! ```rust
//! use eventpos_core::workflow::{Effect, Event, LookupOrigin, Workflow};
//!
//! let mut workflow = Workflow::new();
//! workflow.apply(Event::StartScan).unwrap();
//! let effect = workflow.apply(Event::Decoded("4901234567894".into())).unwrap();
//! assert_eq!(
//!     effect,
//!     Effect::Lookup { code: "4901234567894".into(), origin: LookupOrigin::Scan }
//! );
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::error::{CoreError, CoreResult};
use crate::money::Yen;
use crate::types::{Product, PurchaseList, TransactionResult};
use crate::validation::validate_code;

/// Shown in the code panel before anything was scanned.
pub const CODE_PLACEHOLDER: &str = "-------------";

// =============================================================================
// Lookup Origin / Failure
// =============================================================================

/// What triggered a product lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOrigin {
    /// Camera / scanner decode. Found products are auto-added.
    Scan,
    /// Typed into the manual entry form. Needs an explicit "add".
    Manual,
}

/// Why a lookup did not produce a product. Shown inline under the code panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupFailure {
    /// The API answered 404.
    #[error("商品が見つかりませんでした")]
    NotFound,

    /// Any other non-2xx, or an unreadable body.
    #[error("商品の取得に失敗しました")]
    Failed,

    /// The request never got an answer.
    #[error("APIサーバーに接続できませんでした")]
    Unreachable,
}

// =============================================================================
// State
// =============================================================================

/// Where the clerk is in the purchase flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Scanning,
    ManualEntry,
    LookingUp {
        code: String,
        origin: LookupOrigin,
    },
    HasCandidate {
        product: Product,
        /// Already appended by a scan; the add button is disabled.
        auto_added: bool,
    },
    Confirming {
        /// Message from the last failed submission, if any.
        error: Option<String>,
    },
    Submitting,
    Complete {
        receipt: TransactionResult,
        /// The "受け取り済" checkbox on the receipt.
        received: bool,
    },
}

impl WorkflowState {
    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Scanning => "scanning",
            WorkflowState::ManualEntry => "manual-entry",
            WorkflowState::LookingUp { .. } => "looking-up",
            WorkflowState::HasCandidate { .. } => "has-candidate",
            WorkflowState::Confirming { .. } => "confirming",
            WorkflowState::Submitting => "submitting",
            WorkflowState::Complete { .. } => "complete",
        }
    }
}

// =============================================================================
// Events & Effects
// =============================================================================

/// Everything that can happen to the workflow: clerk actions, device
/// callbacks, and API outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartScan,
    CancelScan,
    Decoded(String),
    CameraFailed(String),
    DismissAlert,
    OpenManualEntry,
    CloseManualEntry,
    SearchManual(String),
    LookupSucceeded(Product),
    LookupFailed(LookupFailure),
    AddCandidate,
    PurchaseClicked,
    CancelPurchase,
    ConfirmPurchase,
    PurchaseSucceeded(TransactionResult),
    PurchaseFailed(String),
    ToggleReceived,
    DismissReceipt,
}

impl Event {
    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartScan => "start-scan",
            Event::CancelScan => "cancel-scan",
            Event::Decoded(_) => "decoded",
            Event::CameraFailed(_) => "camera-failed",
            Event::DismissAlert => "dismiss-alert",
            Event::OpenManualEntry => "open-manual-entry",
            Event::CloseManualEntry => "close-manual-entry",
            Event::SearchManual(_) => "search-manual",
            Event::LookupSucceeded(_) => "lookup-succeeded",
            Event::LookupFailed(_) => "lookup-failed",
            Event::AddCandidate => "add-candidate",
            Event::PurchaseClicked => "purchase",
            Event::CancelPurchase => "cancel-purchase",
            Event::ConfirmPurchase => "confirm-purchase",
            Event::PurchaseSucceeded(_) => "purchase-succeeded",
            Event::PurchaseFailed(_) => "purchase-failed",
            Event::ToggleReceived => "toggle-received",
            Event::DismissReceipt => "dismiss-receipt",
        }
    }
}

/// I/O requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// `GET /products/{code}`, answer with `LookupSucceeded` / `LookupFailed`.
    Lookup { code: String, origin: LookupOrigin },
    /// `POST /purchase/` with these products, answer with
    /// `PurchaseSucceeded` / `PurchaseFailed`.
    Submit(Vec<Product>),
}

// =============================================================================
// Modal
// =============================================================================

/// The single modal on screen, derived from the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modal {
    /// Blocking error (camera failure). Needs dismissal.
    Error { message: String },
    /// Scanner overlay with a cancel button.
    Scanner,
    /// "購入しますか？" with the tax-inclusive total.
    Confirm {
        total_with_tax: Yen,
        error: Option<String>,
        submitting: bool,
    },
    /// "お買い上げありがとうございます".
    Receipt {
        receipt: TransactionResult,
        received: bool,
    },
}

// =============================================================================
// Workflow
// =============================================================================

/// The purchase workflow: current state plus the session's purchase list.
///
/// ## Invariants
/// - At most one [`Modal`] is visible ([`Workflow::modal`] returns one value)
/// - The purchase list only changes on add (scan auto-add or `AddCandidate`)
///   and on receipt dismissal
/// - `is_processing` is true exactly while a submission is in flight
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    state: WorkflowState,
    list: PurchaseList,
    manual_code: String,
    scanned_code: Option<String>,
    inline_error: Option<String>,
    alert: Option<String>,
    is_processing: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        WorkflowState::Idle
    }
}

impl Workflow {
    pub fn new() -> Self {
        Workflow::default()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Applies one event.
    ///
    /// Returns the effect the caller must run, or an error if the event is
    /// not allowed right now. On error nothing changes.
    pub fn apply(&mut self, event: Event) -> CoreResult<Effect> {
        if self.alert.is_some() {
            return match event {
                Event::DismissAlert => {
                    self.alert = None;
                    Ok(Effect::None)
                }
                other => Err(CoreError::InvalidTransition {
                    state: "showing an error",
                    event: other.name(),
                }),
            };
        }

        let state = std::mem::take(&mut self.state);
        match self.transition(state.clone(), event) {
            Ok(effect) => Ok(effect),
            Err(err) => {
                self.state = state;
                Err(err)
            }
        }
    }

    fn transition(&mut self, state: WorkflowState, event: Event) -> CoreResult<Effect> {
        use WorkflowState as S;

        let invalid = |state: &WorkflowState, event: &Event| CoreError::InvalidTransition {
            state: state.name(),
            event: event.name(),
        };

        match (state, event) {
            // ----- scanning ---------------------------------------------------
            (S::Idle | S::ManualEntry | S::HasCandidate { .. }, Event::StartScan) => {
                self.inline_error = None;
                self.state = S::Scanning;
                Ok(Effect::None)
            }
            (S::Scanning, Event::CancelScan) => {
                self.state = S::Idle;
                Ok(Effect::None)
            }
            (S::Scanning, Event::Decoded(raw)) => match validate_code(&raw) {
                Ok(code) => {
                    self.scanned_code = Some(code.clone());
                    self.begin_lookup(code, LookupOrigin::Scan)
                }
                Err(err) => {
                    self.inline_error = Some(err.to_string());
                    self.state = S::Idle;
                    Ok(Effect::None)
                }
            },
            (S::Scanning, Event::CameraFailed(reason)) => {
                self.alert = Some(format!("カメラの起動に失敗しました: {}", reason));
                self.state = S::Idle;
                Ok(Effect::None)
            }

            // ----- manual entry -----------------------------------------------
            (S::Idle | S::HasCandidate { .. }, Event::OpenManualEntry) => {
                self.scanned_code = None;
                self.state = S::ManualEntry;
                Ok(Effect::None)
            }
            (S::ManualEntry, Event::CloseManualEntry) => {
                self.state = S::Idle;
                Ok(Effect::None)
            }
            (S::ManualEntry, Event::SearchManual(raw)) => {
                self.manual_code = raw;
                match validate_code(&self.manual_code) {
                    Ok(code) => self.begin_lookup(code, LookupOrigin::Manual),
                    Err(err) => {
                        self.inline_error = Some(err.to_string());
                        self.state = S::ManualEntry;
                        Ok(Effect::None)
                    }
                }
            }

            // ----- lookup outcome ---------------------------------------------
            (S::LookingUp { origin, .. }, Event::LookupSucceeded(product)) => {
                self.inline_error = None;
                match origin {
                    LookupOrigin::Scan => {
                        if let Err(err) = self.list.push(product.clone()) {
                            self.inline_error = Some(err.to_string());
                            self.state = S::Idle;
                            return Ok(Effect::None);
                        }
                        self.state = S::HasCandidate {
                            product,
                            auto_added: true,
                        };
                    }
                    LookupOrigin::Manual => {
                        self.manual_code.clear();
                        self.state = S::HasCandidate {
                            product,
                            auto_added: false,
                        };
                    }
                }
                Ok(Effect::None)
            }
            (S::LookingUp { .. }, Event::LookupFailed(failure)) => {
                self.inline_error = Some(failure.to_string());
                self.state = S::Idle;
                Ok(Effect::None)
            }

            // ----- add to list ------------------------------------------------
            (
                S::HasCandidate {
                    product,
                    auto_added: false,
                },
                Event::AddCandidate,
            ) => {
                self.list.push(product)?;
                self.scanned_code = None;
                self.inline_error = None;
                self.state = S::Idle;
                Ok(Effect::None)
            }
            (S::HasCandidate { auto_added: true, .. }, Event::AddCandidate) => {
                Err(CoreError::AlreadyAdded)
            }
            (S::Idle | S::ManualEntry, Event::AddCandidate) => Err(CoreError::NoCandidate),

            // ----- purchase ---------------------------------------------------
            (S::Idle | S::ManualEntry | S::HasCandidate { .. }, Event::PurchaseClicked) => {
                if self.list.is_empty() {
                    return Err(CoreError::EmptyPurchaseList);
                }
                self.state = S::Confirming { error: None };
                Ok(Effect::None)
            }
            (S::Confirming { .. }, Event::CancelPurchase) => {
                self.state = S::Idle;
                Ok(Effect::None)
            }
            (S::Confirming { .. }, Event::ConfirmPurchase) => {
                if self.is_processing {
                    return Err(CoreError::SubmissionInFlight);
                }
                if self.list.is_empty() {
                    return Err(CoreError::EmptyPurchaseList);
                }
                self.is_processing = true;
                self.state = S::Submitting;
                Ok(Effect::Submit(self.list.entries().to_vec()))
            }
            (S::Submitting, Event::ConfirmPurchase | Event::PurchaseClicked) => {
                Err(CoreError::SubmissionInFlight)
            }
            (S::Submitting, Event::PurchaseSucceeded(receipt)) => {
                self.is_processing = false;
                self.state = S::Complete {
                    receipt,
                    received: false,
                };
                Ok(Effect::None)
            }
            (S::Submitting, Event::PurchaseFailed(message)) => {
                self.is_processing = false;
                self.state = S::Confirming {
                    error: Some(message),
                };
                Ok(Effect::None)
            }

            // ----- receipt ----------------------------------------------------
            (S::Complete { receipt, received }, Event::ToggleReceived) => {
                self.state = S::Complete {
                    receipt,
                    received: !received,
                };
                Ok(Effect::None)
            }
            (S::Complete { .. }, Event::DismissReceipt) => {
                self.list.clear();
                self.is_processing = false;
                self.scanned_code = None;
                self.inline_error = None;
                self.state = S::Idle;
                Ok(Effect::None)
            }

            (state, event) => Err(invalid(&state, &event)),
        }
    }

    /// Shows a blocking error modal for a rejected clerk action.
    ///
    /// Ignored (returns `false`) while another modal is up, so the screen
    /// never stacks two.
    pub fn raise_alert(&mut self, message: impl Into<String>) -> bool {
        if self.modal().is_some() {
            return false;
        }
        self.alert = Some(message.into());
        true
    }

    fn begin_lookup(&mut self, code: String, origin: LookupOrigin) -> CoreResult<Effect> {
        self.inline_error = None;
        self.state = WorkflowState::LookingUp {
            code: code.clone(),
            origin,
        };
        Ok(Effect::Lookup { code, origin })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn purchase_list(&self) -> &PurchaseList {
        &self.list
    }

    /// The fetched product on screen, added or not.
    pub fn candidate(&self) -> Option<&Product> {
        match &self.state {
            WorkflowState::HasCandidate { product, .. } => Some(product),
            _ => None,
        }
    }

    /// Whether the "追加" button is enabled.
    pub fn can_add(&self) -> bool {
        self.alert.is_none()
            && matches!(
                self.state,
                WorkflowState::HasCandidate {
                    auto_added: false,
                    ..
                }
            )
    }

    /// Whether the "購入" button is enabled.
    pub fn can_purchase(&self) -> bool {
        self.alert.is_none()
            && !self.is_processing
            && !self.list.is_empty()
            && matches!(
                self.state,
                WorkflowState::Idle
                    | WorkflowState::ManualEntry
                    | WorkflowState::HasCandidate { .. }
            )
    }

    /// The capture device must be held open exactly while this is true.
    pub fn is_scanning(&self) -> bool {
        matches!(self.state, WorkflowState::Scanning)
    }

    pub fn is_manual_entry(&self) -> bool {
        matches!(self.state, WorkflowState::ManualEntry)
    }

    /// A purchase submission is in flight.
    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Validation / lookup error shown under the code panel.
    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    /// Text currently in the manual entry field.
    pub fn manual_code(&self) -> &str {
        &self.manual_code
    }

    /// Code panel text: candidate code, else last scanned code, else dashes.
    pub fn code_display(&self) -> &str {
        self.candidate()
            .map(|p| p.code.as_str())
            .or(self.scanned_code.as_deref())
            .unwrap_or(CODE_PLACEHOLDER)
    }

    /// The modal on screen, if any.
    pub fn modal(&self) -> Option<Modal> {
        if let Some(message) = &self.alert {
            return Some(Modal::Error {
                message: message.clone(),
            });
        }

        match &self.state {
            WorkflowState::Scanning => Some(Modal::Scanner),
            WorkflowState::Confirming { error } => Some(Modal::Confirm {
                total_with_tax: self.list.total_with_tax(),
                error: error.clone(),
                submitting: false,
            }),
            WorkflowState::Submitting => Some(Modal::Confirm {
                total_with_tax: self.list.total_with_tax(),
                error: None,
                submitting: true,
            }),
            WorkflowState::Complete { receipt, received } => Some(Modal::Receipt {
                receipt: receipt.clone(),
                received: *received,
            }),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product() -> Product {
        Product {
            id: 1,
            code: "4901234567894".to_string(),
            name: "Test Item".to_string(),
            price: Yen::new(1000),
        }
    }

    fn product_priced(id: i64, price: i64) -> Product {
        Product {
            id,
            code: format!("code-{}", id),
            name: format!("Item {}", id),
            price: Yen::new(price),
        }
    }

    /// Scan `product` and let the lookup succeed.
    fn scan(workflow: &mut Workflow, product: Product) {
        workflow.apply(Event::StartScan).unwrap();
        workflow
            .apply(Event::Decoded(product.code.clone()))
            .unwrap();
        workflow.apply(Event::LookupSucceeded(product)).unwrap();
    }

    fn workflow_with(prices: &[i64]) -> Workflow {
        let mut workflow = Workflow::new();
        for (i, price) in prices.iter().enumerate() {
            scan(&mut workflow, product_priced(i as i64 + 1, *price));
        }
        workflow
    }

    #[test]
    fn test_scan_triggers_lookup_and_releases_scanner() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::StartScan).unwrap();
        assert!(workflow.is_scanning());
        assert_eq!(workflow.modal(), Some(Modal::Scanner));

        let effect = workflow
            .apply(Event::Decoded("4901234567894".to_string()))
            .unwrap();
        assert_eq!(
            effect,
            Effect::Lookup {
                code: "4901234567894".to_string(),
                origin: LookupOrigin::Scan,
            }
        );
        assert!(!workflow.is_scanning());
        assert_eq!(workflow.code_display(), "4901234567894");
    }

    #[test]
    fn test_scan_success_auto_adds_once() {
        let mut workflow = Workflow::new();
        scan(&mut workflow, test_product());

        assert_eq!(workflow.purchase_list().len(), 1);
        assert_eq!(workflow.candidate(), Some(&test_product()));
        assert!(!workflow.can_add());
        assert_eq!(
            workflow.apply(Event::AddCandidate),
            Err(CoreError::AlreadyAdded)
        );
        assert_eq!(workflow.purchase_list().len(), 1);
    }

    #[test]
    fn test_duplicate_scans_are_separate_entries() {
        let mut workflow = Workflow::new();
        scan(&mut workflow, test_product());
        scan(&mut workflow, test_product());

        assert_eq!(workflow.purchase_list().len(), 2);
        assert_eq!(workflow.purchase_list().total(), Yen::new(2000));
    }

    #[test]
    fn test_manual_lookup_requires_explicit_add() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::OpenManualEntry).unwrap();
        let effect = workflow
            .apply(Event::SearchManual(" 4901234567894 ".to_string()))
            .unwrap();
        assert_eq!(
            effect,
            Effect::Lookup {
                code: "4901234567894".to_string(),
                origin: LookupOrigin::Manual,
            }
        );

        workflow
            .apply(Event::LookupSucceeded(test_product()))
            .unwrap();
        assert!(workflow.purchase_list().is_empty());
        assert!(workflow.can_add());
        assert_eq!(workflow.manual_code(), "");
        assert!(!workflow.is_manual_entry());

        workflow.apply(Event::AddCandidate).unwrap();
        assert_eq!(workflow.purchase_list().len(), 1);
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert_eq!(workflow.candidate(), None);
        assert_eq!(workflow.code_display(), CODE_PLACEHOLDER);
    }

    #[test]
    fn test_empty_manual_code_is_rejected_without_lookup() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::OpenManualEntry).unwrap();

        let effect = workflow.apply(Event::SearchManual("   ".to_string())).unwrap();
        assert_eq!(effect, Effect::None);
        assert_eq!(workflow.inline_error(), Some("商品情報を入力してください"));
        assert!(workflow.is_manual_entry());
        assert_eq!(workflow.modal(), None);
    }

    #[test]
    fn test_successful_lookup_clears_prior_error() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::OpenManualEntry).unwrap();
        workflow.apply(Event::SearchManual("0000".to_string())).unwrap();
        workflow
            .apply(Event::LookupFailed(LookupFailure::NotFound))
            .unwrap();
        assert_eq!(workflow.inline_error(), Some("商品が見つかりませんでした"));
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert_eq!(workflow.manual_code(), "0000");

        workflow.apply(Event::OpenManualEntry).unwrap();
        workflow
            .apply(Event::SearchManual("4901234567894".to_string()))
            .unwrap();
        assert_eq!(workflow.inline_error(), None);
        workflow
            .apply(Event::LookupSucceeded(test_product()))
            .unwrap();
        assert_eq!(workflow.inline_error(), None);
        assert_eq!(workflow.candidate(), Some(&test_product()));
    }

    #[test]
    fn test_lookup_failures_are_inline() {
        for (failure, message) in [
            (LookupFailure::NotFound, "商品が見つかりませんでした"),
            (LookupFailure::Failed, "商品の取得に失敗しました"),
            (LookupFailure::Unreachable, "APIサーバーに接続できませんでした"),
        ] {
            let mut workflow = Workflow::new();
            workflow.apply(Event::StartScan).unwrap();
            workflow.apply(Event::Decoded("123".to_string())).unwrap();
            workflow.apply(Event::LookupFailed(failure)).unwrap();

            assert_eq!(workflow.state(), &WorkflowState::Idle);
            assert_eq!(workflow.inline_error(), Some(message));
            assert_eq!(workflow.modal(), None);
            assert!(workflow.purchase_list().is_empty());
        }
    }

    #[test]
    fn test_camera_failure_shows_blocking_modal_and_exits_scanning() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::StartScan).unwrap();
        workflow
            .apply(Event::CameraFailed("permission denied".to_string()))
            .unwrap();

        assert!(!workflow.is_scanning());
        assert_eq!(
            workflow.modal(),
            Some(Modal::Error {
                message: "カメラの起動に失敗しました: permission denied".to_string()
            })
        );

        // Blocking: nothing else until dismissed.
        assert!(matches!(
            workflow.apply(Event::StartScan),
            Err(CoreError::InvalidTransition { .. })
        ));
        workflow.apply(Event::DismissAlert).unwrap();
        assert_eq!(workflow.modal(), None);
        workflow.apply(Event::StartScan).unwrap();
    }

    #[test]
    fn test_purchase_disabled_when_list_empty() {
        let mut workflow = Workflow::new();
        assert!(!workflow.can_purchase());
        assert_eq!(
            workflow.apply(Event::PurchaseClicked),
            Err(CoreError::EmptyPurchaseList)
        );
        assert_eq!(workflow.state(), &WorkflowState::Idle);
    }

    #[test]
    fn test_confirm_shows_tax_inclusive_total() {
        let mut workflow = workflow_with(&[1000, 500]);
        assert_eq!(workflow.purchase_list().total().to_string(), "¥1,500");

        workflow.apply(Event::PurchaseClicked).unwrap();
        match workflow.modal() {
            Some(Modal::Confirm {
                total_with_tax,
                error,
                submitting,
            }) => {
                assert_eq!(total_with_tax.grouped(), "1,650");
                assert_eq!(
                    workflow.purchase_list().total().tax_inclusive_label(),
                    "1,650円 (税込)"
                );
                assert_eq!(error, None);
                assert!(!submitting);
            }
            other => panic!("expected confirm modal, got {:?}", other),
        }
    }

    #[test]
    fn test_confirm_submits_exactly_once() {
        let mut workflow = workflow_with(&[1000, 500]);
        workflow.apply(Event::PurchaseClicked).unwrap();

        let effect = workflow.apply(Event::ConfirmPurchase).unwrap();
        match effect {
            Effect::Submit(items) => assert_eq!(items.len(), 2),
            other => panic!("expected submit, got {:?}", other),
        }
        assert!(workflow.is_processing());
        assert!(!workflow.can_purchase());

        assert_eq!(
            workflow.apply(Event::ConfirmPurchase),
            Err(CoreError::SubmissionInFlight)
        );
        assert_eq!(
            workflow.apply(Event::PurchaseClicked),
            Err(CoreError::SubmissionInFlight)
        );
    }

    #[test]
    fn test_purchase_failure_keeps_list_and_reenables_submit() {
        let mut workflow = workflow_with(&[1000, 500]);
        workflow.apply(Event::PurchaseClicked).unwrap();
        workflow.apply(Event::ConfirmPurchase).unwrap();
        workflow
            .apply(Event::PurchaseFailed("stock exhausted".to_string()))
            .unwrap();

        assert!(!workflow.is_processing());
        assert_eq!(workflow.purchase_list().len(), 2);
        assert_eq!(
            workflow.state(),
            &WorkflowState::Confirming {
                error: Some("stock exhausted".to_string())
            }
        );

        // Retry is allowed straight from the dialog.
        let effect = workflow.apply(Event::ConfirmPurchase).unwrap();
        assert!(matches!(effect, Effect::Submit(_)));
    }

    #[test]
    fn test_receipt_dismissal_resets_transaction() {
        let mut workflow = workflow_with(&[1000, 500]);
        workflow.apply(Event::PurchaseClicked).unwrap();
        workflow.apply(Event::ConfirmPurchase).unwrap();
        let receipt = TransactionResult {
            transaction_id: 7,
            total_amount: Yen::new(1500),
        };
        workflow
            .apply(Event::PurchaseSucceeded(receipt.clone()))
            .unwrap();

        assert!(!workflow.is_processing());
        workflow.apply(Event::ToggleReceived).unwrap();
        assert_eq!(
            workflow.modal(),
            Some(Modal::Receipt {
                receipt,
                received: true
            })
        );

        workflow.apply(Event::DismissReceipt).unwrap();
        assert!(workflow.purchase_list().is_empty());
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert_eq!(workflow.modal(), None);
        assert!(!workflow.is_processing());
    }

    #[test]
    fn test_cancel_purchase_returns_to_idle_with_list() {
        let mut workflow = workflow_with(&[300]);
        workflow.apply(Event::PurchaseClicked).unwrap();
        workflow.apply(Event::CancelPurchase).unwrap();
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert_eq!(workflow.purchase_list().len(), 1);
    }

    #[test]
    fn test_invalid_transition_leaves_state_untouched() {
        let mut workflow = workflow_with(&[300]);
        workflow.apply(Event::PurchaseClicked).unwrap();
        let before = workflow.state().clone();

        let err = workflow.apply(Event::StartScan).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                state: "confirming",
                event: "start-scan",
            }
        );
        assert_eq!(workflow.state(), &before);
    }

    #[test]
    fn test_late_decode_after_cancel_is_rejected() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::StartScan).unwrap();
        workflow.apply(Event::CancelScan).unwrap();
        assert!(matches!(
            workflow.apply(Event::Decoded("123".to_string())),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_overflowing_price_is_rejected_at_add() {
        let half = i64::MAX / 2 + 1;
        let mut workflow = workflow_with(&[half]);

        scan(&mut workflow, product_priced(2, half));
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert_eq!(workflow.purchase_list().len(), 1);
        assert_eq!(
            workflow.inline_error(),
            Some("合計金額が上限を超えるため追加できません")
        );

        workflow.apply(Event::OpenManualEntry).unwrap();
        workflow.apply(Event::SearchManual("code-3".to_string())).unwrap();
        workflow
            .apply(Event::LookupSucceeded(product_priced(3, half)))
            .unwrap();
        assert_eq!(
            workflow.apply(Event::AddCandidate),
            Err(CoreError::AmountOverflow)
        );
        assert!(matches!(
            workflow.state(),
            WorkflowState::HasCandidate { auto_added: false, .. }
        ));
        assert_eq!(workflow.purchase_list().len(), 1);
    }

    #[test]
    fn test_blank_decode_is_inline_validation_error() {
        let mut workflow = Workflow::new();
        workflow.apply(Event::StartScan).unwrap();
        let effect = workflow
            .apply(Event::Decoded(" \t ".to_string()))
            .unwrap();
        assert_eq!(effect, Effect::None);
        assert_eq!(workflow.state(), &WorkflowState::Idle);
        assert!(workflow.inline_error().is_some());
    }

    #[test]
    fn test_raise_alert_never_stacks_modals() {
        let mut workflow = Workflow::new();
        let err = workflow.apply(Event::PurchaseClicked).unwrap_err();
        assert!(workflow.raise_alert(err.to_string()));
        assert_eq!(
            workflow.modal(),
            Some(Modal::Error {
                message: "商品がリストに追加されていません".to_string()
            })
        );
        assert!(!workflow.raise_alert("second"));
        workflow.apply(Event::DismissAlert).unwrap();

        workflow.apply(Event::StartScan).unwrap();
        assert!(!workflow.raise_alert("hidden"));
        assert_eq!(workflow.modal(), Some(Modal::Scanner));
    }

    #[test]
    fn test_at_most_one_modal() {
        let mut workflow = workflow_with(&[1000]);
        assert_eq!(workflow.modal(), None);
        workflow.apply(Event::PurchaseClicked).unwrap();
        assert!(matches!(workflow.modal(), Some(Modal::Confirm { .. })));
        workflow.apply(Event::ConfirmPurchase).unwrap();
        assert!(matches!(
            workflow.modal(),
            Some(Modal::Confirm {
                submitting: true,
                ..
            })
        ));
    }
}
