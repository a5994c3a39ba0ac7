//! # Workflow Controller
//!
//! Runs the I/O the pure [`Workflow`] asks for and keeps the capture device
//! in step with it.
//!
//! ## Dispatch Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Dispatch Loop                                   │
//! │                                                                         │
//! │  clerk / device event                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  workflow.apply(event) ──► Effect::None ──► done                       │
//! │       │      ▲                                                          │
//! │       │      │ LookupSucceeded / LookupFailed                          │
//! │       │      │ PurchaseSucceeded / PurchaseFailed                      │
//! │       ▼      │                                                          │
//! │  Effect::Lookup ──► api.lookup_product                                 │
//! │  Effect::Submit ──► api.submit_purchase                                │
//! │                                                                         │
//! │  after every transition: reconcile_camera()                            │
//! │    scanning && no session  → acquire (failure → CameraFailed)          │
//! │    !scanning && session    → drop session (device released)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests run to completion before the next clerk input is read, so there
//! is never more than one request in flight.

use std::future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use eventpos_client::PosApi;
use eventpos_core::{
    CoreError, CoreResult, Effect, Event, LookupOrigin, Product, RegisterIdentity, Workflow,
};

use crate::camera::{BarcodeDecoder, CameraStream, ScanEvent};
use crate::error::AppError;

/// Owns the workflow, the API handle and the capture session.
pub struct WorkflowController {
    workflow: Workflow,
    api: Arc<dyn PosApi>,
    identity: RegisterIdentity,
    decoder: Box<dyn BarcodeDecoder>,
    session: Option<CameraStream>,
}

impl WorkflowController {
    pub fn new(
        api: Arc<dyn PosApi>,
        identity: RegisterIdentity,
        decoder: Box<dyn BarcodeDecoder>,
    ) -> Self {
        WorkflowController {
            workflow: Workflow::new(),
            api,
            identity,
            decoder,
            session: None,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn identity(&self) -> &RegisterIdentity {
        &self.identity
    }

    pub fn scanner_description(&self) -> String {
        self.decoder.describe()
    }

    /// Whether a capture session is open right now.
    pub fn has_camera_session(&self) -> bool {
        self.session.is_some()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Applies a clerk action.
    ///
    /// Rejections that mean "this button is disabled" come back as `Some`
    /// for a one-line notice. Business-rule rejections (empty list, already
    /// added, ...) are raised as the error modal instead.
    pub async fn perform(&mut self, event: Event) -> Option<AppError> {
        match self.dispatch(event).await {
            Ok(()) => None,
            Err(err @ CoreError::InvalidTransition { .. }) => Some(AppError::from(err)),
            Err(err) => {
                let err = AppError::from(err);
                if self.workflow.raise_alert(err.message.clone()) {
                    None
                } else {
                    Some(err)
                }
            }
        }
    }

    /// Applies an event and runs effects until the workflow settles.
    pub async fn dispatch(&mut self, event: Event) -> CoreResult<()> {
        let mut effect = self.apply(event)?;
        loop {
            let outcome = match effect {
                Effect::None => return Ok(()),
                Effect::Lookup { code, origin } => self.lookup(code, origin).await,
                Effect::Submit(products) => self.submit(products).await,
            };
            effect = self.apply(outcome)?;
        }
    }

    fn apply(&mut self, event: Event) -> CoreResult<Effect> {
        let name = event.name();
        let from = self.workflow.state().name();
        let result = self.workflow.apply(event);

        match &result {
            Ok(_) => debug!(
                event = name,
                from,
                to = self.workflow.state().name(),
                "Workflow transition"
            ),
            Err(err) => debug!(event = name, state = from, error = %err, "Workflow event rejected"),
        }

        self.reconcile_camera();
        result
    }

    async fn lookup(&self, code: String, origin: LookupOrigin) -> Event {
        match self.api.lookup_product(&code).await {
            Ok(product) => Event::LookupSucceeded(product),
            Err(err) => {
                warn!(code = %code, ?origin, error = %err, "Lookup failed");
                Event::LookupFailed(err.lookup_failure())
            }
        }
    }

    async fn submit(&self, products: Vec<Product>) -> Event {
        match self.api.submit_purchase(&self.identity, &products).await {
            Ok(receipt) => {
                info!(transaction_id = receipt.transaction_id, "Purchase accepted");
                Event::PurchaseSucceeded(receipt)
            }
            Err(err) => {
                warn!(error = %err, "Purchase failed");
                Event::PurchaseFailed(err.purchase_message())
            }
        }
    }

    // =========================================================================
    // Capture Device
    // =========================================================================

    /// Opens or drops the capture session to match the scanning flag.
    fn reconcile_camera(&mut self) {
        match (self.workflow.is_scanning(), self.session.is_some()) {
            (true, false) => match self.decoder.acquire() {
                Ok(stream) => {
                    info!(scanner = %self.decoder.describe(), "Capture session started");
                    self.session = Some(stream);
                }
                Err(err) => {
                    warn!(scanner = %self.decoder.describe(), error = %err, "Capture device failed");
                    // Scanning → Idle, so nothing further to reconcile.
                    if let Err(rejected) =
                        self.workflow.apply(Event::CameraFailed(err.to_string()))
                    {
                        warn!(error = %rejected, "Camera failure was not applied");
                    }
                }
            },
            (false, true) => {
                self.session = None;
            }
            _ => {}
        }
    }

    /// Waits for the next device output. Never resolves without a session.
    pub async fn next_scan(&mut self) -> ScanEvent {
        match self.session.as_mut() {
            Some(stream) => stream.next().await,
            None => future::pending().await,
        }
    }

    /// Feeds a device output into the workflow.
    pub async fn handle_scan(&mut self, scan: ScanEvent) -> Option<AppError> {
        let event = match scan {
            ScanEvent::Decoded(code) => Event::Decoded(code),
            ScanEvent::Failed(reason) => Event::CameraFailed(reason),
        };
        self.perform(event).await
    }

    /// Offers a typed line to a keyboard-wedge scanner.
    pub fn feed_scanner(&mut self, line: &str) -> bool {
        self.session.is_some() && self.decoder.feed(line)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
