//! # Barcode Capture Device
//!
//! Adapter between a barcode capture device and the purchase workflow.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Capture Session Lifecycle                            │
//! │                                                                         │
//! │  workflow.is_scanning() == true                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decoder.acquire() ──► CameraStream ──► ScanEvent::Decoded(code)       │
//! │       │                     │           ScanEvent::Failed(reason)      │
//! │       │ Err(CameraError)    │                                           │
//! │       ▼                     │ dropped as soon as scanning ends          │
//! │  Event::CameraFailed        ▼ (decode, cancel, failure, navigation)    │
//! │                        device fd closed in Drop, nothing left reading  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Image decoding is not done here. A device is anything that already emits
//! decoded text: a serial / HID tty or a FIFO that carries one code per
//! line, or a keyboard-wedge scanner that types into the terminal.
//!
//! Device reads are readiness-based (non-blocking fd registered with the
//! reactor), so a dropped session never has a read in flight that could eat
//! the first code of the next session.

use std::io;
#[cfg(unix)]
use std::io::ErrorKind;
#[cfg(unix)]
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
#[cfg(unix)]
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
#[cfg(unix)]
use tokio::net::unix::pipe;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Buffered decodes between a keyboard wedge and the controller.
const SCAN_CHANNEL_CAPACITY: usize = 16;

const DEVICE_CLOSED: &str = "device closed";

// =============================================================================
// Errors & Events
// =============================================================================

/// Why the capture device could not be started.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("device error: {0}")]
    Io(#[from] io::Error),
}

/// Output of a running capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Decoded(String),
    Failed(String),
}

// =============================================================================
// Camera Stream (RAII session)
// =============================================================================

#[derive(Debug)]
enum Source {
    Channel(mpsc::Receiver<ScanEvent>),
    #[cfg(unix)]
    Device(Lines<BufReader<pipe::Receiver>>),
}

/// An open capture session. Dropping it releases the device.
#[derive(Debug)]
pub struct CameraStream {
    source: Source,
}

impl CameraStream {
    /// A session fed through a channel.
    pub fn new(events: mpsc::Receiver<ScanEvent>) -> Self {
        CameraStream {
            source: Source::Channel(events),
        }
    }

    #[cfg(unix)]
    fn from_device(device: pipe::Receiver) -> Self {
        CameraStream {
            source: Source::Device(BufReader::new(device).lines()),
        }
    }

    /// Next decode or failure. A closed device reads as a failure.
    ///
    /// Cancel safe: dropping the future before it resolves loses no code.
    pub async fn next(&mut self) -> ScanEvent {
        match &mut self.source {
            Source::Channel(events) => events
                .recv()
                .await
                .unwrap_or_else(|| ScanEvent::Failed(DEVICE_CLOSED.to_string())),
            #[cfg(unix)]
            Source::Device(lines) => loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let code = line.trim();
                        if code.is_empty() {
                            continue;
                        }
                        debug!(code = %code, "Barcode decoded");
                        return ScanEvent::Decoded(code.to_string());
                    }
                    Ok(None) => return ScanEvent::Failed(DEVICE_CLOSED.to_string()),
                    Err(e) => {
                        warn!(error = %e, "Capture device read failed");
                        return ScanEvent::Failed(e.to_string());
                    }
                }
            },
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        debug!("Capture session released");
    }
}

// =============================================================================
// Decoder Trait
// =============================================================================

/// A source of decoded barcodes.
pub trait BarcodeDecoder {
    /// Opens the device and starts a session.
    fn acquire(&mut self) -> Result<CameraStream, CameraError>;

    /// Offers a line typed into the terminal while scanning.
    ///
    /// Returns `true` if the decoder took it as a scan.
    fn feed(&mut self, _line: &str) -> bool {
        false
    }

    /// Short description for the log and the scanner overlay.
    fn describe(&self) -> String;
}

// =============================================================================
// Device Scanner
// =============================================================================

/// Reads one code per line from a character device or FIFO.
#[derive(Debug, Clone)]
pub struct DeviceScanner {
    path: PathBuf,
}

impl DeviceScanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DeviceScanner { path: path.into() }
    }
}

impl BarcodeDecoder for DeviceScanner {
    #[cfg(unix)]
    fn acquire(&mut self) -> Result<CameraStream, CameraError> {
        let device = open_device(&self.path)?;
        info!(device = %self.path.display(), "Capture device opened");
        Ok(CameraStream::from_device(device))
    }

    #[cfg(not(unix))]
    fn acquire(&mut self) -> Result<CameraStream, CameraError> {
        Err(CameraError::Unavailable(format!(
            "{}: device scanners need a unix tty",
            self.path.display()
        )))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(unix)]
fn device_error(path: &Path, err: io::Error) -> CameraError {
    match err.kind() {
        ErrorKind::PermissionDenied => CameraError::PermissionDenied(path.display().to_string()),
        ErrorKind::NotFound => CameraError::Unavailable(path.display().to_string()),
        _ => CameraError::Io(err),
    }
}

/// Opens `path` non-blocking and registers it with the reactor.
#[cfg(unix)]
fn open_device(path: &Path) -> Result<pipe::Receiver, CameraError> {
    use std::os::unix::fs::FileTypeExt;

    let file_type = std::fs::metadata(path)
        .map_err(|e| device_error(path, e))?
        .file_type();
    if !(file_type.is_char_device() || file_type.is_fifo()) {
        return Err(CameraError::Unavailable(format!(
            "{} is not a character device or FIFO",
            path.display()
        )));
    }

    let mut options = pipe::OpenOptions::new();
    options.unchecked(true);
    // A FIFO with no writer reads as end-of-file. Holding our own write end
    // keeps the session open until a scanner process attaches.
    #[cfg(target_os = "linux")]
    options.read_write(file_type.is_fifo());

    options
        .open_receiver(path)
        .map_err(|e| device_error(path, e))
}

// =============================================================================
// Keyboard Wedge
// =============================================================================

/// A scanner that types codes into the terminal followed by Enter.
///
/// While a session is open, lines the shell does not recognise as commands
/// are fed here and come back out of the stream as decodes.
#[derive(Debug, Default)]
pub struct KeyboardWedge {
    session: Option<mpsc::Sender<ScanEvent>>,
}

impl KeyboardWedge {
    pub fn new() -> Self {
        KeyboardWedge::default()
    }
}

impl BarcodeDecoder for KeyboardWedge {
    fn acquire(&mut self) -> Result<CameraStream, CameraError> {
        let (tx, rx) = mpsc::channel(SCAN_CHANNEL_CAPACITY);
        self.session = Some(tx);
        Ok(CameraStream::new(rx))
    }

    fn feed(&mut self, line: &str) -> bool {
        let code = line.trim();
        if code.is_empty() {
            return false;
        }
        match &self.session {
            Some(tx) if !tx.is_closed() => tx.try_send(ScanEvent::Decoded(code.to_string())).is_ok(),
            _ => {
                self.session = None;
                false
            }
        }
    }

    fn describe(&self) -> String {
        "keyboard wedge".to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
