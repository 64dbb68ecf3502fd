//! Printing of placed images onto a device context.
//!
//! Provides the [`DeviceContext`] seam, an in-memory raster page, a
//! CUPS-backed printer device, and the job runner that validates every
//! placement before a document is opened.

pub mod cups;
pub mod device;
pub mod job;
pub mod paper;
pub mod raster;

// Re-exports for convenience
pub use cups::{CupsDevice, CupsOptions, SystemPrinter};
pub use device::DeviceContext;
pub use job::{DEFAULT_TITLE, print_images, print_to_printer};
pub use paper::PaperSize;
pub use raster::RasterDevice;

use placement::PlacementError;

/// Errors that can occur while printing.
#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("No default printer configured")]
    NoDefaultPrinter,

    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    #[error("{program} failed: {message}")]
    Command { program: String, message: String },

    #[error("Unknown paper size: {0}")]
    UnknownPaper(String),

    #[error("Device call out of sequence: {0}")]
    Sequence(&'static str),

    #[error("Drawing region too large: {0}")]
    Oversize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for printer operations.
pub type Result<T> = std::result::Result<T, PrinterError>;
