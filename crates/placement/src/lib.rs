//! Print-page placement for raster images.
//!
//! Turns image pixel dimensions, a requested physical size and physical
//! offsets into the device-pixel rectangle an image occupies on a printed
//! page. Images are centered on the page unless offset.

pub mod geometry;
pub mod metrics;
pub mod plan;
pub mod request;
pub mod unit;

// Re-exports for convenience
pub use geometry::Rect;
pub use metrics::DeviceMetrics;
pub use plan::{Placement, place_image, plan_placements};
pub use request::{ImageSource, ImageSpec, PrintDefaults, ResolvedSpec};
pub use unit::Unit;

/// Errors raised while resolving and placing images.
///
/// Any of these aborts the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unit should be 'cm' or 'inch', not {0:?}")]
    InvalidUnit(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid device metrics: {0}")]
    InvalidDevice(String),
}

/// Result type alias for placement operations.
pub type Result<T> = std::result::Result<T, PlacementError>;
