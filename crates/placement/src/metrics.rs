//! Device capabilities read from a printer before placement.

use crate::{PlacementError, Result};

/// Resolution and physical page size of a device context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceMetrics {
    /// Device pixels per inch, `(x, y)`.
    pub pixels_per_inch: (u32, u32),
    /// Physical page size in device pixels, `(width, height)`.
    pub page_size: (u32, u32),
}

impl DeviceMetrics {
    pub fn new(pixels_per_inch: (u32, u32), page_size: (u32, u32)) -> Self {
        Self {
            pixels_per_inch,
            page_size,
        }
    }

    /// Reject metrics that would make the placement arithmetic meaningless.
    pub fn validate(&self) -> Result<()> {
        let (ppi_x, ppi_y) = self.pixels_per_inch;
        if ppi_x == 0 || ppi_y == 0 {
            return Err(PlacementError::InvalidDevice(format!(
                "resolution must be non-zero, got {ppi_x}x{ppi_y}"
            )));
        }
        let (w, h) = self.page_size;
        if w == 0 || h == 0 {
            return Err(PlacementError::InvalidDevice(format!(
                "page size must be non-zero, got {w}x{h}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_at_300_dpi_is_valid() {
        let m = DeviceMetrics::new((300, 300), (2550, 3300));
        assert!(m.validate().is_ok());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let m = DeviceMetrics::new((0, 300), (2550, 3300));
        assert!(matches!(m.validate(), Err(PlacementError::InvalidDevice(_))));
    }

    #[test]
    fn zero_page_is_rejected() {
        let m = DeviceMetrics::new((300, 300), (2550, 0));
        assert!(matches!(m.validate(), Err(PlacementError::InvalidDevice(_))));
    }
}
