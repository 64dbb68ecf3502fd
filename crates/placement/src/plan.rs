//! Placement calculator: resolved specs to device-pixel rectangles.

use image::DynamicImage;
use tracing::debug;

use crate::geometry::Rect;
use crate::metrics::DeviceMetrics;
use crate::request::{ImageSpec, PrintDefaults, ResolvedSpec};
use crate::unit::Unit;
use crate::{PlacementError, Result};

/// A decoded image paired with the rectangle it is drawn into.
#[derive(Debug, Clone)]
pub struct Placement {
    pub image: DynamicImage,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Pick the single axis whose physical size drives the scale.
fn sizing_axis(width: Option<f64>, height: Option<f64>) -> Result<(Axis, f64)> {
    let (axis, size) = match (width, height) {
        (Some(w), None) => (Axis::Horizontal, w),
        (None, Some(h)) => (Axis::Vertical, h),
        (None, None) => {
            return Err(PlacementError::InvalidConfiguration(
                "neither width nor height specified".into(),
            ));
        }
        (Some(_), Some(_)) => {
            return Err(PlacementError::InvalidConfiguration(
                "width and height specified".into(),
            ));
        }
    };
    if !size.is_finite() || size <= 0.0 {
        return Err(PlacementError::InvalidConfiguration(format!(
            "printed size must be a positive number, got {size}"
        )));
    }
    Ok((axis, size))
}

/// Compute where one resolved image lands on the page.
///
/// Checks run in a fixed order: size configuration, unit, offsets, then the
/// image itself, so a path is only decoded once the request is known to be
/// well formed.
pub fn place_image(spec: ResolvedSpec, metrics: &DeviceMetrics) -> Result<Placement> {
    let (axis, size) = sizing_axis(spec.width, spec.height)?;
    let unit: Unit = spec.unit.parse()?;

    if !spec.horizontal_offset.is_finite() || !spec.vertical_offset.is_finite() {
        return Err(PlacementError::InvalidConfiguration(format!(
            "offsets must be finite, got ({}, {})",
            spec.horizontal_offset, spec.vertical_offset
        )));
    }

    let (ppi_x, ppi_y) = metrics.pixels_per_inch;
    let offset_x = unit.to_device_pixels(spec.horizontal_offset, ppi_x);
    let offset_y = unit.to_device_pixels(spec.vertical_offset, ppi_y);

    let image = spec.image.load()?;
    let (img_w, img_h) = (image.width(), image.height());

    let scale = match axis {
        Axis::Horizontal => size * f64::from(ppi_x) / f64::from(img_w) / unit.per_inch(),
        Axis::Vertical => size * f64::from(ppi_y) / f64::from(img_h) / unit.per_inch(),
    };

    let scaled_w = (scale * f64::from(img_w)).round() as i64;
    let scaled_h = (scale * f64::from(img_h)).round() as i64;

    let (page_w, page_h) = metrics.page_size;
    // Truncate toward zero, matching integer conversion of the centered origin.
    let x0 = (offset_x + (f64::from(page_w) - scaled_w as f64) / 2.0).trunc() as i64;
    let y0 = (offset_y + (f64::from(page_h) - scaled_h as f64) / 2.0).trunc() as i64;

    let rect = Rect::from_origin_size(x0, y0, scaled_w, scaled_h);
    debug!(
        img_w,
        img_h,
        scale,
        unit = unit.as_str(),
        x0 = rect.x0,
        y0 = rect.y0,
        x1 = rect.x1,
        y1 = rect.y1,
        "Computed image placement"
    );

    Ok(Placement { image, rect })
}

/// Resolve and place every image, preserving input order.
///
/// The first failure aborts the batch; no placements are returned.
pub fn plan_placements<I>(
    images: I,
    defaults: &PrintDefaults,
    metrics: &DeviceMetrics,
) -> Result<Vec<Placement>>
where
    I: IntoIterator<Item = ImageSpec>,
{
    metrics.validate()?;
    images
        .into_iter()
        .enumerate()
        .map(|(index, spec)| {
            place_image(spec.resolve(defaults), metrics).inspect_err(|e| {
                debug!(index, error = %e, "Placement failed");
            })
        })
        .collect()
}
