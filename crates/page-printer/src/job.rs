//! Print job runner.

use placement::{ImageSpec, PrintDefaults, Rect, plan_placements};
use tracing::info;

use crate::Result;
use crate::cups::{CupsDevice, CupsOptions};
use crate::device::DeviceContext;

/// Document title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "image-print";

/// Place every image and draw them onto one page of `device`.
///
/// All placements are computed before the document is opened, so a bad
/// request fails without leaving a partially drawn job. Images are drawn in
/// input order; later images cover earlier ones. The device is released when
/// this returns, whatever the outcome.
pub fn print_images<D, I>(
    mut device: D,
    images: I,
    defaults: &PrintDefaults,
    title: &str,
) -> Result<Vec<Rect>>
where
    D: DeviceContext,
    I: IntoIterator<Item = ImageSpec>,
{
    let metrics = device.metrics();
    let placements = plan_placements(images, defaults, &metrics)?;
    info!(count = placements.len(), title, "Placements computed, drawing page");

    device.start_doc(title)?;
    device.start_page()?;
    for placement in &placements {
        device.draw(&placement.image, placement.rect)?;
    }
    device.end_page()?;
    device.end_doc()?;

    Ok(placements.into_iter().map(|p| p.rect).collect())
}

/// Print to the printer named in `defaults`, or the system default.
pub fn print_to_printer<I>(
    images: I,
    defaults: &PrintDefaults,
    options: &CupsOptions,
    title: &str,
) -> Result<Vec<Rect>>
where
    I: IntoIterator<Item = ImageSpec>,
{
    let device = CupsDevice::open(defaults.printer.as_deref(), options)?;
    print_images(device, images, defaults, title)
}
