//! The device context a job draws into.

use image::DynamicImage;
use placement::{DeviceMetrics, Rect};

use crate::Result;

/// A printing surface: exposes its capabilities and accepts draw calls.
///
/// Calls follow `start_doc`, `start_page`, any number of `draw`,
/// `end_page`, `end_doc`. The context is released when dropped, on every
/// exit path.
pub trait DeviceContext {
    /// Resolution and physical page size, read before placement.
    fn metrics(&self) -> DeviceMetrics;

    fn start_doc(&mut self, title: &str) -> Result<()>;

    fn start_page(&mut self) -> Result<()>;

    /// Draw `image` scaled into `rect`. Parts outside the page are clipped.
    fn draw(&mut self, image: &DynamicImage, rect: Rect) -> Result<()>;

    fn end_page(&mut self) -> Result<()>;

    fn end_doc(&mut self) -> Result<()>;
}

impl<D: DeviceContext + ?Sized> DeviceContext for &mut D {
    fn metrics(&self) -> DeviceMetrics {
        (**self).metrics()
    }

    fn start_doc(&mut self, title: &str) -> Result<()> {
        (**self).start_doc(title)
    }

    fn start_page(&mut self) -> Result<()> {
        (**self).start_page()
    }

    fn draw(&mut self, image: &DynamicImage, rect: Rect) -> Result<()> {
        (**self).draw(image, rect)
    }

    fn end_page(&mut self) -> Result<()> {
        (**self).end_page()
    }

    fn end_doc(&mut self) -> Result<()> {
        (**self).end_doc()
    }
}
