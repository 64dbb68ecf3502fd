//! In-memory raster page.
//!
//! Composes placed images onto a white RGB page the size of the device's
//! physical page. Backs dry runs and the CUPS device, which spools the
//! finished page.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};
use placement::{DeviceMetrics, Rect};
use tracing::debug;

use crate::device::DeviceContext;
use crate::{PrinterError, Result};

const PAPER_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocState {
    Idle,
    Open,
    Drawing,
    Finished,
}

/// A device context that draws into an [`RgbImage`].
#[derive(Debug)]
pub struct RasterDevice {
    metrics: DeviceMetrics,
    page: RgbImage,
    title: Option<String>,
    state: DocState,
}

impl RasterDevice {
    pub fn new(metrics: DeviceMetrics) -> Self {
        let (w, h) = metrics.page_size;
        Self {
            metrics,
            page: RgbImage::from_pixel(w, h, PAPER_WHITE),
            title: None,
            state: DocState::Idle,
        }
    }

    /// Title given to the most recent document.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether a complete document has been produced.
    pub fn is_finished(&self) -> bool {
        self.state == DocState::Finished
    }

    pub fn page(&self) -> &RgbImage {
        &self.page
    }

    /// Write the finished page as PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if self.state != DocState::Finished {
            return Err(PrinterError::Sequence("page saved before end_doc"));
        }
        self.page.save_with_format(path, image::ImageFormat::Png)?;
        debug!(path = %path.display(), "Saved raster page");
        Ok(())
    }
}

impl RasterDevice {
    /// Shrink only the part of the source that lands inside `visible`.
    ///
    /// The cropped window is resampled to the span it covers at the
    /// rectangle's scale, which is at most a couple of pixels wider than the
    /// visible region.
    fn draw_reduced(
        &mut self,
        image: &DynamicImage,
        rect: Rect,
        visible: Rect,
        (step_x, step_y): (f64, f64),
    ) -> Result<()> {
        let (img_w, img_h) = image.dimensions();
        let (src_x0, src_x1) = source_span(visible.x0 - rect.x0, visible.x1 - rect.x0, step_x, img_w);
        let (src_y0, src_y1) = source_span(visible.y0 - rect.y0, visible.y1 - rect.y0, step_y, img_h);

        let dst_x0 = rect.x0 + (f64::from(src_x0) / step_x).round() as i64;
        let dst_y0 = rect.y0 + (f64::from(src_y0) / step_y).round() as i64;
        let dst_x1 = rect.x0 + (f64::from(src_x1) / step_x).round() as i64;
        let dst_y1 = rect.y0 + (f64::from(src_y1) / step_y).round() as i64;
        let dst_w = scratch_len(dst_x1 - dst_x0, rect)?;
        let dst_h = scratch_len(dst_y1 - dst_y0, rect)?;

        let scaled = image
            .crop_imm(src_x0, src_y0, src_x1 - src_x0, src_y1 - src_y0)
            .resize_exact(dst_w, dst_h, FilterType::Lanczos3)
            .to_rgba8();

        for y in visible.y0..visible.y1 {
            for x in visible.x0..visible.x1 {
                let (u, v) = (x - dst_x0, y - dst_y0);
                if u < 0 || v < 0 || u >= i64::from(dst_w) || v >= i64::from(dst_h) {
                    continue;
                }
                let src = scaled.get_pixel(u as u32, v as u32);
                let dst = self.page.get_pixel_mut(x as u32, y as u32);
                *dst = blend_pixel(dst, src);
            }
        }
        Ok(())
    }

    /// Enlarge by sampling the nearest source pixel for each visible pixel.
    fn draw_enlarged(
        &mut self,
        image: &DynamicImage,
        rect: Rect,
        visible: Rect,
        (step_x, step_y): (f64, f64),
    ) {
        let (img_w, img_h) = image.dimensions();
        for y in visible.y0..visible.y1 {
            let v = nearest_source(y - rect.y0, step_y, img_h);
            for x in visible.x0..visible.x1 {
                let u = nearest_source(x - rect.x0, step_x, img_w);
                let src = image.get_pixel(u, v);
                let dst = self.page.get_pixel_mut(x as u32, y as u32);
                *dst = blend_pixel(dst, &src);
            }
        }
    }
}

/// Source pixel range covering destination offsets `from..to` of a rectangle.
fn source_span(from: i64, to: i64, step: f64, len: u32) -> (u32, u32) {
    let limit = f64::from(len);
    let start = (from as f64 * step).floor().clamp(0.0, limit - 1.0) as u32;
    let end = (to as f64 * step).ceil().clamp(f64::from(start + 1), limit) as u32;
    (start, end)
}

fn nearest_source(offset: i64, step: f64, len: u32) -> u32 {
    ((offset as f64 + 0.5) * step)
        .floor()
        .clamp(0.0, f64::from(len - 1)) as u32
}

fn scratch_len(span: i64, rect: Rect) -> Result<u32> {
    u32::try_from(span.max(1))
        .map_err(|_| PrinterError::Oversize(format!("{span} px scratch span for {rect}")))
}

impl DeviceContext for RasterDevice {
    fn metrics(&self) -> DeviceMetrics {
        self.metrics
    }

    fn start_doc(&mut self, title: &str) -> Result<()> {
        if matches!(self.state, DocState::Open | DocState::Drawing) {
            return Err(PrinterError::Sequence("start_doc inside an open document"));
        }
        let (w, h) = self.metrics.page_size;
        self.page = RgbImage::from_pixel(w, h, PAPER_WHITE);
        self.title = Some(title.to_string());
        self.state = DocState::Open;
        Ok(())
    }

    fn start_page(&mut self) -> Result<()> {
        if self.state != DocState::Open {
            return Err(PrinterError::Sequence("start_page outside a document"));
        }
        self.state = DocState::Drawing;
        Ok(())
    }

    fn draw(&mut self, image: &DynamicImage, rect: Rect) -> Result<()> {
        if self.state != DocState::Drawing {
            return Err(PrinterError::Sequence("draw outside a page"));
        }
        let (page_w, page_h) = self.page.dimensions();
        let Some(visible) = rect.clip_to_page(page_w, page_h) else {
            debug!(%rect, "Image lies entirely off the page, skipping");
            return Ok(());
        };

        debug!(%rect, %visible, "Drawing image onto page");

        let (img_w, img_h) = image.dimensions();
        if img_w == 0 || img_h == 0 {
            return Ok(());
        }
        // Source pixels per destination pixel along each axis.
        let step_x = f64::from(img_w) / rect.width() as f64;
        let step_y = f64::from(img_h) / rect.height() as f64;
        if step_x >= 1.0 && step_y >= 1.0 {
            self.draw_reduced(image, rect, visible, (step_x, step_y))
        } else {
            self.draw_enlarged(image, rect, visible, (step_x, step_y));
            Ok(())
        }
    }

    fn end_page(&mut self) -> Result<()> {
        if self.state != DocState::Drawing {
            return Err(PrinterError::Sequence("end_page without start_page"));
        }
        self.state = DocState::Open;
        Ok(())
    }

    fn end_doc(&mut self) -> Result<()> {
        if self.state != DocState::Open {
            return Err(PrinterError::Sequence("end_doc without an open document"));
        }
        self.state = DocState::Finished;
        Ok(())
    }
}

fn blend_pixel(bg: &Rgb<u8>, fg: &Rgba<u8>) -> Rgb<u8> {
    let alpha = f32::from(fg[3]) / 255.0;
    if alpha > 0.99 {
        return Rgb([fg[0], fg[1], fg[2]]);
    }
    if alpha < 0.01 {
        return *bg;
    }
    let inv = 1.0 - alpha;
    Rgb([
        (f32::from(fg[0]) * alpha + f32::from(bg[0]) * inv) as u8,
        (f32::from(fg[1]) * alpha + f32::from(bg[1]) * inv) as u8,
        (f32::from(fg[2]) * alpha + f32::from(bg[2]) * inv) as u8,
    ])
}
