//! Device-pixel rectangles.

use std::fmt;

/// Destination rectangle in device pixels.
///
/// Coordinates are signed: offsets may push an image partly or wholly off
/// the page. `x1`/`y1` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl Rect {
    pub fn from_origin_size(x0: i64, y0: i64, width: i64, height: i64) -> Self {
        Self {
            x0,
            y0,
            x1: x0 + width,
            y1: y0 + height,
        }
    }

    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Part of this rectangle that lies on a page of the given size.
    pub fn clip_to_page(&self, page_width: u32, page_height: u32) -> Option<Rect> {
        let clipped = Rect {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(i64::from(page_width)),
            y1: self.y1.min(i64::from(page_height)),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x0, self.y0, self.x1, self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_size_sets_far_corner() {
        let r = Rect::from_origin_size(979, 1502, 591, 295);
        assert_eq!(r.x1, 1570);
        assert_eq!(r.y1, 1797);
        assert_eq!(r.width(), 591);
        assert_eq!(r.height(), 295);
    }

    #[test]
    fn clip_inside_page_is_identity() {
        let r = Rect::from_origin_size(10, 10, 20, 20);
        assert_eq!(r.clip_to_page(100, 100), Some(r));
    }

    #[test]
    fn clip_trims_overhang() {
        let r = Rect::from_origin_size(-5, 90, 20, 20);
        let clipped = r.clip_to_page(100, 100).unwrap();
        assert_eq!(clipped, Rect { x0: 0, y0: 90, x1: 15, y1: 100 });
    }

    #[test]
    fn clip_off_page_is_none() {
        let r = Rect::from_origin_size(200, 0, 20, 20);
        assert_eq!(r.clip_to_page(100, 100), None);
        assert_eq!(Rect::from_origin_size(0, 0, 0, 5).clip_to_page(100, 100), None);
    }

    #[test]
    fn display_lists_corners() {
        assert_eq!(Rect::from_origin_size(1, 2, 3, 4).to_string(), "(1, 2, 4, 6)");
    }
}
