//! Per-image override records and call-level defaults.
//!
//! An [`ImageSpec`] carries an image plus optional overrides. Any field left
//! unset inherits the matching value from [`PrintDefaults`] when the image spec is
//! resolved.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::{PlacementError, Result};

/// Where the bitmap for a placement comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An already decoded bitmap.
    Bitmap(DynamicImage),
    /// A file decoded on demand.
    Path(PathBuf),
}

impl ImageSource {
    /// Decode (if needed) and check the bitmap is usable.
    pub fn load(self) -> Result<DynamicImage> {
        let img = match self {
            ImageSource::Bitmap(img) => img,
            ImageSource::Path(path) => image::open(&path).map_err(|e| {
                PlacementError::InvalidImage(format!("{}: {e}", path.display()))
            })?,
        };
        if img.width() == 0 || img.height() == 0 {
            return Err(PlacementError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                img.width(),
                img.height()
            )));
        }
        Ok(img)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Bitmap(img)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

/// An image to print, with optional per-image overrides.
#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub image: ImageSource,
    /// Printed width in `unit`.
    pub width: Option<f64>,
    /// Printed height in `unit`.
    pub height: Option<f64>,
    /// Shift right from the centered position, in `unit`.
    pub horizontal_offset: Option<f64>,
    /// Shift down from the centered position, in `unit`.
    pub vertical_offset: Option<f64>,
    /// `"cm"` or `"inch"`. Checked when the image is placed.
    pub unit: Option<String>,
}

impl ImageSpec {
    /// Create a spec with every override unset.
    pub fn new(image: impl Into<ImageSource>) -> Self {
        Self {
            image: image.into(),
            width: None,
            height: None,
            horizontal_offset: None,
            vertical_offset: None,
            unit: None,
        }
    }

    /// Builder: set printed width.
    pub fn with_width(mut self, val: f64) -> Self {
        self.width = Some(val);
        self
    }

    /// Builder: set printed height.
    pub fn with_height(mut self, val: f64) -> Self {
        self.height = Some(val);
        self
    }

    /// Builder: set horizontal offset.
    pub fn with_horizontal_offset(mut self, val: f64) -> Self {
        self.horizontal_offset = Some(val);
        self
    }

    /// Builder: set vertical offset.
    pub fn with_vertical_offset(mut self, val: f64) -> Self {
        self.vertical_offset = Some(val);
        self
    }

    /// Builder: set unit.
    pub fn with_unit(mut self, val: impl Into<String>) -> Self {
        self.unit = Some(val.into());
        self
    }

    /// Fill unset fields from `defaults`, field by field.
    pub fn resolve(self, defaults: &PrintDefaults) -> ResolvedSpec {
        ResolvedSpec {
            image: self.image,
            width: self.width.or(defaults.width),
            height: self.height.or(defaults.height),
            horizontal_offset: self.horizontal_offset.unwrap_or(defaults.horizontal_offset),
            vertical_offset: self.vertical_offset.unwrap_or(defaults.vertical_offset),
            unit: self.unit.unwrap_or_else(|| defaults.unit.clone()),
        }
    }
}

impl From<ImageSource> for ImageSpec {
    fn from(image: ImageSource) -> Self {
        ImageSpec::new(image)
    }
}

impl From<DynamicImage> for ImageSpec {
    fn from(image: DynamicImage) -> Self {
        ImageSpec::new(image)
    }
}

impl From<PathBuf> for ImageSpec {
    fn from(path: PathBuf) -> Self {
        ImageSpec::new(path)
    }
}

impl From<&Path> for ImageSpec {
    fn from(path: &Path) -> Self {
        ImageSpec::new(path)
    }
}

impl From<&str> for ImageSpec {
    fn from(path: &str) -> Self {
        ImageSpec::new(path)
    }
}

/// Call-level defaults shared by every image in a print call.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintDefaults {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
    pub unit: String,
    /// Target printer; `None` selects the system default.
    pub printer: Option<String>,
}

impl Default for PrintDefaults {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            unit: "cm".into(),
            printer: None,
        }
    }
}

impl PrintDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set default width.
    pub fn with_width(mut self, val: f64) -> Self {
        self.width = Some(val);
        self
    }

    /// Builder: set default height.
    pub fn with_height(mut self, val: f64) -> Self {
        self.height = Some(val);
        self
    }

    /// Replace the default sizing axis when either size is given.
    ///
    /// Width and height come from the same layer: an inherited width does
    /// not survive a newly supplied height, and vice versa. Supplying both
    /// keeps both, which the calculator rejects.
    pub fn override_size(&mut self, width: Option<f64>, height: Option<f64>) {
        if width.is_some() || height.is_some() {
            self.width = width;
            self.height = height;
        }
    }

    /// Builder: set default horizontal offset.
    pub fn with_horizontal_offset(mut self, val: f64) -> Self {
        self.horizontal_offset = val;
        self
    }

    /// Builder: set default vertical offset.
    pub fn with_vertical_offset(mut self, val: f64) -> Self {
        self.vertical_offset = val;
        self
    }

    /// Builder: set default unit.
    pub fn with_unit(mut self, val: impl Into<String>) -> Self {
        self.unit = val.into();
        self
    }

    /// Builder: set target printer.
    pub fn with_printer(mut self, val: impl Into<String>) -> Self {
        self.printer = Some(val.into());
        self
    }
}

/// A spec after defaults have been applied.
#[derive(Debug, Clone)]
pub struct ResolvedSpec {
    pub image: ImageSource,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
    pub unit: String,
}
