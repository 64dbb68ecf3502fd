//! Paper sizes and their extent in device pixels.

use std::sync::LazyLock;

use regex::Regex;

use crate::{PrinterError, Result};

const MM_PER_INCH: f64 = 25.4;

/// Named sizes as `(name, width_in, height_in)`, portrait.
const KNOWN_PAPERS: &[(&str, f64, f64)] = &[
    ("Letter", 8.5, 11.0),
    ("Legal", 8.5, 14.0),
    ("Executive", 7.25, 10.5),
    ("Tabloid", 11.0, 17.0),
    ("Ledger", 11.0, 17.0),
    ("A3", 297.0 / MM_PER_INCH, 420.0 / MM_PER_INCH),
    ("A4", 210.0 / MM_PER_INCH, 297.0 / MM_PER_INCH),
    ("A5", 148.0 / MM_PER_INCH, 210.0 / MM_PER_INCH),
    ("B5", 176.0 / MM_PER_INCH, 250.0 / MM_PER_INCH),
];

static RE_CUSTOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Custom\.(\d+(?:\.\d+)?)x(\d+(?:\.\d+)?)(mm|cm|in)$").unwrap()
});

/// A physical paper size.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperSize {
    /// CUPS media name, e.g. `A4` or `Custom.100x150mm`.
    pub name: String,
    pub width_in: f64,
    pub height_in: f64,
}

impl PaperSize {
    pub fn letter() -> Self {
        Self {
            name: "Letter".into(),
            width_in: 8.5,
            height_in: 11.0,
        }
    }

    /// Look up a CUPS media name.
    ///
    /// Named sizes match case-insensitively and ignore CUPS variant
    /// suffixes such as `.Fullbleed`. `Custom.WxH` accepts `mm`, `cm` and
    /// `in` suffixes.
    pub fn from_name(name: &str) -> Result<Self> {
        if let Some(caps) = RE_CUSTOM.captures(name) {
            let w: f64 = caps[1]
                .parse()
                .map_err(|_| PrinterError::UnknownPaper(name.to_string()))?;
            let h: f64 = caps[2]
                .parse()
                .map_err(|_| PrinterError::UnknownPaper(name.to_string()))?;
            let per_inch = match &caps[3] {
                "mm" => MM_PER_INCH,
                "cm" => MM_PER_INCH / 10.0,
                _ => 1.0,
            };
            if w <= 0.0 || h <= 0.0 {
                return Err(PrinterError::UnknownPaper(name.to_string()));
            }
            return Ok(Self {
                name: name.to_string(),
                width_in: w / per_inch,
                height_in: h / per_inch,
            });
        }

        let base = name.split('.').next().unwrap_or(name);
        KNOWN_PAPERS
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(base))
            .map(|&(known, width_in, height_in)| Self {
                name: known.to_string(),
                width_in,
                height_in,
            })
            .ok_or_else(|| PrinterError::UnknownPaper(name.to_string()))
    }

    /// Page extent in device pixels at the given resolution.
    pub fn to_device_pixels(&self, pixels_per_inch: (u32, u32)) -> (u32, u32) {
        let (ppi_x, ppi_y) = pixels_per_inch;
        (
            (self.width_in * f64::from(ppi_x)).round() as u32,
            (self.height_in * f64::from(ppi_y)).round() as u32,
        )
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::letter()
    }
}
