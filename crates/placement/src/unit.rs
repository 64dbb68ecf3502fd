//! Physical units for printed sizes and offsets.

use std::fmt;
use std::str::FromStr;

use crate::PlacementError;

/// Centimeters in one inch.
pub const CM_PER_INCH: f64 = 2.54;

/// A physical length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Cm,
    Inch,
}

impl Unit {
    /// How many of this unit make up one inch.
    pub fn per_inch(self) -> f64 {
        match self {
            Unit::Cm => CM_PER_INCH,
            Unit::Inch => 1.0,
        }
    }

    /// Convert a physical length to device pixels at the given resolution.
    pub fn to_device_pixels(self, value: f64, pixels_per_inch: u32) -> f64 {
        value * f64::from(pixels_per_inch) / self.per_inch()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Cm => "cm",
            Unit::Inch => "inch",
        }
    }
}

impl FromStr for Unit {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(Unit::Cm),
            "inch" => Ok(Unit::Inch),
            other => Err(PlacementError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_units() {
        assert_eq!("cm".parse::<Unit>().unwrap(), Unit::Cm);
        assert_eq!("inch".parse::<Unit>().unwrap(), Unit::Inch);
    }

    #[test]
    fn rejects_unknown_units() {
        for bad in ["mm", "in", "CM", "Inch", ""] {
            let err = bad.parse::<Unit>().unwrap_err();
            assert!(
                matches!(err, PlacementError::InvalidUnit(ref u) if u == bad),
                "unexpected error for {bad:?}: {err}"
            );
        }
    }

    #[test]
    fn converts_to_device_pixels() {
        assert!((Unit::Inch.to_device_pixels(2.0, 300) - 600.0).abs() < 1e-9);
        assert!((Unit::Cm.to_device_pixels(2.54, 300) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn display_matches_parse_input() {
        assert_eq!(Unit::Cm.to_string(), "cm");
        assert_eq!(Unit::Inch.to_string(), "inch");
    }
}
