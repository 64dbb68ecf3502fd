//! Runtime configuration loaded from the environment.

use std::path::PathBuf;

use page_printer::{CupsOptions, PaperSize, cups::default_spool_dir};
use placement::{DeviceMetrics, PrintDefaults};

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration: call-level defaults and printer fallbacks.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub unit: String,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
    pub printer_name: Option<String>,
    pub fallback_dpi: u32,
    pub fallback_paper: PaperSize,
    pub spool_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            unit: "cm".into(),
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            printer_name: None,
            fallback_dpi: 300,
            fallback_paper: PaperSize::letter(),
            spool_dir: default_spool_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// Missing or empty keys take their default. Invalid values are logged
    /// and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String {
            let default = get_default(key).unwrap_or("");
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    let value = value.trim().to_string();
                    match validate_setting(key, &value) {
                        Ok(()) => value,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid {key}={value:?}: {e}");
                            default.to_string()
                        }
                    }
                }
                None => default.to_string(),
            }
        };

        let spool_dir = g("SPOOL_DIR");
        let printer_name = g("PRINTER_NAME");

        Self {
            unit: g("PRINT_UNIT"),
            horizontal_offset: parse_f64(&g("PRINT_HORIZONTAL_OFFSET"), 0.0),
            vertical_offset: parse_f64(&g("PRINT_VERTICAL_OFFSET"), 0.0),
            printer_name: (!printer_name.is_empty()).then_some(printer_name),
            fallback_dpi: parse_u32(&g("FALLBACK_DPI"), 300),
            fallback_paper: PaperSize::from_name(&g("FALLBACK_PAPER"))
                .unwrap_or_else(|_| PaperSize::letter()),
            spool_dir: if spool_dir.is_empty() {
                default_spool_dir()
            } else {
                PathBuf::from(spool_dir)
            },
        }
    }

    /// Call-level defaults seeded from configuration.
    pub fn print_defaults(&self) -> PrintDefaults {
        let mut defaults = PrintDefaults::new()
            .with_unit(self.unit.clone())
            .with_horizontal_offset(self.horizontal_offset)
            .with_vertical_offset(self.vertical_offset);
        defaults.printer = self.printer_name.clone();
        defaults
    }

    pub fn cups_options(&self) -> CupsOptions {
        CupsOptions {
            fallback_dpi: self.fallback_dpi,
            fallback_paper: self.fallback_paper.clone(),
            spool_dir: self.spool_dir.clone(),
        }
    }

    /// Metrics of the fallback printer, for dry runs and offline planning.
    pub fn fallback_metrics(&self) -> DeviceMetrics {
        let ppi = (self.fallback_dpi, self.fallback_dpi);
        DeviceMetrics::new(ppi, self.fallback_paper.to_device_pixels(ppi))
    }
}

fn parse_f64(s: &str, default: f64) -> f64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u32(s: &str, default: u32) -> u32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = load(&[]);
        assert_eq!(config.unit, "cm");
        assert_eq!(config.horizontal_offset, 0.0);
        assert_eq!(config.vertical_offset, 0.0);
        assert_eq!(config.printer_name, None);
        assert_eq!(config.fallback_dpi, 300);
        assert_eq!(config.fallback_paper, PaperSize::letter());
        assert_eq!(config.spool_dir, default_spool_dir());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = load(&[
            ("PRINT_UNIT", "inch"),
            ("PRINT_VERTICAL_OFFSET", " 1.5 "),
            ("PRINTER_NAME", "Office_Laser"),
            ("FALLBACK_DPI", "600"),
            ("FALLBACK_PAPER", "A4"),
            ("SPOOL_DIR", "/var/spool/image-print"),
        ]);
        assert_eq!(config.unit, "inch");
        assert_eq!(config.vertical_offset, 1.5);
        assert_eq!(config.printer_name.as_deref(), Some("Office_Laser"));
        assert_eq!(config.fallback_dpi, 600);
        assert_eq!(config.fallback_paper.name, "A4");
        assert_eq!(config.spool_dir, PathBuf::from("/var/spool/image-print"));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = load(&[
            ("PRINT_UNIT", "furlong"),
            ("FALLBACK_DPI", "1"),
            ("FALLBACK_PAPER", "Napkin"),
        ]);
        assert_eq!(config.unit, "cm");
        assert_eq!(config.fallback_dpi, 300);
        assert_eq!(config.fallback_paper, PaperSize::letter());
    }

    #[test]
    fn print_defaults_carry_config() {
        let config = load(&[("PRINT_UNIT", "inch"), ("PRINTER_NAME", "Office_Laser")]);
        let defaults = config.print_defaults();
        assert_eq!(defaults.unit, "inch");
        assert_eq!(defaults.printer.as_deref(), Some("Office_Laser"));
        assert_eq!(defaults.width, None);
        assert_eq!(defaults.height, None);
    }

    #[test]
    fn fallback_metrics_use_paper_and_dpi() {
        let config = load(&[]);
        assert_eq!(
            config.fallback_metrics(),
            DeviceMetrics::new((300, 300), (2550, 3300))
        );
    }
}
