//! Setting value validation.

use std::sync::LazyLock;

use page_printer::PaperSize;
use regex::Regex;

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PRINT_UNIT" => {
            if value != "cm" && value != "inch" {
                return Err("must be 'cm' or 'inch'".into());
            }
        }
        "PRINT_HORIZONTAL_OFFSET" | "PRINT_VERTICAL_OFFSET" => {
            if !RE_NUMBER.is_match(value) {
                return Err("must be a number".into());
            }
        }
        "PRINTER_NAME" => {
            if value.len() > 255 {
                return Err("printer name must be at most 255 characters".into());
            }
        }
        "FALLBACK_DPI" => validate_int_range(value, 72, 4800)?,
        "FALLBACK_PAPER" => {
            PaperSize::from_name(value).map_err(|e| e.to_string())?;
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_must_be_known() {
        assert!(validate_setting("PRINT_UNIT", "inch").is_ok());
        assert!(validate_setting("PRINT_UNIT", "mm").is_err());
    }

    #[test]
    fn offsets_must_be_numbers() {
        assert!(validate_setting("PRINT_VERTICAL_OFFSET", "-2.5").is_ok());
        assert!(validate_setting("PRINT_VERTICAL_OFFSET", "2cm").is_err());
    }

    #[test]
    fn dpi_range() {
        assert!(validate_setting("FALLBACK_DPI", "600").is_ok());
        assert_eq!(
            validate_setting("FALLBACK_DPI", "10"),
            Err("must be between 72 and 4800".to_string())
        );
        assert!(validate_setting("FALLBACK_DPI", "high").is_err());
    }

    #[test]
    fn paper_names() {
        assert!(validate_setting("FALLBACK_PAPER", "A4").is_ok());
        assert!(validate_setting("FALLBACK_PAPER", "Custom.100x150mm").is_ok());
        assert!(validate_setting("FALLBACK_PAPER", "Napkin").is_err());
    }

    #[test]
    fn unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
