//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("PRINT_UNIT", "cm", "Unit for sizes and offsets: cm or inch"),
    ("PRINT_HORIZONTAL_OFFSET", "0", "Default horizontal offset from page center"),
    ("PRINT_VERTICAL_OFFSET", "0", "Default vertical offset from page center"),
    ("PRINTER_NAME", "", "Target printer; empty selects the system default"),
    ("FALLBACK_DPI", "300", "Resolution used when the printer does not report one"),
    ("FALLBACK_PAPER", "Letter", "Paper used when the printer does not report one"),
    ("SPOOL_DIR", "", "Directory for spool files; empty uses the user cache dir"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// One line per setting, in definition order, for the `settings` command.
pub fn describe_settings() -> Vec<String> {
    DEFS.iter()
        .filter_map(|&(key, _, _)| DEFAULT_SETTINGS.get(key))
        .map(|def| {
            let default = if def.default.is_empty() { "(unset)" } else { def.default };
            format!("{:<24} {:<10} {}", def.key, default, def.description)
        })
        .collect()
}
