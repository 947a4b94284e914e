//! Hardware model resolution.
//!
//! The model family comes from the chassis `Type` field when present,
//! from the version section's hint when it validates, and otherwise from
//! model digits embedded in the device identifier.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Sentinel for devices whose model could not be determined.
pub const UNCLASSIFIED: &str = "Unclassified";

lazy_static! {
    /// Valid model string: `7` plus three digits, then the family suffix
    /// (`7750 SR-12`, `7210 SAS-K 2F4T6C`).
    static ref MODEL_SHAPE_RE: Regex = Regex::new(r"(7\d{3}\s+\S+(?:\s+\S+)*)").unwrap();

    /// `7xxx` at the start of a candidate type string.
    static ref MODEL_PREFIX_RE: Regex = Regex::new(r"^7\d{3}").unwrap();

    /// Model digits embedded in a device identifier, separator variants
    /// ordered most common first.
    static ref ID_MODEL_PATTERNS: Vec<Regex> = vec![
        // Digits delimited by non-digits or string edges (BAQ_CLR_7210_01).
        Regex::new(r"(?:^|[^0-9])(7\d{3})(?:[^0-9]|$)").unwrap(),
        // Hyphenated model (7210-SAS).
        Regex::new(r"(7\d{3})-([A-Za-z]+)").unwrap(),
        // Underscored model (7210_SAS).
        Regex::new(r"(7\d{3})_([A-Za-z]+)").unwrap(),
    ];

    /// Model digits to canonical family name. One entry per prefix; the
    /// source data never maps the same digits to two families.
    static ref MODEL_FAMILIES: HashMap<&'static str, &'static str> = HashMap::from([
        ("7210", "7210 SAS"),
        ("7220", "7220 VPLS"),
        ("7250", "7250 IXR"),
        ("7302", "7302 ISAM"),
        ("7330", "7330 ISAM"),
        ("7360", "7360 ISAM"),
        ("7368", "7368 ISAM"),
        ("7450", "7450 ESS"),
        ("7510", "7510 SAR"),
        ("7520", "7520 SAR"),
        ("7705", "7705 SAR"),
        ("7710", "7710 SR"),
        ("7740", "7740 SR"),
        ("7750", "7750 SR"),
        ("7950", "7950 XRS"),
    ]);
}

/// True when `device_type` starts with a valid model prefix (`7xxx`).
pub fn validate_device_type(device_type: &str) -> bool {
    MODEL_PREFIX_RE.is_match(device_type)
}

/// Validate a chassis `Type` value and return the model portion.
///
/// Vendor strings sometimes prepend noise before the model; only the
/// `7xxx ...` tail is kept. Returns `None` for non-Nokia shapes.
pub fn model_from_chassis_type(chassis_type: &str) -> Option<String> {
    MODEL_SHAPE_RE
        .captures(chassis_type)
        .map(|caps| caps[1].trim().to_string())
}

/// Derive the model family from the device identifier alone.
///
/// Tries the embedded-digit patterns in order; a recognized prefix maps to
/// its canonical family, an unrecognized but validly-shaped prefix passes
/// through as bare digits, and no match yields [`UNCLASSIFIED`].
pub fn device_type_from_id(device_id: &str) -> String {
    for pattern in ID_MODEL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(device_id) {
            let model = &caps[1];
            return MODEL_FAMILIES
                .get(model)
                .map(|family| family.to_string())
                .unwrap_or_else(|| model.to_string());
        }
    }
    UNCLASSIFIED.to_string()
}

/// Full resolution chain: chassis type, then the version-section hint,
/// then the identifier fallback. The hint is only trusted when it
/// validates as a model string.
pub fn resolve_device_type(
    chassis_type: Option<&str>,
    version_hint: Option<&str>,
    device_id: &str,
) -> String {
    if let Some(model) = chassis_type.and_then(model_from_chassis_type) {
        return model;
    }
    if let Some(hint) = version_hint {
        let hint = hint.trim();
        if validate_device_type(hint) {
            return hint.to_string();
        }
    }
    device_type_from_id(device_id)
}
