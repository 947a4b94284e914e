//! Site resolution from device naming conventions.
//!
//! Device identifiers embed a 3-letter site code by convention
//! (`BAQ_CLR_7210_01`, `CAL0284`, `WOM_VDP_03338`). Extraction tolerates
//! the known layout variants; normalization maps codes to canonical
//! city names.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Placeholder prefix used when the field crew left no site in the hostname.
pub const PLACEHOLDER_CODE: &str = "WOM";

/// Normalized value for the placeholder code. Not a city; the dashboard
/// surfaces it as a data-quality flag.
pub const PLACEHOLDER_SITE: &str = "Hostname error, needs verification";

lazy_static! {
    /// Leading 3-letter code followed directly by digits (`CAL0284`).
    static ref CODE_DIGITS_RE: Regex = Regex::new(r"^([A-Z]{3})\d+").unwrap();

    /// Site code to canonical city name.
    static ref CITY_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("ATL", "Atlántico"),
        ("BQL", "Barranquilla"),
        ("BAR", "Barranquilla"),
        ("BTA", "Bogotá"),
        ("CAR", "Cartagena"),
        ("CLI", "Cali"),
        ("COL", "Colombia"),
        ("IBG", "Ibagué"),
        ("MTR", "Montería"),
        ("NAR", "Nariño"),
        ("PAL", "Palmira"),
        ("PAN", "Panamá"),
        ("SAT", "Santa Marta"),
        ("VAC", "Valledupar"),
        ("VVC", "Villavicencio"),
        ("BAQ", "Barranquilla"),
        ("BGA", "Bucaramanga"),
        ("BOG", "Bogotá"),
        ("CAL", "Cali"),
        ("CLO", "Cali"),
        ("CTG", "Cartagena"),
        ("CUC", "Cúcuta"),
        ("IBE", "Ibagué"),
        ("MON", "Montería"),
        ("PPN", "Popayán"),
        ("SBL", "Sincelejo"),
        ("SIN", "Sincelejo"),
        ("BUC", "Bucaramanga"),
        ("PAS", "Pasto"),
        ("SMA", "Santa Marta"),
        ("SMT", "Santa Marta"),
        ("VDP", "Valledupar"),
        ("VUP", "Valledupar"),
        ("MED", "Medellín"),
        ("PER", "Pereira"),
        ("MAN", "Manizales"),
        ("VIL", "Villavicencio"),
        ("NEI", "Neiva"),
        ("ARM", "Armenia"),
        ("POP", "Popayán"),
        ("VAL", "Valledupar"),
        ("TUN", "Tunja"),
        ("BUE", "Buenaventura"),
        ("QUI", "Quibdó"),
        ("RIO", "Riohacha"),
        ("YOP", "Yopal"),
        ("FLO", "Florencia"),
        ("MOC", "Mocoa"),
        ("LET", "Leticia"),
        ("MIT", "Mitú"),
        ("PTO", "Puerto Carreño"),
        ("INI", "Inírida"),
        ("SJG", "San José del Guaviare"),
    ]);
}

/// Extract the site code from a device identifier.
///
/// Rules, in order:
/// 1. The bare placeholder (`WOM`) keeps the placeholder code.
/// 2. `WOM_XXX_...` takes the segment after the placeholder when it looks
///    like a site code (3 chars), else falls back to the placeholder.
/// 3. Underscore-delimited ids (`XXX_YYY_...`) take the first segment when
///    it is 3 chars.
/// 4. Otherwise a leading `XXX<digits>` run (`CAL0284`) yields the letters.
///
/// Returns `None` when no rule applies.
pub fn extract_site_code(device_id: &str) -> Option<String> {
    let id = device_id.trim().to_uppercase();
    if id.is_empty() {
        return None;
    }

    if id == PLACEHOLDER_CODE {
        return Some(PLACEHOLDER_CODE.to_string());
    }

    if let Some(rest) = id.strip_prefix("WOM_") {
        let segment = rest.split('_').next().unwrap_or("");
        if segment.len() == 3 {
            return Some(segment.to_string());
        }
        return Some(PLACEHOLDER_CODE.to_string());
    }

    if id.contains('_') {
        let first = id.split('_').next().unwrap_or("");
        if first.len() == 3 {
            return Some(first.to_string());
        }
    }

    if let Some(caps) = CODE_DIGITS_RE.captures(&id) {
        return Some(caps[1].to_string());
    }

    None
}

/// Normalize a site code to its canonical city name.
///
/// The placeholder code maps to [`PLACEHOLDER_SITE`]; codes missing from
/// the table pass through unchanged rather than failing.
pub fn normalize_site(code: &str) -> Option<String> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return None;
    }

    if code == PLACEHOLDER_CODE {
        return Some(PLACEHOLDER_SITE.to_string());
    }

    Some(
        CITY_NAMES
            .get(code.as_str())
            .map(|name| name.to_string())
            .unwrap_or(code),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_format() {
        assert_eq!(extract_site_code("BAQ_CLR_7210_01").as_deref(), Some("BAQ"));
        assert_eq!(extract_site_code("BOG_TRC_7750_02").as_deref(), Some("BOG"));
    }

    #[test]
    fn test_code_digits_format() {
        assert_eq!(extract_site_code("CAL0284").as_deref(), Some("CAL"));
        // Underscore variant with a long first segment falls through to
        // the leading-code rule.
        assert_eq!(extract_site_code("CAL0284_BACKUP").as_deref(), Some("CAL"));
    }

    #[test]
    fn test_placeholder_prefix() {
        assert_eq!(extract_site_code("WOM_VDP_03338").as_deref(), Some("VDP"));
        assert_eq!(extract_site_code("WOM_1234").as_deref(), Some("WOM"));
        assert_eq!(extract_site_code("WOM").as_deref(), Some("WOM"));
    }

    #[test]
    fn test_lowercase_input() {
        assert_eq!(extract_site_code("baq_clr_7210_01").as_deref(), Some("BAQ"));
    }

    #[test]
    fn test_unextractable() {
        assert_eq!(extract_site_code(""), None);
        assert_eq!(extract_site_code("X1_NODE"), None);
        assert_eq!(extract_site_code("ROUTER"), None);
    }

    #[test]
    fn test_normalize_known_codes() {
        assert_eq!(normalize_site("BAQ").as_deref(), Some("Barranquilla"));
        assert_eq!(normalize_site("BOG").as_deref(), Some("Bogotá"));
        assert_eq!(normalize_site("cuc").as_deref(), Some("Cúcuta"));
    }

    #[test]
    fn test_normalize_placeholder() {
        assert_eq!(normalize_site("WOM").as_deref(), Some(PLACEHOLDER_SITE));
    }

    #[test]
    fn test_normalize_unknown_passthrough() {
        assert_eq!(normalize_site("ZZZ").as_deref(), Some("ZZZ"));
        assert_eq!(normalize_site(""), None);
    }

    #[test]
    fn test_end_to_end_resolution() {
        let code = extract_site_code("BAQ_CLR_7210_01").unwrap();
        assert_eq!(normalize_site(&code).as_deref(), Some("Barranquilla"));
    }
}
