//! Service-code extraction.
//!
//! NOC exports tag every service with its `CI`/`CO` tracking code when one
//! can be recovered from the id or the resolved description. The rules
//! are layered and ordered; later rules are fallbacks, never alternatives.

use lazy_static::lazy_static;
use regex::Regex;

/// Sentinel for services with no recoverable tracking code.
pub const NO_ID: &str = "No ID";

lazy_static! {
    /// Rule 1: explicit code, prefix plus 6+ digits.
    static ref EXPLICIT_CODE_RE: Regex = Regex::new(r"(?i)(CI|CO)\d{6,}").unwrap();
    /// Rule 2: bare digit run long enough to be a code body.
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d{6,}").unwrap();
    /// Rule 4: minimum digit content for a plausible id.
    static ref SHORT_DIGIT_RUN_RE: Regex = Regex::new(r"\d{3,}").unwrap();
}

/// Substrings that mark a value as a protocol or management label rather
/// than a tracking code.
const DENY_LIST: [&str; 5] = ["COM", "VPLS", "EPIPE", "_tmnx_", "GESTION"];

/// Extract the `CI`/`CO` tracking code for a service.
///
/// Checks the service id first, then the description, at each rule:
/// 1. Explicit `CI`/`CO` code, uppercased.
/// 2. A 6+ digit run, promoted with the `CI` prefix.
/// 3. Deny-listed label anywhere in either input forces [`NO_ID`].
/// 4. An id too short or without a 3+ digit run is [`NO_ID`];
///    so is everything that reaches the end.
pub fn extract_service_code(service_id: &str, description: &str) -> String {
    let service_id = service_id.trim();
    let description = description.trim();

    for input in [service_id, description] {
        if let Some(m) = EXPLICIT_CODE_RE.find(input) {
            return m.as_str().to_uppercase();
        }
    }

    for input in [service_id, description] {
        if let Some(m) = DIGIT_RUN_RE.find(input) {
            return format!("CI{}", m.as_str());
        }
    }

    let id_lower = service_id.to_lowercase();
    let desc_lower = description.to_lowercase();
    for word in DENY_LIST {
        let word = word.to_lowercase();
        if id_lower.contains(&word) || desc_lower.contains(&word) {
            return NO_ID.to_string();
        }
    }

    if service_id.len() < 6 || !SHORT_DIGIT_RUN_RE.is_match(service_id) {
        return NO_ID.to_string();
    }

    NO_ID.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_code_from_description() {
        assert_eq!(
            extract_service_code("1001", "BOG.CI1034567.MGMT link"),
            "CI1034567"
        );
        assert_eq!(
            extract_service_code("1001", "MED.CO2045678 customer"),
            "CO2045678"
        );
    }

    #[test]
    fn test_explicit_code_is_uppercased() {
        assert_eq!(extract_service_code("ci1034567", ""), "CI1034567");
    }

    #[test]
    fn test_service_id_checked_before_description() {
        assert_eq!(
            extract_service_code("CO9999999", "also has CI1111111"),
            "CO9999999"
        );
    }

    #[test]
    fn test_digit_run_gets_ci_prefix() {
        assert_eq!(extract_service_code("1034567", ""), "CI1034567");
        assert_eq!(
            extract_service_code("1001", "trunk 2045678 north"),
            "CI2045678"
        );
    }

    #[test]
    fn test_explicit_code_beats_digit_run() {
        // A bare run in the id loses to an explicit code in the description.
        assert_eq!(
            extract_service_code("abc", "backup CO7654321 1234567"),
            "CO7654321"
        );
    }

    #[test]
    fn test_deny_list_forces_no_id() {
        assert_eq!(extract_service_code("12345", "VPLS interconnect"), NO_ID);
        assert_eq!(extract_service_code("epipe-north", ""), NO_ID);
        assert_eq!(extract_service_code("123", "_tmnx_internal"), NO_ID);
        assert_eq!(extract_service_code("gestion red", ""), NO_ID);
    }

    #[test]
    fn test_deny_list_does_not_block_real_codes() {
        // Rule order: an explicit code wins even next to a deny word.
        assert_eq!(
            extract_service_code("1001", "VPLS CI1034567"),
            "CI1034567"
        );
    }

    #[test]
    fn test_short_or_nonnumeric_id_is_no_id() {
        assert_eq!(extract_service_code("12345", ""), NO_ID);
        assert_eq!(extract_service_code("northlink", ""), NO_ID);
        assert_eq!(extract_service_code("", ""), NO_ID);
    }
}
