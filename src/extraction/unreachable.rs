//! Unreachable-device detection over the full report text.
//!
//! Devices the collector could not log into leave an error banner instead
//! of command output. Those blocks never reach the record extractors; they
//! are collected separately so the summary still shows one row per device.

use lazy_static::lazy_static;
use regex::Regex;

use crate::logging::LogContext;
use crate::records::{ErrorCategory, UnreadableDevice};

/// How far past the error banner to look for the exception detail line.
const DETAIL_WINDOW: usize = 500;

lazy_static! {
    /// Error banner: the standard header with an Unknown status followed
    /// by the detailed-error line.
    static ref ERROR_BANNER_RE: Regex = Regex::new(
        r"#\s*Script Name:[^\n]+\s+Script Version:[^\n]+\s+Target:([^\s#\n]+)\s+#\s*Status:Unknown[^\n]*\s+#\s*Detailed Status/Error:\s+#\s*([^\n]+)"
    ).unwrap();

    static ref DETAIL_RE: Regex = Regex::new(r"Unknown exception:\s*([^\n]+)").unwrap();
}

/// Substring rules mapping error text to a category, tried in order.
const CATEGORY_RULES: [(&str, ErrorCategory); 3] = [
    ("timeout", ErrorCategory::Timeout),
    ("connection", ErrorCategory::Connection),
    ("authentication", ErrorCategory::Authentication),
];

/// Scan the whole report for devices that answered with an error banner.
pub fn detect_unreachable(text: &str, ctx: &LogContext) -> Vec<UnreadableDevice> {
    let mut devices = Vec::new();

    for caps in ERROR_BANNER_RE.captures_iter(text) {
        let (Some(whole), Some(target), Some(error)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let device_id = target.as_str().trim().to_string();
        let error_text = error.as_str().trim().to_string();

        let detail = DETAIL_RE
            .captures(detail_window(text, whole.end()))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());

        let category = classify_error(&error_text, detail.as_deref());
        log::warn!(
            "{} UNREACHABLE_DEVICE device={} category={}",
            ctx,
            device_id,
            category
        );
        devices.push(UnreadableDevice {
            device_id,
            error_text,
            detail,
            category,
        });
    }

    devices
}

/// Bounded window after an error banner, clipped back to a char boundary.
fn detail_window(text: &str, from: usize) -> &str {
    let mut end = (from + DETAIL_WINDOW).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[from..end]
}

fn classify_error(error_text: &str, detail: Option<&str>) -> ErrorCategory {
    let error_lc = error_text.to_lowercase();
    let detail_lc = detail.map(str::to_lowercase);
    for (needle, category) in CATEGORY_RULES {
        if error_lc.contains(needle) || detail_lc.as_deref().map_or(false, |d| d.contains(needle))
        {
            return category;
        }
    }
    ErrorCategory::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_banner(device: &str, error: &str) -> String {
        format!(
            "#Script Name:Services_Inventory\nScript Version:1\nTarget:{}\n#Status:Unknown\n#Detailed Status/Error:\n#{}\n",
            device, error
        )
    }

    fn ctx() -> LogContext {
        LogContext::new("parse-test")
    }

    #[test]
    fn test_detects_error_banner() {
        let text = error_banner("CUC_TRC_7210_05", "Connection refused by host");
        let devices = detect_unreachable(&text, &ctx());
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, "CUC_TRC_7210_05");
        assert_eq!(devices[0].error_text, "Connection refused by host");
        assert_eq!(devices[0].category, ErrorCategory::Connection);
        assert_eq!(devices[0].detail, None);
    }

    #[test]
    fn test_detail_line_inside_window() {
        let mut text = error_banner("MED_CLR_7750_09", "Connection lost");
        text.push_str("Unknown exception: SocketTimeoutException after 30000ms\n");

        let devices = detect_unreachable(&text, &ctx());
        assert_eq!(
            devices[0].detail.as_deref(),
            Some("SocketTimeoutException after 30000ms")
        );
        // The detail carries the timeout marker, and the timeout rule runs
        // before the connection word in the error text is considered.
        assert_eq!(devices[0].category, ErrorCategory::Timeout);
    }

    #[test]
    fn test_detail_outside_window_is_ignored() {
        let mut text = error_banner("MED_CLR_7750_09", "Collection failed");
        text.push_str(&" ".repeat(DETAIL_WINDOW + 10));
        text.push_str("Unknown exception: too far away\n");

        let devices = detect_unreachable(&text, &ctx());
        assert_eq!(devices[0].detail, None);
        assert_eq!(devices[0].category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_category_rule_order() {
        let cases = [
            ("Read timeout after 30s", ErrorCategory::Timeout),
            ("Connection reset by peer", ErrorCategory::Connection),
            ("Authentication failed for user", ErrorCategory::Authentication),
            ("Something else entirely", ErrorCategory::Unknown),
        ];
        for (error, expected) in cases {
            let text = error_banner("DEV", error);
            let devices = detect_unreachable(&text, &ctx());
            assert_eq!(devices[0].category, expected, "error: {}", error);
        }
    }

    #[test]
    fn test_successful_banner_is_not_an_error() {
        let text = "#Script Name:Services_Inventory\nScript Version:1\nTarget:OK_DEV\n#Status:Success\nshow port\n";
        assert!(detect_unreachable(text, &ctx()).is_empty());
    }

    #[test]
    fn test_multiple_unreachable_devices() {
        let text = format!(
            "{}{}",
            error_banner("DEV_A", "timeout"),
            error_banner("DEV_B", "Authentication failure")
        );
        let devices = detect_unreachable(&text, &ctx());
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id, "DEV_A");
        assert_eq!(devices[1].device_id, "DEV_B");
    }
}
