//! Command-section carving and lenient value parsing.
//!
//! Report blocks are free text with no guaranteed grammar. Sections are
//! located with format-tolerant patterns, table bodies are reduced to data
//! lines, and values convert defensively so one malformed field never
//! aborts a block.

use regex::Regex;

/// Sentinel the reporting tool appends when a value was cut at column width.
pub const TRUNCATION_SENTINEL: char = '*';

/// Strip the trailing truncation sentinel from a value.
///
/// Returns the cleaned value and whether the sentinel was present, so
/// consumers can tell a complete value from a cut one.
pub fn strip_truncation(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    match trimmed.strip_suffix(TRUNCATION_SENTINEL) {
        Some(stripped) => (stripped.trim_end().to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

/// Parse a float, treating failure as absence.
pub fn lenient_f64(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

/// Parse an unsigned integer, treating failure as absence.
pub fn lenient_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Parse an unsigned 64-bit integer, treating failure as absence.
pub fn lenient_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

/// Body of a table section: capture group 1 of the section pattern.
pub fn table_body<'a>(section_re: &Regex, block: &'a str) -> Option<&'a str> {
    section_re
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First capture of the first matching pattern, tried in order.
pub fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Data lines of a table body: trimmed, non-empty, no separator rules and
/// none of the given header/footer markers.
pub fn data_lines<'a>(
    body: &'a str,
    skip_markers: &'a [&'a str],
) -> impl Iterator<Item = &'a str> + 'a {
    body.lines().map(str::trim).filter(move |line| {
        !line.is_empty()
            && !line.starts_with('-')
            && !skip_markers.iter().any(|marker| line.contains(marker))
    })
}
