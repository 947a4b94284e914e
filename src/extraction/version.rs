//! Software-release extraction from `show version` output.
//!
//! Release strings appear under many labels across the installed base:
//! `TiMOS-C-7.0.R13` banners, `Version:` lines, `Release:` lines, and
//! OS-name variants of each. The pattern list is generated over the
//! label and OS-name axes, with the TiMOS stream letter folded into a
//! character class, keeping the try-order most specific first.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::first_capture;
use crate::logging::LogContext;
use crate::records::VersionRecord;

/// Release shape: `major.minor.R<n>`.
const RELEASE: &str = r"(\d+\.\d+\.[A-Z]\d+)";

/// Build the ordered release-pattern list.
fn release_patterns() -> Vec<Regex> {
    let mut sources: Vec<String> = Vec::new();

    // TiMOS banners, stream letter as a class.
    sources.push(format!(r"TiMOS-[A-Z]-{RELEASE}"));
    sources.push(format!(r"TiMOS-{RELEASE}"));
    sources.push(format!(r"TiMOS.*?{RELEASE}"));

    // Plain labeled lines.
    for label in ["", r"System\s+", r"Software\s+"] {
        sources.push(format!(r"{label}[Vv]ersion\s*:?\s*{RELEASE}"));
    }

    // OS-qualified version lines, then version-labeled banner forms.
    for os in [r"TiMOS", r"SROS", r"SR\s+OS", r"SR"] {
        sources.push(format!(r"{os}.*?[Vv]ersion\s*:?\s*{RELEASE}"));
    }
    for os in [r"TiMOS", r"SROS", r"SR\s+OS", r"SR"] {
        sources.push(format!(r"[Vv]ersion\s*:?\s*{os}-[A-Z]-{RELEASE}"));
        sources.push(format!(r"[Vv]ersion\s*:?\s*{os}[-\s]{RELEASE}"));
    }

    // Build / release labels.
    for label in [r"[Bb]uild", r"[Rr]elease", r"[Ss]oftware\s+[Rr]elease"] {
        sources.push(format!(r"{label}\s*:?\s*{RELEASE}"));
    }
    for os in [r"TiMOS", r"SROS", r"SR\s+OS", r"SR"] {
        sources.push(format!(r"{os}\s+[Rr]elease\s*:?\s*{RELEASE}"));
    }

    // Last resort: any dotted run with a release or numeric patch tail.
    sources.push(r"(\d+\.\d+\.[A-Z]?\d+)".to_string());

    sources
        .iter()
        .map(|source| Regex::new(source).unwrap())
        .collect()
}

lazy_static! {
    static ref RELEASE_PATTERNS: Vec<Regex> = release_patterns();

    /// Leading `major.minor` of a release string.
    static ref MAIN_VERSION_RE: Regex = Regex::new(r"^(\d+\.\d+)").unwrap();

    /// Hardware family mentions near the release banner, e.g.
    /// `for 7750 SR` or `Nokia 7210 SAS-K`.
    static ref HINT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"for\s+(7\d{3}\s+[A-Za-z]+(?:-[A-Za-z0-9]+)?)").unwrap(),
        Regex::new(r"Nokia\s+(7\d{3}\s+[A-Za-z]+(?:-[A-Za-z0-9]+)?)").unwrap(),
        Regex::new(r"(7\d{3}\s+[A-Za-z]+(?:-[A-Za-z0-9]+)?)").unwrap(),
        Regex::new(r"(7\d{3}-[A-Za-z]+(?:-[A-Za-z0-9]+)?)").unwrap(),
        Regex::new(r"(?:^|\s)(7\d{3})(?:\s|$)").unwrap(),
    ];
}

/// Extract the release identity from a device block.
///
/// Returns `None` when neither a release string nor a hardware hint was
/// found. The hint is recorded as-is; only the aggregator decides whether
/// to trust it.
pub fn extract_version(block: &str, device_id: &str, ctx: &LogContext) -> Option<VersionRecord> {
    let version = first_capture(&RELEASE_PATTERNS, block);
    let device_type_hint = first_capture(&HINT_PATTERNS, block);

    if version.is_none() && device_type_hint.is_none() {
        log::debug!("{} SECTION_MISSING section=version", ctx);
        return None;
    }

    let main_version = version.as_deref().and_then(|v| {
        MAIN_VERSION_RE
            .captures(v)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    });

    log::debug!(
        "{} SECTION_EXTRACTED section=version release={}",
        ctx,
        version.as_deref().unwrap_or("-")
    );

    Some(VersionRecord {
        device_id: device_id.to_string(),
        version,
        main_version,
        device_type_hint,
    })
}
