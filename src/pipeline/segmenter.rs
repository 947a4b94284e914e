//! Report segmentation and device-inventory harvest.
//!
//! A concatenated report is a sequence of banner-delimited device blocks.
//! Segmentation slices the text at each banner; the inventory is built by
//! an independent scan over every banner occurrence, so devices whose
//! blocks are empty or unreadable still get a summary row.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::logging::LogContext;
use crate::records::{DeviceIdentity, ReportFormat};

lazy_static! {
    /// Device banner. The target capture starts the block body.
    static ref BANNER_RE: Regex = Regex::new(
        r"#\s*Script Name:[^\n]+\s+Script Version:[^\n]+\s+Target:([^\s#\n]+)"
    ).unwrap();

    /// Saved-result token inside one banner segment. Its file name names
    /// the producing dialect.
    static ref SAVED_RESULT_RE: Regex = Regex::new(r"Saved Result File Name:([^\n]*)").unwrap();
}

/// File-level markers consulted when a banner segment carries no usable
/// saved-result token.
const NSP19_CONTENT_MARKER: &str = "All_Nokia_Devices_NSP19";
const NSP24_CONTENT_MARKER: &str = "All_Nokia_Devices_NSP24";
const LEGACY_NSP24_MARKER: &str = "All Nokia devices";

struct BannerHit<'a> {
    start: usize,
    body_start: usize,
    device_id: &'a str,
}

fn banner_hits(text: &str) -> Vec<BannerHit<'_>> {
    BANNER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let target = caps.get(1)?;
            Some(BannerHit {
                start: whole.start(),
                body_start: target.start(),
                device_id: target.as_str(),
            })
        })
        .collect()
}

/// Slice the report into `(device id, block)` pairs, one per banner.
///
/// Blocks run from their target id to the next banner, zero-copy over the
/// input. Text ahead of the first banner belongs to no device and is
/// dropped.
pub fn segment_blocks<'a>(text: &'a str, ctx: &LogContext) -> Vec<(String, &'a str)> {
    let hits = banner_hits(text);

    let mut blocks = Vec::with_capacity(hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(text.len(), |next| next.start);
        blocks.push((hit.device_id.to_string(), &text[hit.body_start..end]));
    }

    log::info!("{} SEGMENT_COMPLETE blocks={}", ctx, blocks.len());
    blocks
}

/// Harvest the device inventory: every `(device id, dialect)` pair seen
/// in the banners, deduplicated and sorted.
pub fn harvest_inventory(text: &str, ctx: &LogContext) -> Vec<DeviceIdentity> {
    let hits = banner_hits(text);

    let mut seen: HashSet<(String, ReportFormat)> = HashSet::new();
    let mut identities = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(text.len(), |next| next.start);
        let segment = &text[hit.start..end];
        let token = SAVED_RESULT_RE
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let source = infer_source(token, text);
        if seen.insert((hit.device_id.to_string(), source)) {
            identities.push(DeviceIdentity {
                device_id: hit.device_id.to_string(),
                source,
            });
        }
    }

    identities.sort_by(|a, b| {
        a.device_id
            .cmp(&b.device_id)
            .then_with(|| a.source.as_str().cmp(b.source.as_str()))
    });

    log::info!("{} INVENTORY_COMPLETE devices={}", ctx, identities.len());
    identities
}

/// Dialect of one banner segment.
///
/// The saved-result token decides first. The file-level content markers
/// only break the tie when the token names neither dialect; unmarked
/// reports default to the older one.
fn infer_source(saved_token: Option<&str>, full_text: &str) -> ReportFormat {
    if let Some(token) = saved_token {
        if token.contains("NSP19") {
            return ReportFormat::Nsp19;
        }
        if token.contains("NSP24") {
            return ReportFormat::Nsp24;
        }
    }

    if full_text.contains(NSP19_CONTENT_MARKER) {
        ReportFormat::Nsp19
    } else if full_text.contains(NSP24_CONTENT_MARKER) || full_text.contains(LEGACY_NSP24_MARKER) {
        ReportFormat::Nsp24
    } else {
        ReportFormat::Nsp19
    }
}
