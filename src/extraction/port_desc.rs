//! Port description extraction from `show port description` output.
//!
//! Descriptions wrap: a row may continue on following lines that carry no
//! port id. Continuation lines are folded into the open entry with a single
//! space until the next port id starts a new one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::strip_truncation;
use crate::logging::LogContext;
use crate::records::PortDescriptionRecord;

lazy_static! {
    /// Per-slot description table, repeated once per slot on multi-slot
    /// chassis.
    static ref SLOT_SECTION_RE: Regex = Regex::new(
        r"Port Descriptions on Slot \S+\s+={3,}[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
    ).unwrap();

    /// Single-table form, used when the per-slot headers are absent.
    static ref GENERIC_SECTION_RE: Regex = Regex::new(
        r"show port description\s+={3,}[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
    ).unwrap();

    /// A line that opens a new entry: port id, whitespace, then the first
    /// description fragment (possibly empty).
    static ref DESC_ENTRY_RE: Regex = Regex::new(
        r"^(?P<port>\S+/\S+)\s+(?P<desc>.*)$"
    ).unwrap();
}

/// Extract every port description from a device block, folding wrapped
/// lines back into their entry.
pub fn extract_port_descriptions(
    block: &str,
    device_id: &str,
    ctx: &LogContext,
) -> Vec<PortDescriptionRecord> {
    let bodies: Vec<&str> = SLOT_SECTION_RE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let mut descriptions = Vec::new();
    if bodies.is_empty() {
        match GENERIC_SECTION_RE
            .captures(block)
            .and_then(|caps| caps.get(1))
        {
            Some(body) => collect_entries(body.as_str(), device_id, ctx, &mut descriptions),
            None => {
                log::debug!("{} SECTION_MISSING section=port_descriptions", ctx);
                return descriptions;
            }
        }
    } else {
        for body in bodies {
            collect_entries(body, device_id, ctx, &mut descriptions);
        }
    }

    log::debug!(
        "{} SECTION_EXTRACTED section=port_descriptions rows={}",
        ctx,
        descriptions.len()
    );
    descriptions
}

fn collect_entries(
    body: &str,
    device_id: &str,
    ctx: &LogContext,
    out: &mut Vec<PortDescriptionRecord>,
) {
    let mut current: Option<(String, String)> = None;

    for raw in body.lines() {
        let line = raw.trim();
        if line.is_empty() || line.contains("----------") {
            continue;
        }

        if let Some(caps) = DESC_ENTRY_RE.captures(line) {
            flush(current.take(), device_id, ctx, out);
            current = Some((caps["port"].to_string(), caps["desc"].trim().to_string()));
        } else if let Some((_, desc)) = current.as_mut() {
            // Wrapped fragment of the open entry.
            desc.push(' ');
            desc.push_str(line);
        }
    }

    flush(current, device_id, ctx, out);
}

fn flush(
    entry: Option<(String, String)>,
    device_id: &str,
    ctx: &LogContext,
    out: &mut Vec<PortDescriptionRecord>,
) {
    let Some((port_id, description)) = entry else {
        return;
    };
    if description.trim().is_empty() {
        return;
    }

    let (description, truncated) = strip_truncation(&description);
    if truncated {
        log::debug!("{} TRUNCATED_VALUE field=port_description port={}", ctx, port_id);
    }
    out.push(PortDescriptionRecord {
        device_id: device_id.to_string(),
        port_id,
        description,
        truncated,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESC_BLOCK: &str = "\
show port description
===============================================================================
Port Descriptions on Slot 1
===============================================================================
Port Id        Description
-------------------------------------------------------------------------------
1/1/1          ENLACE-HACIA-AGG-BAQ
1/1/2          INTERNET-CLARO-CI10203040
               SEDE-PRINCIPAL-NORTE
1/1/3          DATOS-CI10203099*
===============================================================================
";

    fn ctx() -> LogContext {
        LogContext::new("parse-test")
    }

    #[test]
    fn test_single_line_entries() {
        let descs = extract_port_descriptions(DESC_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(descs.len(), 3);
        assert_eq!(descs[0].port_id, "1/1/1");
        assert_eq!(descs[0].description, "ENLACE-HACIA-AGG-BAQ");
        assert!(!descs[0].truncated);
    }

    #[test]
    fn test_wrapped_entry_is_folded() {
        let descs = extract_port_descriptions(DESC_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(
            descs[1].description,
            "INTERNET-CLARO-CI10203040 SEDE-PRINCIPAL-NORTE"
        );
    }

    #[test]
    fn test_truncated_entry_flagged() {
        let descs = extract_port_descriptions(DESC_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(descs[2].description, "DATOS-CI10203099");
        assert!(descs[2].truncated);
    }

    #[test]
    fn test_multiple_slot_sections() {
        let block = "\
Port Descriptions on Slot 1
===============================================================================
Port Id        Description
-------------------------------------------------------------------------------
1/1/1          UPLINK-A
===============================================================================
Port Descriptions on Slot 2
===============================================================================
Port Id        Description
-------------------------------------------------------------------------------
2/1/1          UPLINK-B
===============================================================================
";
        let descs = extract_port_descriptions(block, "MED_CLR_7750_01", &ctx());
        assert_eq!(descs.len(), 2);
        assert_eq!(descs[0].port_id, "1/1/1");
        assert_eq!(descs[1].port_id, "2/1/1");
    }

    #[test]
    fn test_entry_without_description_dropped() {
        let block = "\
show port description
===============================================================================
-------------------------------------------------------------------------------
1/1/1          REAL-DESC
1/1/2          \n\
===============================================================================
";
        let descs = extract_port_descriptions(block, "DEV", &ctx());
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].port_id, "1/1/1");
    }

    #[test]
    fn test_missing_section_yields_empty() {
        let descs = extract_port_descriptions("show chassis", "DEV", &ctx());
        assert!(descs.is_empty());
    }
}
