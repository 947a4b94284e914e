//! Line-card and media-adapter extraction.
//!
//! Two section dialects feed the same record: `show card detail` reports
//! provisioned/equipped pairs, `show mda` reports the adapter type with
//! admin/oper states. Row shapes are tried most specific first. The
//! equipped type may arrive as a parenthesized annotation beside the
//! provisioned one; the annotation content is what lands in the record.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::{data_lines, lenient_f64, lenient_u32};
use crate::logging::LogContext;
use crate::records::ModuleRecord;

lazy_static! {
    /// Card-detail section: header names the provisioned/equipped pair,
    /// with or without an Mda column.
    static ref CARD_SECTION_RE: Regex = Regex::new(
        r"show card detail\s+={3,}[\s\S]*?Slot\s+(?:Mda\s+Provisioned|Provisioned\s+Equipped)[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
    ).unwrap();

    /// Mda summary section.
    static ref MDA_SECTION_RE: Regex = Regex::new(
        r"show mda\s+={3,}[\s\S]*?Slot\s+Mda[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
    ).unwrap();

    /// Full row: slot, mda, provisioned type, optional parenthesized
    /// equipped type, admin and oper states.
    static ref FULL_ROW_RE: Regex = Regex::new(
        r"^(?P<slot>\d+)\s+(?P<mda>\d+)\s+(?P<prov>[A-Za-z]\S*)(?:\s+\((?P<equip>[^)]+)\))?\s+(?P<adm>[Uu]p|[Dd]own)\s+(?P<opr>\S+)$"
    ).unwrap();

    /// Type row with states but no separate Mda column. Letter slots are
    /// the control-processor positions.
    static ref STATE_ROW_RE: Regex = Regex::new(
        r"^(?P<slot>\d+(?:/\d+)?|[A-D])\s+(?P<kind>[A-Za-z]\S*)\s+(?P<adm>[Uu]p|[Dd]own)\s+(?P<opr>\S+)$"
    ).unwrap();

    /// Provisioned/equipped pair without states; the equipped column may
    /// be a parenthesized annotation instead of a plain token.
    static ref PAIR_ROW_RE: Regex = Regex::new(
        r"^(?P<slot>\d+(?:/\d+)?|[A-D])\s+(?P<prov>[A-Za-z]\S*)\s+(?:\((?P<annot>[^)]+)\)|(?P<equip>[A-Za-z]\S*))$"
    ).unwrap();

    static ref MAX_PORTS_RE: Regex = Regex::new(r"Maximum port count\s*:\s*(\d+)").unwrap();
    static ref MODULE_TEMP_RE: Regex = Regex::new(r"(?m)^\s*Temperature\s*:\s*([0-9.]+)").unwrap();
}

/// Extract every module row from a device block.
///
/// The card-detail section is preferred; the mda summary is only read
/// when no card section matched. Port-capacity and temperature lines sit
/// inside the section and apply to every row of it.
pub fn extract_modules(block: &str, device_id: &str, ctx: &LogContext) -> Vec<ModuleRecord> {
    let Some(caps) = CARD_SECTION_RE
        .captures(block)
        .or_else(|| MDA_SECTION_RE.captures(block))
    else {
        log::debug!("{} SECTION_MISSING section=modules", ctx);
        return Vec::new();
    };
    let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
        return Vec::new();
    };

    let max_ports = MAX_PORTS_RE
        .captures(whole.as_str())
        .and_then(|c| c.get(1))
        .and_then(|m| lenient_u32(m.as_str()));
    let temperature = MODULE_TEMP_RE
        .captures(whole.as_str())
        .and_then(|c| c.get(1))
        .and_then(|m| lenient_f64(m.as_str()));

    let mut modules = Vec::new();
    for line in data_lines(body.as_str(), &["Slot", "MDA", "State"]) {
        let Some(record) = parse_module_row(line, device_id) else {
            continue;
        };
        modules.push(ModuleRecord {
            max_ports,
            temperature,
            ..record
        });
    }

    log::debug!("{} SECTION_EXTRACTED section=modules rows={}", ctx, modules.len());
    modules
}

fn parse_module_row(line: &str, device_id: &str) -> Option<ModuleRecord> {
    if let Some(caps) = FULL_ROW_RE.captures(line) {
        return Some(ModuleRecord {
            device_id: device_id.to_string(),
            slot: format!("{}/{}", &caps["slot"], &caps["mda"]),
            provisioned_type: Some(caps["prov"].to_string()),
            equipped_type: caps.name("equip").map(|m| m.as_str().trim().to_string()),
            admin_state: Some(caps["adm"].to_string()),
            oper_state: Some(caps["opr"].to_string()),
            max_ports: None,
            temperature: None,
        });
    }

    if let Some(caps) = STATE_ROW_RE.captures(line) {
        return Some(ModuleRecord {
            device_id: device_id.to_string(),
            slot: caps["slot"].to_string(),
            provisioned_type: Some(caps["kind"].to_string()),
            equipped_type: None,
            admin_state: Some(caps["adm"].to_string()),
            oper_state: Some(caps["opr"].to_string()),
            max_ports: None,
            temperature: None,
        });
    }

    if let Some(caps) = PAIR_ROW_RE.captures(line) {
        let equipped = caps
            .name("annot")
            .or_else(|| caps.name("equip"))
            .map(|m| m.as_str().trim().to_string());
        return Some(ModuleRecord {
            device_id: device_id.to_string(),
            slot: caps["slot"].to_string(),
            provisioned_type: Some(caps["prov"].to_string()),
            equipped_type: equipped,
            admin_state: None,
            oper_state: None,
            max_ports: None,
            temperature: None,
        });
    }

    None
}
