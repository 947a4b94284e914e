//! Port table extraction from `show port` output.
//!
//! The port table appears in two shapes: the wide form with link, MTU and
//! descriptor columns, and a short form that stops after the port state.
//! Row patterns are tried most specific first so optional columns never
//! swallow a neighbour.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::{data_lines, lenient_u32, table_body};
use crate::logging::LogContext;
use crate::records::PortRecord;

lazy_static! {
    /// Section body candidates, tried in order. The first anchors on the
    /// per-slot header, the second on the column header, the last takes
    /// whatever follows the command when neither header survived.
    static ref PORT_SECTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"show port\s+={3,}[\s\S]*?Ports on Slot[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
        ).unwrap(),
        Regex::new(
            r"show port\s+={3,}[\s\S]*?Port\s+Admin[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
        ).unwrap(),
        Regex::new(r"show port\s+={3,}([\s\S]*?)(?:={3,}|\z)").unwrap(),
    ];

    /// Wide row: every column through port type, plus optional media.
    static ref PORT_ROW_FULL_RE: Regex = Regex::new(
        r"^(?P<port>\S+/\S+)\s+(?P<admin>Up|Down)\s+(?P<link>Yes|No)\s+(?P<state>\S+)\s+(?P<cfg>\d+)\s+(?P<oper>\d+)\s+(?P<lag>\S+)\s+(?P<mode>\S+)\s+(?P<encap>\S+)\s+(?P<ptype>\S+)(?:\s+(?P<media>\S.*?))?\s*$"
    ).unwrap();

    /// Row with the link column but a cut tail; MTUs optional.
    static ref PORT_ROW_LINK_RE: Regex = Regex::new(
        r"^(?P<port>\S+/\S+)\s+(?P<admin>Up|Down)\s+(?P<link>Yes|No)\s+(?P<state>\S+)(?:\s+(?P<cfg>\d+)\s+(?P<oper>\d+))?"
    ).unwrap();

    /// Row without a link column.
    static ref PORT_ROW_BARE_RE: Regex = Regex::new(
        r"^(?P<port>\S+/\S+)\s+(?P<admin>Up|Down)\s+(?P<state>\S+)(?:\s+(?P<cfg>\d+)\s+(?P<oper>\d+))?"
    ).unwrap();
}

/// Extract every port row from a device block.
pub fn extract_ports(block: &str, device_id: &str, ctx: &LogContext) -> Vec<PortRecord> {
    let Some(body) = PORT_SECTION_PATTERNS
        .iter()
        .find_map(|pattern| table_body(pattern, block))
    else {
        log::debug!("{} SECTION_MISSING section=ports", ctx);
        return Vec::new();
    };

    let mut ports = Vec::new();
    for line in data_lines(body, &["Port"]) {
        if let Some(record) = parse_port_row(line, device_id) {
            ports.push(record);
        }
    }

    log::debug!("{} SECTION_EXTRACTED section=ports rows={}", ctx, ports.len());
    ports
}

fn parse_port_row(line: &str, device_id: &str) -> Option<PortRecord> {
    let owned = |caps: &regex::Captures, name: &str| {
        caps.name(name).map(|m| m.as_str().trim().to_string())
    };

    if let Some(caps) = PORT_ROW_FULL_RE.captures(line) {
        return Some(PortRecord {
            device_id: device_id.to_string(),
            port_id: caps["port"].to_string(),
            admin_state: caps["admin"].to_string(),
            link: Some(caps["link"].to_string()),
            port_state: caps["state"].to_string(),
            cfg_mtu: lenient_u32(&caps["cfg"]),
            oper_mtu: lenient_u32(&caps["oper"]),
            lag: owned(&caps, "lag"),
            port_mode: owned(&caps, "mode"),
            encap: owned(&caps, "encap"),
            port_type: owned(&caps, "ptype"),
            media: owned(&caps, "media"),
        });
    }

    if let Some(caps) = PORT_ROW_LINK_RE.captures(line) {
        return Some(PortRecord {
            device_id: device_id.to_string(),
            port_id: caps["port"].to_string(),
            admin_state: caps["admin"].to_string(),
            link: Some(caps["link"].to_string()),
            port_state: caps["state"].to_string(),
            cfg_mtu: caps.name("cfg").and_then(|m| lenient_u32(m.as_str())),
            oper_mtu: caps.name("oper").and_then(|m| lenient_u32(m.as_str())),
            lag: None,
            port_mode: None,
            encap: None,
            port_type: None,
            media: None,
        });
    }

    if let Some(caps) = PORT_ROW_BARE_RE.captures(line) {
        return Some(PortRecord {
            device_id: device_id.to_string(),
            port_id: caps["port"].to_string(),
            admin_state: caps["admin"].to_string(),
            link: None,
            port_state: caps["state"].to_string(),
            cfg_mtu: caps.name("cfg").and_then(|m| lenient_u32(m.as_str())),
            oper_mtu: caps.name("oper").and_then(|m| lenient_u32(m.as_str())),
            lag: None,
            port_mode: None,
            encap: None,
            port_type: None,
            media: None,
        });
    }

    None
}
