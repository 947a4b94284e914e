//! Chassis hardware-state extraction from `show chassis` output.
//!
//! The chassis section differs across hardware generations: labels vary,
//! whole subsections come and go, and smaller devices print only a few
//! lines. Each field therefore resolves through its own ordered pattern
//! list, most specific first, and a record is returned as soon as any
//! field matched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::{first_capture, lenient_f64};
use crate::logging::LogContext;
use crate::records::ChassisRecord;

lazy_static! {
    /// Device name label variants.
    static ref NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Name\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Chassis Name\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*System Name\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Host ?[Nn]ame\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    /// Hardware model label variants.
    static ref TYPE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Type\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Chassis Type\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Hardware Type\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Model\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref LOCATION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Location\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref SERIAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Serial [Nn]umber\s*:\s*(\S+)").unwrap(),
        Regex::new(r"(?m)^\s*Serial\s*:\s*(\S+)").unwrap(),
        Regex::new(r"(?m)^\s*S/N\s*:\s*(\S+)").unwrap(),
    ];

    /// Temperature with an optional celsius suffix. Anchored to the line
    /// start so `Over Temperature state` never matches.
    static ref TEMPERATURE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Temperature\s*:\s*([0-9.]+)\s*C\b").unwrap(),
        Regex::new(r"(?m)^\s*Temperature\s*:\s*([0-9.]+)").unwrap(),
        Regex::new(r"(?m)^\s*Temp\s*:\s*([0-9.]+)").unwrap(),
    ];

    /// Fan state: the tray form (number, speed, then status) before the
    /// flat label.
    static ref FAN_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"Fan tray number\s*:\s*\d+\s+Speed\s*:\s*[^\n]+\s+Status\s*:\s*(\S[^\n]*)"
        ).unwrap(),
        Regex::new(r"(?m)^\s*Fan [Ss]tatus\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref CRITICAL_LED_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Critical LED state\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref MAJOR_LED_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Major LED state\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref OVER_TEMP_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Over Temperature state\s*:\s*(\S[^\n]*)").unwrap(),
    ];

    static ref POWER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?m)^\s*Power [Ss]tatus\s*:\s*(\S[^\n]*)").unwrap(),
        Regex::new(r"(?m)^\s*Power [Ss]upply [Ss]tatus\s*:\s*(\S[^\n]*)").unwrap(),
    ];
}

/// Extract the chassis record from a device block.
///
/// Returns `None` only when no chassis field matched at all; a partial
/// section still yields a record carrying whatever was found.
pub fn extract_chassis(block: &str, device_id: &str, ctx: &LogContext) -> Option<ChassisRecord> {
    let name = first_capture(&NAME_PATTERNS, block);
    let chassis_type = first_capture(&TYPE_PATTERNS, block);
    let location = first_capture(&LOCATION_PATTERNS, block);
    let serial = first_capture(&SERIAL_PATTERNS, block);
    let fan_status = first_capture(&FAN_PATTERNS, block);
    let critical_led = first_capture(&CRITICAL_LED_PATTERNS, block);
    let major_led = first_capture(&MAJOR_LED_PATTERNS, block);
    let over_temp = first_capture(&OVER_TEMP_PATTERNS, block);
    let power_status = first_capture(&POWER_PATTERNS, block);

    let temperature = match first_capture(&TEMPERATURE_PATTERNS, block) {
        Some(raw) => {
            let parsed = lenient_f64(&raw);
            if parsed.is_none() {
                log::debug!("{} FIELD_MALFORMED field=temperature value={}", ctx, raw);
            }
            parsed
        }
        None => None,
    };

    let found_any = name.is_some()
        || chassis_type.is_some()
        || location.is_some()
        || serial.is_some()
        || temperature.is_some()
        || fan_status.is_some()
        || critical_led.is_some()
        || major_led.is_some()
        || over_temp.is_some()
        || power_status.is_some();
    if !found_any {
        log::debug!("{} SECTION_MISSING section=chassis", ctx);
        return None;
    }

    log::debug!("{} SECTION_EXTRACTED section=chassis", ctx);
    Some(ChassisRecord {
        device_id: device_id.to_string(),
        name,
        chassis_type,
        location,
        serial,
        temperature,
        fan_status,
        critical_led,
        major_led,
        over_temp,
        power_status,
    })
}
