//! Service table extraction from `show service service-using` output.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::section::{data_lines, lenient_u64, strip_truncation, table_body};
use crate::logging::LogContext;
use crate::records::ServiceRecord;

lazy_static! {
    /// Service table body: everything between the column header rule and
    /// the closing rule (or end of block when the section was cut short).
    static ref SERVICES_SECTION_RE: Regex = Regex::new(
        r"show service service-using\s+={3,}[\s\S]*?ServiceId\s+Type\s+Adm\s+Opr\s+CustomerId\s+Service Name[\s\S]*?-{3,}([\s\S]*?)(?:={3,}|\z)"
    ).unwrap();

    /// One service row. The name column is optional and may be cut at the
    /// column boundary with a trailing `*`.
    static ref SERVICE_ROW_RE: Regex = Regex::new(
        r"^(?P<id>\d+)\s+(?P<kind>\S+)\s+(?P<adm>\S+)\s+(?P<opr>\S+)\s+(?P<cust>\d+)(?:\s+(?P<name>.*))?$"
    ).unwrap();
}

/// Extract every service row from a device block.
///
/// Rows that do not parse are skipped individually; a missing section
/// yields an empty list rather than an error.
pub fn extract_services(block: &str, device_id: &str, ctx: &LogContext) -> Vec<ServiceRecord> {
    let Some(body) = table_body(&SERVICES_SECTION_RE, block) else {
        log::debug!("{} SECTION_MISSING section=services", ctx);
        return Vec::new();
    };

    let mut services = Vec::new();
    for line in data_lines(body, &["ServiceId", "Matching Services"]) {
        let Some(caps) = SERVICE_ROW_RE.captures(line) else {
            continue;
        };
        let Some(service_id) = lenient_u64(&caps["id"]) else {
            log::debug!("{} FIELD_MALFORMED field=service_id value={}", ctx, &caps["id"]);
            continue;
        };

        let (name, name_truncated) = match caps.name("name") {
            Some(m) if !m.as_str().trim().is_empty() => {
                let (clean, truncated) = strip_truncation(m.as_str());
                (Some(clean), truncated)
            }
            _ => (None, false),
        };
        if name_truncated {
            log::debug!(
                "{} TRUNCATED_VALUE field=service_name service_id={}",
                ctx,
                service_id
            );
        }

        services.push(ServiceRecord {
            device_id: device_id.to_string(),
            service_id,
            service_type: caps["kind"].to_string(),
            admin_state: caps["adm"].to_string(),
            oper_state: caps["opr"].to_string(),
            customer_id: lenient_u64(&caps["cust"]),
            name,
            name_truncated,
        });
    }

    log::debug!("{} SECTION_EXTRACTED section=services rows={}", ctx, services.len());
    services
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICES_BLOCK: &str = "\
show service service-using
===============================================================================
Services [service-using]
===============================================================================
ServiceId    Type      Adm  Opr  CustomerId Service Name
-------------------------------------------------------------------------------
2001234      VPLS      Up   Up   1          INTERNET-CLARO-CI10203040
2001235      Epipe     Up   Down 1          DATOS-BOG-CI10203041-PRINCIPAL*
2001236      VPRN      Down Down 200
-------------------------------------------------------------------------------
Matching Services : 3
===============================================================================
";

    fn ctx() -> LogContext {
        LogContext::new("parse-test")
    }

    #[test]
    fn test_extract_services_rows() {
        let services = extract_services(SERVICES_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(services.len(), 3);

        assert_eq!(services[0].service_id, 2001234);
        assert_eq!(services[0].service_type, "VPLS");
        assert_eq!(services[0].admin_state, "Up");
        assert_eq!(services[0].oper_state, "Up");
        assert_eq!(services[0].customer_id, Some(1));
        assert_eq!(services[0].name.as_deref(), Some("INTERNET-CLARO-CI10203040"));
        assert!(!services[0].name_truncated);
    }

    #[test]
    fn test_truncated_service_name() {
        let services = extract_services(SERVICES_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(
            services[1].name.as_deref(),
            Some("DATOS-BOG-CI10203041-PRINCIPAL")
        );
        assert!(services[1].name_truncated);
    }

    #[test]
    fn test_service_without_name() {
        let services = extract_services(SERVICES_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert_eq!(services[2].name, None);
        assert!(!services[2].name_truncated);
        assert_eq!(services[2].customer_id, Some(200));
    }

    #[test]
    fn test_missing_section_yields_empty() {
        let services = extract_services("no services here", "BAQ_CLR_7210_01", &ctx());
        assert!(services.is_empty());
    }

    #[test]
    fn test_summary_footer_is_not_a_row() {
        let services = extract_services(SERVICES_BLOCK, "BAQ_CLR_7210_01", &ctx());
        assert!(services.iter().all(|s| s.service_type != "Services"));
    }
}
