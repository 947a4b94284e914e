//! Typed record tables produced by a parsing pass.
//!
//! Every record keys on the device identifier harvested from the report
//! banners. These models are the interface handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::summary::health::HealthState;

/// Report dialect that produced a device's section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportFormat {
    Nsp19,
    Nsp24,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Nsp19 => "NSP19",
            ReportFormat::Nsp24 => "NSP24",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One banner occurrence. The inventory built from these rows is
/// authoritative for summary completeness, even when the block body is
/// empty or unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub source: ReportFormat,
}

/// Chassis hardware state. At most one per device; every field independently
/// optional since the dialects disagree on which lines are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChassisRecord {
    pub device_id: String,
    pub name: Option<String>,
    pub chassis_type: Option<String>,
    pub location: Option<String>,
    pub serial: Option<String>,
    pub temperature: Option<f64>,
    pub fan_status: Option<String>,
    pub critical_led: Option<String>,
    pub major_led: Option<String>,
    pub over_temp: Option<String>,
    pub power_status: Option<String>,
}

/// Software release identity. At most one per device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub device_id: String,
    /// Release string, e.g. `7.0.R13`. Absent when the section only named
    /// the hardware family.
    pub version: Option<String>,
    /// Leading `major.minor`, when the full string yields one.
    pub main_version: Option<String>,
    /// Hardware family named inside the version section, e.g. `7750 SR`.
    /// Only trusted downstream when it validates as a model string.
    pub device_type_hint: Option<String>,
}

/// One physical port row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub device_id: String,
    pub port_id: String,
    pub admin_state: String,
    /// Link column (`Yes`/`No`), absent in some dialects.
    pub link: Option<String>,
    /// Operational port state (`Up`/`Down`/`Ghost`/...).
    pub port_state: String,
    pub cfg_mtu: Option<u32>,
    pub oper_mtu: Option<u32>,
    pub lag: Option<String>,
    pub port_mode: Option<String>,
    pub encap: Option<String>,
    pub port_type: Option<String>,
    pub media: Option<String>,
}

/// Free-text port description, keyed by (device id, port id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptionRecord {
    pub device_id: String,
    pub port_id: String,
    pub description: String,
    /// The source value ended in the truncation sentinel (`*`).
    pub truncated: bool,
}

/// One service instance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub device_id: String,
    pub service_id: u64,
    pub service_type: String,
    pub admin_state: String,
    pub oper_state: String,
    pub customer_id: Option<u64>,
    pub name: Option<String>,
    /// The name ended in the truncation sentinel (`*`).
    pub name_truncated: bool,
}

/// One line-card / media-adapter (MDA) row. Both the `show card detail`
/// and `show mda` section shapes populate this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub device_id: String,
    pub slot: String,
    pub provisioned_type: Option<String>,
    pub equipped_type: Option<String>,
    pub admin_state: Option<String>,
    pub oper_state: Option<String>,
    pub max_ports: Option<u32>,
    pub temperature: Option<f64>,
}

/// Failure category for a device whose block carried an error report
/// instead of data. Ordered most specific first, matching the
/// classification rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Timeout,
    Connection,
    Authentication,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Connection => "connection",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device whose body never parsed: the block reported a collection
/// error (timeout, connection, authentication) instead of command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableDevice {
    pub device_id: String,
    pub error_text: String,
    /// `Unknown exception: ...` detail found near the error, when present.
    pub detail: Option<String>,
    pub category: ErrorCategory,
}

/// Consolidated per-device view: one row per inventory entry, derived by
/// joining every record table on the device id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device_id: String,
    pub source: ReportFormat,
    /// Display key combining id and source, unique across the summary table.
    pub id_source: String,
    pub site_code: Option<String>,
    pub site_name: Option<String>,
    pub device_type: String,
    pub serial: Option<String>,
    pub version: Option<String>,
    pub main_version: Option<String>,
    pub temperature: Option<f64>,
    pub fan_status: Option<String>,
    pub critical_led: Option<String>,
    pub total_services: usize,
    pub total_ports: usize,
    pub ports_up: usize,
    pub ports_down: usize,
    pub ports_unused: usize,
    /// Ports configured up but operationally down. The most severe signal.
    pub admin_up_oper_down: usize,
    pub health: HealthState,
    pub reason: String,
}

/// Device flagged by the obsolete-release query (major version below 8.0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObsoleteVersion {
    pub device_id: String,
    pub version: String,
    pub main_version: String,
}

/// Per-site device counts grouped from the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRollup {
    pub site_name: String,
    pub devices: usize,
    pub ok: usize,
    pub alert: usize,
    pub critical: usize,
    pub no_data: usize,
}

/// Roll-up of the unreadable-device table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableReport {
    pub total: usize,
    pub timeout: usize,
    pub connection: usize,
    pub authentication: usize,
    pub unknown: usize,
}

/// Everything one parsing pass produced. Immutable once returned; a fresh
/// pass replaces the whole set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub parse_id: String,
    pub parsed_at: chrono::DateTime<chrono::Utc>,
    pub identities: Vec<DeviceIdentity>,
    pub chassis: Vec<ChassisRecord>,
    pub versions: Vec<VersionRecord>,
    pub ports: Vec<PortRecord>,
    pub port_descriptions: Vec<PortDescriptionRecord>,
    pub services: Vec<ServiceRecord>,
    pub modules: Vec<ModuleRecord>,
    pub unreadable: Vec<UnreadableDevice>,
    pub summaries: Vec<DeviceSummary>,
}

impl ParseResult {
    /// Devices running a release older than 8.0. Informational: obsolescence
    /// is reported beside the health state, never folded into it.
    pub fn obsolete_versions(&self) -> Vec<ObsoleteVersion> {
        self.versions
            .iter()
            .filter_map(|v| {
                let version = v.version.clone()?;
                let main = v.main_version.as_deref()?;
                let major: f64 = main.parse().ok()?;
                if major < 8.0 {
                    Some(ObsoleteVersion {
                        device_id: v.device_id.clone(),
                        version,
                        main_version: main.to_string(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Summary rows grouped by normalized site name, ordered by name.
    /// Rows without a resolved site fall under the `"Unknown"` bucket.
    pub fn site_rollup(&self) -> Vec<SiteRollup> {
        use std::collections::BTreeMap;

        let mut by_site: BTreeMap<&str, SiteRollup> = BTreeMap::new();
        for row in &self.summaries {
            let site = row.site_name.as_deref().unwrap_or("Unknown");
            let entry = by_site.entry(site).or_insert_with(|| SiteRollup {
                site_name: site.to_string(),
                devices: 0,
                ok: 0,
                alert: 0,
                critical: 0,
                no_data: 0,
            });
            entry.devices += 1;
            match row.health {
                HealthState::Ok => entry.ok += 1,
                HealthState::Alert => entry.alert += 1,
                HealthState::Critical => entry.critical += 1,
                HealthState::NoData => entry.no_data += 1,
            }
        }
        by_site.into_values().collect()
    }

    /// Total and per-category counts over the unreadable-device table.
    pub fn unreadable_report(&self) -> UnreadableReport {
        let mut report = UnreadableReport {
            total: self.unreadable.len(),
            timeout: 0,
            connection: 0,
            authentication: 0,
            unknown: 0,
        };
        for dev in &self.unreadable {
            match dev.category {
                ErrorCategory::Timeout => report.timeout += 1,
                ErrorCategory::Connection => report.connection += 1,
                ErrorCategory::Authentication => report.authentication += 1,
                ErrorCategory::Unknown => report.unknown += 1,
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(device_id: &str, version: &str, main: Option<&str>) -> VersionRecord {
        VersionRecord {
            device_id: device_id.to_string(),
            version: Some(version.to_string()),
            main_version: main.map(|s| s.to_string()),
            device_type_hint: None,
        }
    }

    fn empty_result() -> ParseResult {
        ParseResult {
            parse_id: "parse-test".to_string(),
            parsed_at: chrono::Utc::now(),
            identities: vec![],
            chassis: vec![],
            versions: vec![],
            ports: vec![],
            port_descriptions: vec![],
            services: vec![],
            modules: vec![],
            unreadable: vec![],
            summaries: vec![],
        }
    }

    #[test]
    fn test_report_format_labels() {
        assert_eq!(ReportFormat::Nsp19.as_str(), "NSP19");
        assert_eq!(ReportFormat::Nsp24.to_string(), "NSP24");
    }

    #[test]
    fn test_obsolete_versions_threshold() {
        let mut result = empty_result();
        result.versions = vec![
            version("OLD", "7.0.R13", Some("7.0")),
            version("NEW", "8.0.R4", Some("8.0")),
            version("NEWER", "20.10.R6", Some("20.10")),
            version("NOMAIN", "7.0.R13", None),
        ];

        let obsolete = result.obsolete_versions();
        assert_eq!(obsolete.len(), 1);
        assert_eq!(obsolete[0].device_id, "OLD");
        assert_eq!(obsolete[0].main_version, "7.0");
    }

    #[test]
    fn test_unreadable_report_counts() {
        let mut result = empty_result();
        result.unreadable = vec![
            UnreadableDevice {
                device_id: "A".to_string(),
                error_text: "timed out".to_string(),
                detail: None,
                category: ErrorCategory::Timeout,
            },
            UnreadableDevice {
                device_id: "B".to_string(),
                error_text: "timed out".to_string(),
                detail: None,
                category: ErrorCategory::Timeout,
            },
            UnreadableDevice {
                device_id: "C".to_string(),
                error_text: "refused".to_string(),
                detail: None,
                category: ErrorCategory::Connection,
            },
        ];

        let report = result.unreadable_report();
        assert_eq!(report.total, 3);
        assert_eq!(report.timeout, 2);
        assert_eq!(report.connection, 1);
        assert_eq!(report.authentication, 0);
        assert_eq!(report.unknown, 0);
    }

    #[test]
    fn test_error_category_serializes_lowercase() {
        let json = serde_json::to_string(&ErrorCategory::Authentication).unwrap();
        assert_eq!(json, "\"authentication\"");
    }
}
