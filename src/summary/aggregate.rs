//! Summary rollup: one row per inventoried device.
//!
//! The rollup joins every record table on the device id, derives the
//! display fields (site, model, id+source key) and hands the counters to
//! the health classifier. Devices with no surviving records still get a
//! row; they classify as `NoData`.

use std::collections::HashMap;

use crate::pipeline::context::ParseContext;
use crate::records::{
    ChassisRecord, DeviceIdentity, DeviceSummary, PortRecord, ServiceRecord, VersionRecord,
};
use crate::resolve::{extract_site_code, normalize_site, resolve_device_type};
use crate::summary::health::{classify, HealthSignals, HealthState};

fn index_by_device<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

/// Build the summary table for every device in the inventory.
pub fn summarize(
    ctx: &ParseContext,
    identities: &[DeviceIdentity],
    services: &[ServiceRecord],
    ports: &[PortRecord],
    chassis: &[ChassisRecord],
    versions: &[VersionRecord],
) -> Vec<DeviceSummary> {
    let services_by = index_by_device(services, |r| r.device_id.as_str());
    let ports_by = index_by_device(ports, |r| r.device_id.as_str());
    let chassis_by = index_by_device(chassis, |r| r.device_id.as_str());
    let versions_by = index_by_device(versions, |r| r.device_id.as_str());

    let mut summaries = Vec::with_capacity(identities.len());
    for identity in identities {
        let id = identity.device_id.as_str();
        let log_ctx = ctx.device_context(id, identity.source).log_context();

        let device_ports = ports_by.get(id).map(Vec::as_slice).unwrap_or(&[]);
        let total_ports = device_ports.len();
        let ports_up = device_ports
            .iter()
            .filter(|p| p.port_state == "Up")
            .count();
        let ports_down = device_ports
            .iter()
            .filter(|p| p.port_state == "Down")
            .count();
        let ports_unused = total_ports - ports_up - ports_down;
        let admin_up_oper_down = device_ports
            .iter()
            .filter(|p| p.admin_state == "Up" && p.port_state == "Down")
            .count();

        // At most one chassis/version section per block; extra records from
        // a repeated banner lose to the first.
        let first_chassis = chassis_by.get(id).and_then(|rows| rows.first()).copied();
        let first_version = versions_by.get(id).and_then(|rows| rows.first()).copied();

        let chassis_type = first_chassis.and_then(|c| c.chassis_type.as_deref());
        let hint = first_version.and_then(|v| v.device_type_hint.as_deref());
        let device_type = resolve_device_type(chassis_type, hint, id);

        let site_code = extract_site_code(id);
        let site_name = site_code.as_deref().and_then(normalize_site);

        let temperature = first_chassis.and_then(|c| c.temperature);
        let fan_status = first_chassis.and_then(|c| c.fan_status.clone());
        let critical_led = first_chassis.and_then(|c| c.critical_led.clone());

        let (health, reason) = classify(
            &HealthSignals {
                total_ports,
                ports_up,
                ports_down,
                admin_up_oper_down,
                temperature,
                fan_status: fan_status.as_deref(),
                critical_led: critical_led.as_deref(),
            },
            &log_ctx,
        );

        summaries.push(DeviceSummary {
            device_id: identity.device_id.clone(),
            source: identity.source,
            id_source: format!("{}_{}", identity.device_id, identity.source.as_str()),
            site_code,
            site_name,
            device_type,
            serial: first_chassis.and_then(|c| c.serial.clone()),
            version: first_version.and_then(|v| v.version.clone()),
            main_version: first_version.and_then(|v| v.main_version.clone()),
            temperature,
            fan_status,
            critical_led,
            total_services: services_by.get(id).map_or(0, Vec::len),
            total_ports,
            ports_up,
            ports_down,
            ports_unused,
            admin_up_oper_down,
            health,
            reason,
        });
    }

    let mut ok = 0;
    let mut alert = 0;
    let mut critical = 0;
    let mut no_data = 0;
    for summary in &summaries {
        match summary.health {
            HealthState::Ok => ok += 1,
            HealthState::Alert => alert += 1,
            HealthState::Critical => critical += 1,
            HealthState::NoData => no_data += 1,
        }
    }
    log::info!(
        "{} SUMMARY_COMPLETE devices={} ok={} alert={} critical={} no_data={}",
        ctx.log_context(),
        summaries.len(),
        ok,
        alert,
        critical,
        no_data
    );

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ReportFormat;

    fn identity(id: &str) -> DeviceIdentity {
        DeviceIdentity {
            device_id: id.to_string(),
            source: ReportFormat::Nsp19,
        }
    }

    fn port(device: &str, admin: &str, state: &str) -> PortRecord {
        PortRecord {
            device_id: device.to_string(),
            port_id: "1/1/1".to_string(),
            admin_state: admin.to_string(),
            link: None,
            port_state: state.to_string(),
            cfg_mtu: None,
            oper_mtu: None,
            lag: None,
            port_mode: None,
            encap: None,
            port_type: None,
            media: None,
        }
    }

    fn chassis(device: &str) -> ChassisRecord {
        ChassisRecord {
            device_id: device.to_string(),
            name: Some(device.to_string()),
            chassis_type: Some("7210 SAS-K 2F4T6C".to_string()),
            location: None,
            serial: Some("NS1234F0001".to_string()),
            temperature: Some(38.0),
            fan_status: Some("up".to_string()),
            critical_led: Some("Off".to_string()),
            major_led: None,
            over_temp: None,
            power_status: None,
        }
    }

    fn version(device: &str, hint: Option<&str>) -> VersionRecord {
        VersionRecord {
            device_id: device.to_string(),
            version: Some("10.0.R8".to_string()),
            main_version: Some("10.0".to_string()),
            device_type_hint: hint.map(str::to_string),
        }
    }

    fn service(device: &str, service_id: u64) -> ServiceRecord {
        ServiceRecord {
            device_id: device.to_string(),
            service_id,
            service_type: "VPLS".to_string(),
            admin_state: "Up".to_string(),
            oper_state: "Up".to_string(),
            customer_id: Some(1),
            name: None,
            name_truncated: false,
        }
    }

    #[test]
    fn test_identity_without_records_gets_no_data_row() {
        let identities = vec![identity("BOG_NOR_7210_01")];
        let summaries = summarize(&ParseContext::new(), &identities, &[], &[], &[], &[]);

        assert_eq!(summaries.len(), 1);
        let row = &summaries[0];
        assert_eq!(row.health, HealthState::NoData);
        assert_eq!(row.reason, "Insufficient data");
        assert_eq!(row.total_ports, 0);
        // The identifier still yields a model family and a site.
        assert_eq!(row.device_type, "7210 SAS");
        assert_eq!(row.site_code.as_deref(), Some("BOG"));
    }

    #[test]
    fn test_port_counters() {
        let identities = vec![identity("DEV_A")];
        let ports = vec![
            port("DEV_A", "Up", "Up"),
            port("DEV_A", "Up", "Up"),
            port("DEV_A", "Up", "Down"),
            port("DEV_A", "Down", "Down"),
            port("DEV_A", "Down", "Ghost"),
        ];
        let summaries = summarize(&ParseContext::new(), &identities, &[], &ports, &[], &[]);

        let row = &summaries[0];
        assert_eq!(row.total_ports, 5);
        assert_eq!(row.ports_up, 2);
        assert_eq!(row.ports_down, 2);
        assert_eq!(row.ports_unused, 1);
        assert_eq!(row.admin_up_oper_down, 1);
    }

    #[test]
    fn test_admin_up_oper_down_drives_critical() {
        let identities = vec![identity("DEV_A")];
        let ports = vec![port("DEV_A", "Up", "Up"), port("DEV_A", "Up", "Down")];
        let summaries = summarize(&ParseContext::new(), &identities, &[], &ports, &[], &[]);

        let row = &summaries[0];
        assert_eq!(row.health, HealthState::Critical);
        assert_eq!(row.reason, "Admin up but port state down: 1 port");
    }

    #[test]
    fn test_chassis_fields_flow_through() {
        let identities = vec![identity("DEV_A")];
        let ports = vec![port("DEV_A", "Up", "Up")];
        let chassis = vec![chassis("DEV_A")];
        let versions = vec![version("DEV_A", Some("7210 SAS-K"))];
        let summaries =
            summarize(&ParseContext::new(), &identities, &[], &ports, &chassis, &versions);

        let row = &summaries[0];
        assert_eq!(row.health, HealthState::Ok);
        assert_eq!(row.serial.as_deref(), Some("NS1234F0001"));
        assert_eq!(row.temperature, Some(38.0));
        assert_eq!(row.version.as_deref(), Some("10.0.R8"));
        assert_eq!(row.main_version.as_deref(), Some("10.0"));
        // Chassis type outranks the version-section hint.
        assert_eq!(row.device_type, "7210 SAS-K 2F4T6C");
    }

    #[test]
    fn test_invalid_hint_falls_back_to_id() {
        let identities = vec![identity("MED_SUR_7750_02")];
        let versions = vec![version("MED_SUR_7750_02", Some("Copyright"))];
        let summaries = summarize(&ParseContext::new(), &identities, &[], &[], &[], &versions);

        assert_eq!(summaries[0].device_type, "7750 SR");
    }

    #[test]
    fn test_id_source_key() {
        let identities = vec![
            DeviceIdentity {
                device_id: "DEV_A".to_string(),
                source: ReportFormat::Nsp19,
            },
            DeviceIdentity {
                device_id: "DEV_A".to_string(),
                source: ReportFormat::Nsp24,
            },
        ];
        let summaries = summarize(&ParseContext::new(), &identities, &[], &[], &[], &[]);

        assert_eq!(summaries[0].id_source, "DEV_A_NSP19");
        assert_eq!(summaries[1].id_source, "DEV_A_NSP24");
    }

    #[test]
    fn test_service_count() {
        let identities = vec![identity("DEV_A"), identity("DEV_B")];
        let services = vec![
            service("DEV_A", 1001),
            service("DEV_A", 1002),
            service("DEV_B", 2001),
        ];
        let summaries = summarize(&ParseContext::new(), &identities, &services, &[], &[], &[]);

        assert_eq!(summaries[0].total_services, 2);
        assert_eq!(summaries[1].total_services, 1);
    }

    #[test]
    fn test_first_chassis_record_wins() {
        let identities = vec![identity("DEV_A")];
        let mut second = chassis("DEV_A");
        second.serial = Some("OTHER".to_string());
        let chassis_rows = vec![chassis("DEV_A"), second];
        let ports = vec![port("DEV_A", "Up", "Up")];
        let summaries =
            summarize(&ParseContext::new(), &identities, &[], &ports, &chassis_rows, &[]);

        assert_eq!(summaries[0].serial.as_deref(), Some("NS1234F0001"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_port_states() -> impl Strategy<Value = Vec<(bool, u8)>> {
            // (admin up?, state: 0=Up 1=Down 2=other)
            prop::collection::vec((any::<bool>(), 0u8..3), 0..40)
        }

        proptest! {
            #[test]
            fn counters_partition_the_port_table(states in arb_port_states()) {
                let ports: Vec<PortRecord> = states
                    .iter()
                    .map(|(admin, state)| {
                        port(
                            "DEV_A",
                            if *admin { "Up" } else { "Down" },
                            match state {
                                0 => "Up",
                                1 => "Down",
                                _ => "Ghost",
                            },
                        )
                    })
                    .collect();

                let identities = vec![identity("DEV_A")];
                let summaries =
                    summarize(&ParseContext::new(), &identities, &[], &ports, &[], &[]);
                let row = &summaries[0];

                prop_assert_eq!(row.ports_up + row.ports_down + row.ports_unused, row.total_ports);
                prop_assert!(row.admin_up_oper_down <= row.ports_down);
                if row.total_ports == 0 {
                    prop_assert_eq!(row.health, HealthState::NoData);
                }
            }

            #[test]
            fn summary_is_deterministic(states in arb_port_states()) {
                let ports: Vec<PortRecord> = states
                    .iter()
                    .map(|(admin, state)| {
                        port(
                            "DEV_A",
                            if *admin { "Up" } else { "Down" },
                            if *state == 0 { "Up" } else { "Down" },
                        )
                    })
                    .collect();

                let identities = vec![identity("DEV_A")];
                let ctx = ParseContext::new();
                let first = summarize(&ctx, &identities, &[], &ports, &[], &[]);
                let second = summarize(&ctx, &identities, &[], &ports, &[], &[]);
                prop_assert_eq!(first, second);
            }
        }
    }
}
