//! Health classification logic.
//!
//! Assigns one health state and one reason string per device summary row.

use serde::{Deserialize, Serialize};

use crate::logging::structured::LogContext;

/// Per-device health state. Declared in ascending severity order so the
/// derived `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthState {
    #[serde(rename = "No data")]
    NoData,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Alert")]
    Alert,
    #[serde(rename = "Critical")]
    Critical,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::NoData => "No data",
            HealthState::Ok => "OK",
            HealthState::Alert => "Alert",
            HealthState::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to the classification chain, taken from one device's joined
/// records. Borrowed from the aggregator's working row.
#[derive(Debug, Clone, Copy)]
pub struct HealthSignals<'a> {
    pub total_ports: usize,
    pub ports_up: usize,
    pub ports_down: usize,
    pub admin_up_oper_down: usize,
    pub temperature: Option<f64>,
    pub fan_status: Option<&'a str>,
    pub critical_led: Option<&'a str>,
}

/// Classify one device.
///
/// # Rule chain (first match wins)
/// 0. No ports at all -> NoData ("insufficient data" floor)
/// 1. Any port admin-up but operationally down -> Critical
/// 2. Temperature above 55 -> Critical
/// 3. Critical LED `On` -> Critical
/// 4. Fan status `Failed` -> Critical
/// 5. Down-port ratio over active ports: >50% Critical, >30% Alert
/// 6. Temperature above 45 -> Alert
/// 7. Otherwise -> Ok
///
/// Branches 1-4 short-circuit 5-7: one state, one reason, never cumulative.
pub fn classify(signals: &HealthSignals, ctx: &LogContext) -> (HealthState, String) {
    if signals.total_ports == 0 {
        log::debug!("{} HEALTH_DECISION state=no_data reason=no_ports", ctx);
        return (HealthState::NoData, "Insufficient data".to_string());
    }

    if signals.admin_up_oper_down > 0 {
        log::info!(
            "{} HEALTH_DECISION state=critical reason=admin_up_oper_down count={}",
            ctx,
            signals.admin_up_oper_down
        );
        let noun = if signals.admin_up_oper_down == 1 {
            "port"
        } else {
            "ports"
        };
        return (
            HealthState::Critical,
            format!(
                "Admin up but port state down: {} {}",
                signals.admin_up_oper_down, noun
            ),
        );
    }

    if let Some(temp) = signals.temperature {
        if temp > 55.0 {
            log::info!(
                "{} HEALTH_DECISION state=critical reason=temperature value={}",
                ctx,
                temp
            );
            return (
                HealthState::Critical,
                format!("Critical temperature: {:.1}°C", temp),
            );
        }
    }

    if let Some(led) = signals.critical_led {
        if led.trim() == "On" {
            log::info!("{} HEALTH_DECISION state=critical reason=critical_led", ctx);
            return (HealthState::Critical, "Critical LED on".to_string());
        }
    }

    if let Some(fans) = signals.fan_status {
        if fans.trim() == "Failed" {
            log::info!("{} HEALTH_DECISION state=critical reason=fan_status", ctx);
            return (HealthState::Critical, "Fan failure".to_string());
        }
    }

    // Ratio over active (up + down) ports, not total; skipped when no port
    // reported a definite state.
    let active = signals.ports_up + signals.ports_down;
    if active > 0 {
        let pct = signals.ports_down as f64 * 100.0 / active as f64;
        if pct > 50.0 {
            log::info!(
                "{} HEALTH_DECISION state=critical reason=down_ratio pct={:.1}",
                ctx,
                pct
            );
            return (
                HealthState::Critical,
                format!("More than 50% of ports down: {:.1}%", pct),
            );
        }
        if pct > 30.0 {
            log::info!(
                "{} HEALTH_DECISION state=alert reason=down_ratio pct={:.1}",
                ctx,
                pct
            );
            return (
                HealthState::Alert,
                format!("More than 30% of ports down: {:.1}%", pct),
            );
        }
    }

    if let Some(temp) = signals.temperature {
        if temp > 45.0 {
            log::info!(
                "{} HEALTH_DECISION state=alert reason=temperature value={}",
                ctx,
                temp
            );
            return (
                HealthState::Alert,
                format!("High temperature: {:.1}°C", temp),
            );
        }
    }

    log::debug!("{} HEALTH_DECISION state=ok", ctx);
    (HealthState::Ok, "Device operating normally".to_string())
}
