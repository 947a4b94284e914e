//! Pipeline context management.
//!
//! Provides parse-run and per-device context for logging and state tracking.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::records::ReportFormat;

/// Context for one parsing pass over a concatenated report.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub parse_id: String,
    pub started_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::with_received_at(None)
    }

    /// `received_at` is the host layer's upload timestamp, RFC 3339. An
    /// unparseable value is dropped rather than failing the pass.
    pub fn with_received_at(received_at: Option<&str>) -> Self {
        let parse_id = format!("parse-{}", &Uuid::new_v4().to_string()[..8]);

        let received = received_at.and_then(|ts| {
            DateTime::parse_from_rfc3339(ts)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Self {
            parse_id,
            started_at: Utc::now(),
            received_at: received,
        }
    }

    /// Create a device context for one block within this pass.
    pub fn device_context(&self, device_id: &str, source: ReportFormat) -> DeviceContext {
        DeviceContext {
            parse_id: self.parse_id.clone(),
            device_id: device_id.to_string(),
            source,
        }
    }

    pub fn log_context(&self) -> crate::logging::structured::LogContext {
        crate::logging::structured::LogContext::new(&self.parse_id)
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Context for a single device block within a parsing pass.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub parse_id: String,
    pub device_id: String,
    pub source: ReportFormat,
}

impl DeviceContext {
    pub fn log_context(&self) -> crate::logging::structured::LogContext {
        crate::logging::structured::LogContext::new(&self.parse_id).with_device(&self.device_id)
    }
}
