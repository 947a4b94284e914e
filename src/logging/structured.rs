//! Structured logging utilities.
//!
//! Provides context-aware logging with parse_id and device id included
//! in every log message. Call sites render the context first and follow
//! it with a SCREAMING_CASE event name plus `key=value` pairs.

use std::fmt;

/// Logging context for one parsing pass.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub parse_id: String,
    pub device: Option<String>,
}

impl LogContext {
    pub fn new(parse_id: &str) -> Self {
        Self {
            parse_id: parse_id.to_string(),
            device: None,
        }
    }

    pub fn with_device(&self, device: &str) -> Self {
        Self {
            parse_id: self.parse_id.clone(),
            device: Some(device.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.device {
            Some(dev) => write!(f, "[parse={}] [device={}]", self.parse_id, dev),
            None => write!(f, "[parse={}]", self.parse_id),
        }
    }
}
