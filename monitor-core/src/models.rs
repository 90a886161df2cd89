use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{error::Result, logging::Severity};

/// Layout of `ProbeResult::time`, local time with second precision.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status label written when the probe itself faulted.
pub const EXCEPTION_STATUS: &str = "Exception";

/// Classification of an echo reply, or of its absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyStatus {
    Success,
    TimedOut,
    DestinationHostUnreachable,
    DestinationNetworkUnreachable,
    Unknown,
}

impl ReplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStatus::Success => "Success",
            ReplyStatus::TimedOut => "TimedOut",
            ReplyStatus::DestinationHostUnreachable => "DestinationHostUnreachable",
            ReplyStatus::DestinationNetworkUnreachable => "DestinationNetworkUnreachable",
            ReplyStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single probe produced: a classified reply, or a fault of the probe
/// mechanism (resolution, permissions, sockets) described by its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reply(ReplyStatus),
    Fault(String),
}

/// One log record per host per sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProbeResult {
    pub time: String,
    pub host: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl ProbeResult {
    pub fn new(time: DateTime<Local>, host: impl Into<String>, outcome: ProbeOutcome) -> Self {
        let (status, exception) = match outcome {
            ProbeOutcome::Reply(status) => (status.to_string(), None),
            ProbeOutcome::Fault(message) => (EXCEPTION_STATUS.to_string(), Some(message)),
        };

        Self {
            time: time.format(TIME_FORMAT).to_string(),
            host: host.into(),
            status,
            exception,
        }
    }

    pub fn is_fault(&self) -> bool {
        self.exception.is_some()
    }

    pub fn severity(&self) -> Severity {
        if self.is_fault() {
            Severity::Error
        } else {
            Severity::Info
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_reply_serializes_without_exception() {
        let result = ProbeResult::new(fixed_time(), "example.com", ProbeOutcome::Reply(ReplyStatus::Success));

        assert_eq!(
            result.to_json().unwrap(),
            r#"{"Time":"2024-01-01 00:00:00","Host":"example.com","Status":"Success"}"#
        );
        assert_eq!(result.severity(), Severity::Info);
    }

    #[test]
    fn test_fault_serializes_exception() {
        let result = ProbeResult::new(
            fixed_time(),
            "bad-host",
            ProbeOutcome::Fault("failed to resolve host bad-host".to_string()),
        );

        assert_eq!(
            result.to_json().unwrap(),
            r#"{"Time":"2024-01-01 00:00:00","Host":"bad-host","Status":"Exception","Exception":"failed to resolve host bad-host"}"#
        );
        assert!(result.is_fault());
        assert_eq!(result.severity(), Severity::Error);
    }

    #[test]
    fn test_non_success_reply_is_info() {
        let result = ProbeResult::new(fixed_time(), "10.0.0.9", ProbeOutcome::Reply(ReplyStatus::TimedOut));
        assert_eq!(result.status, "TimedOut");
        assert_eq!(result.exception, None);
        assert_eq!(result.severity(), Severity::Info);
    }

    #[test]
    fn test_deserialize_keeps_exception_message() {
        let result = ProbeResult::new(
            fixed_time(),
            "bad-host",
            ProbeOutcome::Fault("permission denied (os error 13)".to_string()),
        );
        let parsed: ProbeResult = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(parsed.exception.as_deref(), Some("permission denied (os error 13)"));

        let parsed: ProbeResult = serde_json::from_str(
            r#"{"Time":"2024-01-01 00:00:00","Host":"example.com","Status":"Success"}"#,
        )
        .unwrap();
        assert_eq!(parsed.exception, None);

        let parsed: ProbeResult = serde_json::from_str(
            r#"{"Time":"2024-01-01 00:00:00","Host":"example.com","Status":"Success","Exception":null}"#,
        )
        .unwrap();
        assert!(!parsed.is_fault());
    }

    #[test]
    fn test_reply_status_labels_match_serde() {
        for status in [
            ReplyStatus::Success,
            ReplyStatus::TimedOut,
            ReplyStatus::DestinationHostUnreachable,
            ReplyStatus::DestinationNetworkUnreachable,
            ReplyStatus::Unknown,
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", status));
        }
    }
}
