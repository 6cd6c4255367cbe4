use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one dispatch. Any failed recipient makes it `Partial`,
/// including the case where every recipient failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Partial,
}

impl DeliveryStatus {
    pub fn from_failures(failed: usize) -> Self {
        if failed == 0 {
            DeliveryStatus::Sent
        } else {
            DeliveryStatus::Partial
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown delivery status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for DeliveryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(DeliveryStatus::Sent),
            "partial" => Ok(DeliveryStatus::Partial),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLog {
    pub id: i64,
    pub summary_id: i64,
    /// Every recipient of the dispatch, in request order, joined with ", ".
    pub recipient_emails: String,
    pub sent_at: DateTime<Utc>,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogList {
    pub email_logs: Vec<DeliveryLog>,
    pub count: usize,
}

impl From<Vec<DeliveryLog>> for DeliveryLogList {
    fn from(email_logs: Vec<DeliveryLog>) -> Self {
        let count = email_logs.len();
        Self { email_logs, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_failure_is_partial() {
        assert_eq!(DeliveryStatus::from_failures(0), DeliveryStatus::Sent);
        assert_eq!(DeliveryStatus::from_failures(1), DeliveryStatus::Partial);
        assert_eq!(DeliveryStatus::from_failures(5), DeliveryStatus::Partial);
    }

    #[test]
    fn status_parses_stored_values() {
        assert_eq!("sent".parse::<DeliveryStatus>().unwrap(), DeliveryStatus::Sent);
        assert_eq!(
            "partial".parse::<DeliveryStatus>().unwrap(),
            DeliveryStatus::Partial
        );
        assert!("failed".parse::<DeliveryStatus>().is_err());
    }
}
