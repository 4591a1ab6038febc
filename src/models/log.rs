use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed five-column schema of the historical notification table. Column
/// order matters to the storage engine.
pub const HISTORY_SCHEMA: &[(&str, &str)] = &[
    ("to_user_emails", "string"),
    ("cc_user_emails", "string"),
    ("notification_type", "string"),
    ("unique_id", "string"),
    ("datetime_sent", "timestamp"),
];

/// One persisted row of the historical notification log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub to_user_emails: String,
    pub cc_user_emails: Option<String>,
    pub notification_type: String,
    pub unique_id: String,
    pub datetime_sent: DateTime<Utc>,
}

/// A log row collected during dispatch, stamped with the write time when
/// the batch is appended.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub to_user_emails: String,
    pub cc_user_emails: Option<String>,
    pub notification_type: String,
    pub unique_id: String,
}

impl PendingEntry {
    pub fn stamped(self, datetime_sent: DateTime<Utc>) -> LogEntry {
        LogEntry {
            to_user_emails: self.to_user_emails,
            cc_user_emails: self.cc_user_emails,
            notification_type: self.notification_type,
            unique_id: self.unique_id,
            datetime_sent,
        }
    }
}
