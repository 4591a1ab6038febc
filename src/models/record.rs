use std::collections::HashMap;

use crate::error::DispatchError;

const REQUIRED_COLUMNS: [&str; 3] = ["to_user_emails", "cc_user_emails", "unique_id"];

/// One row of the candidate table, with the contract columns lifted into
/// named fields. `variables` keeps every column of the row (required ones
/// included) so any column can serve as a template variable.
#[derive(Debug, Clone)]
pub struct RecipientRecord {
    pub to_user_emails: String,
    pub cc_user_emails: Option<String>,
    pub unique_id: String,
    pub notification_type: Option<String>,
    pub variables: HashMap<String, String>,
}

/// Immutable snapshot of the candidate records for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<RecipientRecord>,
}

impl RecordSet {
    /// Builds a record set from raw rows, validating the input contract up
    /// front: every row must carry `to_user_emails`, `cc_user_emails`, and
    /// `unique_id` columns. An empty `cc_user_emails` value maps to `None`.
    pub fn from_rows(rows: Vec<HashMap<String, String>>) -> Result<Self, DispatchError> {
        let mut records = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            for column in REQUIRED_COLUMNS {
                if !row.contains_key(column) {
                    return Err(DispatchError::InvalidRecord(format!(
                        "row {index} is missing required column `{column}`"
                    )));
                }
            }

            let to_user_emails = row["to_user_emails"].clone();
            let cc_user_emails = Some(row["cc_user_emails"].clone()).filter(|v| !v.is_empty());
            let unique_id = row["unique_id"].clone();
            let notification_type = row.get("notification_type").cloned();

            records.push(RecipientRecord {
                to_user_emails,
                cc_user_emails,
                unique_id,
                notification_type,
                variables: row,
            });
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<RecipientRecord>) -> Self {
        Self { records }
    }

    pub fn into_records(self) -> Vec<RecipientRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipientRecord> {
        self.records.iter()
    }

    /// Stamps the configured notification type onto every record,
    /// overriding any `notification_type` column already present.
    pub fn stamp_notification_type(&mut self, notification_type: &str) {
        for record in &mut self.records {
            record.notification_type = Some(notification_type.to_string());
            record.variables.insert(
                "notification_type".to_string(),
                notification_type.to_string(),
            );
        }
    }

    /// Keeps the first `min(n, len)` records in iteration order.
    pub fn truncate(&mut self, n: usize) {
        let keep = n.min(self.records.len());
        self.records.truncate(keep);
    }
}
