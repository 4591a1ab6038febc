use std::collections::HashSet;

use tracing::info;

use crate::clients::storage::TableStore;
use crate::error::DispatchError;
use crate::log_writer::ensure_history_table;
use crate::models::record::RecordSet;

/// Drops every candidate record whose `(to_user_emails, unique_id,
/// notification_type)` string-tuple already appears in the historical log.
///
/// The compound key deliberately includes `to_user_emails`: the same
/// `unique_id` sent to a different address is not deduplicated, so a
/// notification can be resent after a recipient correction.
///
/// Creates the log table first if it does not exist, so a fresh deployment
/// filters against an empty history instead of failing.
pub async fn filter_already_sent(
    records: RecordSet,
    store: &dyn TableStore,
    table: &str,
    notification_type: &str,
) -> Result<RecordSet, DispatchError> {
    ensure_history_table(store, table).await?;

    let history = store.read_table(table).await?;
    let sent: HashSet<(&str, &str, &str)> = history
        .iter()
        .map(|entry| {
            (
                entry.to_user_emails.as_str(),
                entry.unique_id.as_str(),
                entry.notification_type.as_str(),
            )
        })
        .collect();

    let before = records.len();
    let kept: Vec<_> = records
        .into_records()
        .into_iter()
        .filter(|record| {
            !sent.contains(&(
                record.to_user_emails.as_str(),
                record.unique_id.as_str(),
                notification_type,
            ))
        })
        .collect();

    info!(
        table,
        notification_type,
        excluded = before - kept.len(),
        remaining = kept.len(),
        "Filtered records already present in historical log"
    );

    Ok(RecordSet::from_records(kept))
}
