use chrono::Utc;
use tracing::info;

use crate::clients::storage::TableStore;
use crate::error::DispatchError;
use crate::models::log::{HISTORY_SCHEMA, LogEntry, PendingEntry};
use crate::models::retry::RetryConfig;
use crate::utils::retry_with_backoff;

/// Creates the historical log table with its fixed schema if it does not
/// exist yet.
pub async fn ensure_history_table(
    store: &dyn TableStore,
    table: &str,
) -> Result<(), DispatchError> {
    if !store.table_exists(table).await? {
        info!(table, "Creating historical notification table");
        store.create_table(table, HISTORY_SCHEMA).await?;
    }
    Ok(())
}

/// Appends a batch of pending entries to the historical log, stamped with
/// the current time. Append conflicts from concurrent writers are retried
/// under the given bounded backoff policy; exhausting it surfaces
/// [`DispatchError::LogWriteExhausted`] instead of blocking forever.
pub async fn append_history(
    store: &dyn TableStore,
    table: &str,
    batch: Vec<PendingEntry>,
    retry: &RetryConfig,
) -> Result<usize, DispatchError> {
    if batch.is_empty() {
        return Ok(0);
    }

    ensure_history_table(store, table).await?;
    let path = store.resolve_table_path(table).await?;

    let now = Utc::now();
    let entries: Vec<LogEntry> = batch.into_iter().map(|entry| entry.stamped(now)).collect();
    let count = entries.len();

    let path = path.as_str();
    let entries = entries.as_slice();

    retry_with_backoff(retry, || async move {
        store.append_rows(path, entries).await
    })
    .await
    .map_err(|source| DispatchError::LogWriteExhausted {
        attempts: retry.max_attempts,
        source,
    })?;

    info!(table, appended = count, "Historical notification log updated");
    Ok(count)
}
