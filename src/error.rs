use thiserror::Error;

/// Failure taxonomy for a dispatch invocation.
///
/// Send failures are deliberately absent: a failed send never aborts the
/// batch and is reported per record in the [`DispatchReport`] instead.
///
/// [`DispatchReport`]: crate::models::report::DispatchReport
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Invalid or inconsistent configuration, raised before any record is
    /// processed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A record violated the input contract (missing required column, or no
    /// valid `to` address left after normalization).
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Positional marker count did not match the configured variable
    /// columns, or a configured column is absent from the record.
    #[error("template render failed: {0}")]
    Render(String),

    /// Table create/read/path-resolution failure from the storage engine.
    #[error("storage operation failed: {0}")]
    Storage(#[from] anyhow::Error),

    /// The historical log append kept conflicting until the bounded retry
    /// policy was exhausted.
    #[error("historical log append failed after {attempts} attempts: {source}")]
    LogWriteExhausted {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
}
