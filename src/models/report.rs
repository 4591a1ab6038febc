/// Per-record send outcome. Failed sends carry the reason instead of being
/// swallowed into log output only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    DryRun,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub unique_id: String,
    /// Effective destination addresses, comma-joined (the test list when
    /// test mode redirected the message).
    pub to_user_emails: String,
    pub status: SendStatus,
}

/// Batch report returned to the caller so partial failure is detectable
/// programmatically.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<RecordOutcome>,
    pub log_entries_appended: usize,
}

impl DispatchReport {
    pub fn sent_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::Sent))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::Failed(_)))
    }

    pub fn dry_run_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::DryRun))
    }

    fn count(&self, predicate: impl Fn(&SendStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}
