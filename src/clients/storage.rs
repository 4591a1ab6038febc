use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

use crate::models::log::LogEntry;

/// Abstraction over the append-only table storage engine backing the
/// historical notification log. Appends go through a resolved table path
/// and may fail transiently on concurrent writes.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn table_exists(&self, name: &str) -> Result<bool, Error>;

    async fn create_table(&self, name: &str, schema: &[(&str, &str)]) -> Result<(), Error>;

    async fn read_table(&self, name: &str) -> Result<Vec<LogEntry>, Error>;

    async fn resolve_table_path(&self, name: &str) -> Result<String, Error>;

    async fn append_rows(&self, path: &str, entries: &[LogEntry]) -> Result<(), Error>;
}

const MEMORY_PATH_PREFIX: &str = "memory://";

struct StoreInner {
    tables: HashMap<String, Vec<LogEntry>>,
    fail_next_appends: u32,
    append_attempts: u32,
}

/// In-memory table store. Used by tests and local runs; supports injecting
/// transient append conflicts to exercise the retry path.
pub struct InMemoryTableStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                tables: HashMap::new(),
                fail_next_appends: 0,
                append_attempts: 0,
            }),
        }
    }

    /// Makes the next `n` append attempts fail with a conflict error.
    pub fn fail_next_appends(&self, n: u32) {
        self.inner.lock().unwrap().fail_next_appends = n;
    }

    pub fn append_attempts(&self) -> u32 {
        self.inner.lock().unwrap().append_attempts
    }

    pub fn rows(&self, name: &str) -> Vec<LogEntry> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Creates `name` if needed and pre-populates it with `entries`.
    pub fn seed(&self, name: &str, entries: Vec<LogEntry>) {
        self.inner
            .lock()
            .unwrap()
            .tables
            .entry(name.to_string())
            .or_default()
            .extend(entries);
    }
}

impl Default for InMemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn table_exists(&self, name: &str) -> Result<bool, Error> {
        Ok(self.inner.lock().unwrap().tables.contains_key(name))
    }

    async fn create_table(&self, name: &str, schema: &[(&str, &str)]) -> Result<(), Error> {
        debug!(table = name, columns = schema.len(), "Creating table");
        self.inner
            .lock()
            .unwrap()
            .tables
            .insert(name.to_string(), Vec::new());
        Ok(())
    }

    async fn read_table(&self, name: &str) -> Result<Vec<LogEntry>, Error> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("table {} does not exist", name))
    }

    async fn resolve_table_path(&self, name: &str) -> Result<String, Error> {
        let inner = self.inner.lock().unwrap();
        if !inner.tables.contains_key(name) {
            return Err(anyhow!("cannot resolve path of missing table {}", name));
        }
        Ok(format!("{MEMORY_PATH_PREFIX}{name}"))
    }

    async fn append_rows(&self, path: &str, entries: &[LogEntry]) -> Result<(), Error> {
        let name = path
            .strip_prefix(MEMORY_PATH_PREFIX)
            .ok_or_else(|| anyhow!("unrecognized table path {}", path))?;

        let mut inner = self.inner.lock().unwrap();
        inner.append_attempts += 1;

        if inner.fail_next_appends > 0 {
            inner.fail_next_appends -= 1;
            return Err(anyhow!("concurrent append conflict on {}", name));
        }

        let rows = inner
            .tables
            .get_mut(name)
            .ok_or_else(|| anyhow!("table {} does not exist", name))?;
        rows.extend_from_slice(entries);
        Ok(())
    }
}
