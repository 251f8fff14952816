//! Budget calculation history
//!
//! [`HistoryStore`] is the seam between the calculator and wherever entries
//! live. [`InMemoryHistory`] keeps them for the lifetime of the process.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{BudgetHistoryEntry, NewBudgetEntry};

/// Append-only log of budget calculations
pub trait HistoryStore: Send + Sync {
    /// Store an entry, assigning the next sequential id (starting at 1)
    fn append(&self, entry: NewBudgetEntry) -> Result<BudgetHistoryEntry>;

    /// Entries submitted under `email`, in insertion order
    fn query_by_email(&self, email: &str) -> Result<Vec<BudgetHistoryEntry>>;
}

/// Process-lifetime history backed by a mutex-guarded vector
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<BudgetHistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(format!("History lock poisoned: {}", e)))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl HistoryStore for InMemoryHistory {
    fn append(&self, entry: NewBudgetEntry) -> Result<BudgetHistoryEntry> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(format!("History lock poisoned: {}", e)))?;

        // Id assignment and push happen under the same lock
        let stored = entry.into_entry(entries.len() as i64 + 1);
        entries.push(stored.clone());
        Ok(stored)
    }

    fn query_by_email(&self, email: &str) -> Result<Vec<BudgetHistoryEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(format!("History lock poisoned: {}", e)))?;

        Ok(entries
            .iter()
            .filter(|entry| entry.email == email)
            .cloned()
            .collect())
    }
}
