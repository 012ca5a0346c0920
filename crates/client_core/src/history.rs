//! Navigation history seam: where the controller reads and pushes the
//! browser query string.

use std::sync::{Mutex, MutexGuard};

pub trait NavigationHistory: Send + Sync {
    /// Query string of the current entry, without the leading `?`.
    fn current_query(&self) -> String;

    /// Appends a new entry after the current one, dropping any forward
    /// entries, without reloading anything.
    fn push(&self, query: &str);
}

/// In-process history stack with back/forward navigation.
pub struct MemoryHistory {
    path: String,
    inner: Mutex<HistoryStack>,
}

struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(HistoryStack {
                entries: vec![query.trim_start_matches('?').to_string()],
                cursor: 0,
            }),
        }
    }

    /// Splits `"/action-history?page=2"` into path and query.
    pub fn from_url(url: &str) -> Self {
        match url.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(url, ""),
        }
    }

    fn stack(&self) -> MutexGuard<'_, HistoryStack> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path plus query, with the `?` only when the query is non-empty.
    pub fn current_url(&self) -> String {
        let query = self.current_query();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        }
    }

    pub fn len(&self) -> usize {
        self.stack().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<String> {
        self.stack().entries.clone()
    }

    /// Returns `false` when already at the oldest entry.
    pub fn back(&self) -> bool {
        let mut stack = self.stack();
        if stack.cursor == 0 {
            return false;
        }
        stack.cursor -= 1;
        true
    }

    /// Returns `false` when already at the newest entry.
    pub fn forward(&self) -> bool {
        let mut stack = self.stack();
        if stack.cursor + 1 >= stack.entries.len() {
            return false;
        }
        stack.cursor += 1;
        true
    }
}

impl NavigationHistory for MemoryHistory {
    fn current_query(&self) -> String {
        let stack = self.stack();
        stack.entries[stack.cursor].clone()
    }

    fn push(&self, query: &str) {
        let mut stack = self.stack();
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(query.trim_start_matches('?').to_string());
        stack.cursor = stack.entries.len() - 1;
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
