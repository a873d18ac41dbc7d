use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::MetricKey;

pub const DEFAULT_SELECTED_METRICS: [&str; 3] = ["revenue", "expenses", "profit"];

/// Set of metric keys currently drawn.
///
/// Selection only gates rendering; it never changes what is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    active: IndexSet<MetricKey>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::from_keys(DEFAULT_SELECTED_METRICS)
    }
}

impl SelectionState {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            active: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<MetricKey>,
    {
        Self {
            active: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Removes `key` when present, adds it otherwise.
    ///
    /// Returns `true` when the key is active after the call.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.active.shift_remove(key) {
            false
        } else {
            self.active.insert(MetricKey::new(key));
            true
        }
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.active.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.active.iter()
    }
}
