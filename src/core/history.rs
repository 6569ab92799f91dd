//! Committed-transition history.
//!
//! Entities that want an audit trail of combinations they moved through can
//! keep an [`ActionHistory`]. The engine itself never stores history; the
//! in-memory entity records into one on every commit.

use super::flag::Combination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one committed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub from: Combination,
    pub to: Combination,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, immutable history of committed transitions.
///
/// `record` returns a new history with the transition appended.
///
/// # Example
///
/// ```rust
/// use multistate::{ActionHistory, ActionRecord};
/// use chrono::Utc;
///
/// let history = ActionHistory::new()
///     .record(ActionRecord { from: 0, to: 1, timestamp: Utc::now() })
///     .record(ActionRecord { from: 1, to: 5, timestamp: Utc::now() });
///
/// assert_eq!(history.get_path(), vec![0, 1, 5]);
/// assert_eq!(history.current(), Some(5));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActionHistory {
    records: Vec<ActionRecord>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: ActionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Combinations visited, starting with the first source.
    pub fn get_path(&self) -> Vec<Combination> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// The last committed combination, if any.
    pub fn current(&self) -> Option<Combination> {
        self.records.last().map(|r| r.to)
    }

    /// Time elapsed between the first and the last record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
