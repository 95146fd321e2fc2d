//! The set of (date, time) pairs still being watched.
//!
//! Dates keep their insertion order and times keep theirs within a date.
//! Narrowing only ever removes: once a pair is gone it never comes back for
//! the lifetime of the process.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One watched date and the times still open for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub date: String,
    pub times: Vec<String>,
}

impl WatchEntry {
    pub fn new(date: impl Into<String>, times: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            date: date.into(),
            times: times.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    entries: IndexMap<String, IndexSet<String>>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw entries. Duplicate dates are merged and duplicate
    /// times collapsed; dates left with no times are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = WatchEntry>) -> Self {
        let mut map: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for entry in entries {
            map.entry(entry.date).or_default().extend(entry.times);
        }
        map.retain(|_, times| !times.is_empty());
        Self { entries: map }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of watched dates.
    pub fn date_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of watched (date, time) pairs.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(IndexSet::len).sum()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn times(&self, date: &str) -> Option<impl Iterator<Item = &str>> {
        self.entries.get(date).map(|t| t.iter().map(String::as_str))
    }

    pub fn contains(&self, date: &str, time: &str) -> bool {
        self.entries.get(date).is_some_and(|t| t.contains(time))
    }

    /// Every watched pair, in watch order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(date, times)| times.iter().map(move |t| (date.clone(), t.clone())))
            .collect()
    }

    /// Owned snapshot suitable for iterating while the list is narrowed.
    pub fn entries(&self) -> Vec<WatchEntry> {
        self.entries
            .iter()
            .map(|(date, times)| WatchEntry {
                date: date.clone(),
                times: times.iter().cloned().collect(),
            })
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the watched times for `date` with `surviving`, or drop the
    /// date entirely when nothing survives.
    ///
    /// Only times already watched for `date` are kept, so narrowing can
    /// never grow the list. Unknown dates are ignored.
    pub fn narrow<I, S>(&mut self, date: &str, surviving: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(current) = self.entries.get(date) else {
            return;
        };

        let keep: IndexSet<&str> = surviving.into_iter().fold(IndexSet::new(), |mut acc, s| {
            if let Some(t) = current.get(s.as_ref()) {
                acc.insert(t.as_str());
            }
            acc
        });
        let next: IndexSet<String> = current
            .iter()
            .filter(|t| keep.contains(t.as_str()))
            .cloned()
            .collect();

        if next.is_empty() {
            self.entries.shift_remove(date);
        } else {
            self.entries.insert(date.to_string(), next);
        }
    }
}
