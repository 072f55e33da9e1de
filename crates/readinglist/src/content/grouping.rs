use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use derive_more::Deref;
use indexmap::IndexMap;

use crate::content::Entry;

/// Identifies a calendar month by its first day.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn for_date(date: &DateTime<Utc>) -> Self {
        let date = date.date_naive();

        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn for_entry(entry: &Entry) -> Self {
        Self::for_date(&entry.effective_date())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.format("%B"), self.0.year())
    }
}

/// The entries for a single month, newest first.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MonthGroup {
    pub key: MonthKey,
    pub entries: Vec<Entry>,
}

/// Month groups, newest month first.
#[derive(Debug, Default, PartialEq, Eq, Deref)]
pub struct MonthGroups(Vec<MonthGroup>);

impl MonthGroups {
    /// Returns the total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.0.iter().map(|group| group.entries.len()).sum()
    }
}

/// Buckets the entries by month and sorts everything by date, descending.
///
/// Sorting is stable, so entries that share a date keep their input order.
pub fn group_entries_by_month(entries: Vec<Entry>) -> MonthGroups {
    let mut groups: IndexMap<MonthKey, Vec<Entry>> = IndexMap::new();

    for entry in entries {
        groups
            .entry(MonthKey::for_entry(&entry))
            .or_default()
            .push(entry);
    }

    let mut groups = groups
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));

            MonthGroup { key, entries }
        })
        .collect::<Vec<_>>();

    groups.sort_by(|a, b| b.key.cmp(&a.key));

    MonthGroups(groups)
}
