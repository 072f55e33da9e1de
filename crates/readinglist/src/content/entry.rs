use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::date::{format_date, parse_date, ZERO_DATE};

/// An article in the reading list.
#[derive(Debug, PartialEq, Eq, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(deserialize_with = "from_date_cell")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Error, Debug)]
pub enum LoadEntriesError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse entries: {0}")]
    Parse(#[from] csv::Error),
}

impl Entry {
    /// Reads and parses every entry in the CSV file at the given path.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>, LoadEntriesError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| LoadEntriesError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::parse_all(&contents)
    }

    /// Parses entries from CSV data with a header row.
    ///
    /// Columns are matched by header name. Unknown columns are ignored and
    /// missing ones are left empty.
    pub fn parse_all(data: &[u8]) -> Result<Vec<Self>, LoadEntriesError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data);

        let entries = reader.deserialize().collect::<Result<Vec<Self>, _>>()?;

        Ok(entries)
    }

    /// The date used for grouping and sorting.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(*ZERO_DATE)
    }

    pub fn formatted_date(&self) -> String {
        format_date(&self.effective_date())
    }
}

fn from_date_cell<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    parse_date(text).map(Some).map_err(D::Error::custom)
}
