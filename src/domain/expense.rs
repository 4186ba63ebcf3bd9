use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use super::{Category, Cents};

/// Text shown in place of a date that could not be understood.
pub const UNKNOWN_DATE: &str = "unknown";

/// The calendar date of an expense.
///
/// Dates that cannot be parsed are kept as `Unknown` with their raw text, so
/// they survive a rewrite of the backing file unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryDate {
    Known(NaiveDate),
    Unknown(String),
}

impl EntryDate {
    /// Parse a date cell. Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339;
    /// anything else becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return EntryDate::Known(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return EntryDate::Known(dt.date());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return EntryDate::Known(dt.date_naive());
        }

        EntryDate::Unknown(raw.to_string())
    }

    pub fn known(&self) -> Option<NaiveDate> {
        match self {
            EntryDate::Known(date) => Some(*date),
            EntryDate::Unknown(_) => None,
        }
    }

    /// Cell text for the backing file.
    pub fn to_storage(&self) -> String {
        match self {
            EntryDate::Known(date) => date.format("%Y-%m-%d").to_string(),
            EntryDate::Unknown(raw) => raw.clone(),
        }
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(date: NaiveDate) -> Self {
        EntryDate::Known(date)
    }
}

impl std::fmt::Display for EntryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryDate::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            EntryDate::Unknown(_) => write!(f, "{}", UNKNOWN_DATE),
        }
    }
}

impl Serialize for EntryDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One logged expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub date: EntryDate,
    pub amount_cents: Cents,
    pub category: Category,
    pub notes: String,
}

impl Expense {
    pub fn new(date: NaiveDate, amount_cents: Cents, category: Category) -> Self {
        Self {
            date: EntryDate::Known(date),
            amount_cents,
            category,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }
}
