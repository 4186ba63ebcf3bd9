use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::{LedgerError, Result};
use crate::domain::{Category, EntryDate, Expense, Ledger, ParseCentsError, format_cents, parse_cents};

/// Column header of the backing file, in storage order.
pub const HEADER: [&str; 4] = ["date", "amount", "category", "notes"];

/// Default backing file, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";

/// Where the ledger lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_FILE)
    }
}

/// Why a backing file could not be turned into a ledger.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("missing header row")]
    MissingHeader,

    #[error("unexpected header: {0}")]
    UnexpectedHeader(String),

    #[error("line {line}: expected 4 columns, found {found}")]
    ColumnCount { line: u64, found: usize },

    #[error("line {line}: invalid amount '{value}': {source}")]
    InvalidAmount {
        line: u64,
        value: String,
        source: ParseCentsError,
    },

    #[error("line {line}: unknown category '{value}'")]
    UnknownCategory { line: u64, value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Durable, append-only store for the expense ledger, backed by a CSV file.
///
/// Every operation goes back to disk; nothing is cached between calls.
/// There is no locking: a single writer process is assumed.
pub struct LedgerStore {
    config: StoreConfig,
}

impl LedgerStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Create the backing file with only the header row, unless it already exists.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.exists() {
            debug!(path = %self.path().display(), "ledger already initialized");
            return Ok(());
        }

        info!(path = %self.path().display(), "creating empty ledger");
        self.write_all(&Ledger::new())
    }

    /// Read every expense from the backing file, in entry order.
    pub fn load_all(&self) -> Result<Ledger> {
        let path = self.path();
        let file = File::open(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot open ledger");
            LedgerError::read(path, e)
        })?;

        let ledger = read_ledger(file).map_err(|e| {
            warn!(path = %path.display(), error = %e, "rejecting malformed ledger");
            LedgerError::read(path, e)
        })?;

        debug!(path = %path.display(), records = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    /// Add one expense to the end of the ledger and rewrite the whole file.
    pub fn append(&self, expense: Expense) -> Result<()> {
        let mut ledger = self.load_all()?;
        ledger.push(expense);
        self.write_all(&ledger)?;

        info!(path = %self.path().display(), records = ledger.len(), "expense appended");
        Ok(())
    }

    /// Replace the backing file with `ledger`: write a sibling temp file, then rename it over.
    fn write_all(&self, ledger: &Ledger) -> Result<()> {
        let path = self.path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::write(path, e))?;
        }

        let tmp = tmp_path(path);
        let written = File::create(&tmp)
            .map_err(csv::Error::from)
            .and_then(|file| write_ledger(file, ledger))
            .and_then(|file| file.sync_all().map_err(csv::Error::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(LedgerError::write(path, e));
        }

        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            LedgerError::write(path, e)
        })?;

        debug!(path = %path.display(), records = ledger.len(), "ledger rewritten");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Parse a ledger from CSV text. The header row is required; a row with the
/// wrong shape, amount or category fails the whole read. Unreadable dates are
/// kept as [`EntryDate::Unknown`].
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger, FormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let header = records.next().ok_or(FormatError::MissingHeader)??;
    let header_matches = header.len() == HEADER.len()
        && header
            .iter()
            .zip(HEADER)
            .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected));
    if !header_matches {
        return Err(FormatError::UnexpectedHeader(
            header.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut ledger = Ledger::new();
    for result in records {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != HEADER.len() {
            return Err(FormatError::ColumnCount {
                line,
                found: record.len(),
            });
        }

        let amount = &record[1];
        let amount_cents = parse_cents(amount).map_err(|source| FormatError::InvalidAmount {
            line,
            value: amount.to_string(),
            source,
        })?;

        let category = &record[2];
        let category = Category::parse_label(category).ok_or_else(|| FormatError::UnknownCategory {
            line,
            value: category.to_string(),
        })?;

        ledger.push(Expense {
            date: EntryDate::parse(&record[0]),
            amount_cents,
            category,
            notes: record[3].to_string(),
        });
    }

    Ok(ledger)
}

/// Write a ledger as CSV, header first, and hand back the underlying writer.
pub fn write_ledger<W: Write>(writer: W, ledger: &Ledger) -> Result<W, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for expense in ledger {
        let date = expense.date.to_storage();
        let amount = format_cents(expense.amount_cents);
        csv_writer.write_record([
            date.as_str(),
            amount.as_str(),
            expense.category.as_str(),
            expense.notes.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    csv_writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
