// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use impensa::application::ExpenseService;
use impensa::domain::{Category, Cents, Expense};
use impensa::storage::{LedgerStore, StoreConfig};
use tempfile::TempDir;

/// Path of a ledger file inside a fresh temporary directory (not created yet).
pub fn temp_ledger_path() -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("expenses.csv");
    Ok((path, temp_dir))
}

/// Helper to create an initialized store in a temporary directory
pub fn test_store() -> Result<(LedgerStore, TempDir)> {
    let (path, temp_dir) = temp_ledger_path()?;
    let store = LedgerStore::new(StoreConfig::new(path));
    store.ensure_initialized()?;
    Ok((store, temp_dir))
}

/// Helper to create a test service over a temporary ledger
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let (path, temp_dir) = temp_ledger_path()?;
    let service = ExpenseService::open(StoreConfig::new(path))?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn expense(date: &str, amount: Cents, category: Category) -> Expense {
    Expense::new(parse_date(date), amount, category)
}
