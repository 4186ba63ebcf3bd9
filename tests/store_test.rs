mod common;

use std::fs;

use anyhow::Result;
use common::{expense, temp_ledger_path, test_store};
use impensa::LedgerError;
use impensa::domain::{Category, EntryDate, Expense};
use impensa::storage::{LedgerStore, StoreConfig};

#[test]
fn test_initialize_creates_header_only_file() -> Result<()> {
    let (path, _temp) = temp_ledger_path()?;
    let store = LedgerStore::new(StoreConfig::new(&path));
    assert!(!store.exists());

    store.ensure_initialized()?;

    assert_eq!(fs::read_to_string(&path)?, "date,amount,category,notes\n");
    assert!(store.load_all()?.is_empty());
    Ok(())
}

#[test]
fn test_initialize_is_idempotent() -> Result<()> {
    let (store, _temp) = test_store()?;
    store.append(expense("2024-01-01", 1000, Category::Food))?;
    store.append(expense("2024-01-02", 3000, Category::Travel))?;
    let before = fs::read_to_string(store.path())?;

    store.ensure_initialized()?;
    store.ensure_initialized()?;

    assert_eq!(fs::read_to_string(store.path())?, before);
    assert_eq!(store.load_all()?.len(), 2);
    Ok(())
}

#[test]
fn test_append_then_load_round_trips() -> Result<()> {
    let (store, _temp) = test_store()?;
    store.append(expense("2024-03-01", 450, Category::Health))?;
    let before = store.load_all()?.len();

    let record = expense("2024-02-28", 12345, Category::Entertainment)
        .with_notes("concert, \"front row\"\nand dinner");
    store.append(record.clone())?;

    let ledger = store.load_all()?;
    assert_eq!(ledger.len(), before + 1);
    assert_eq!(ledger.last(), Some(&record));
    Ok(())
}

#[test]
fn test_append_preserves_entry_order() -> Result<()> {
    let (store, _temp) = test_store()?;
    store.append(expense("2024-05-10", 100, Category::Food))?;
    store.append(expense("2024-01-01", 200, Category::Bills))?;
    store.append(expense("2024-03-15", 300, Category::Shopping))?;

    let amounts: Vec<_> = store.load_all()?.iter().map(|e| e.amount_cents).collect();
    assert_eq!(amounts, vec![100, 200, 300]);
    Ok(())
}

#[test]
fn test_append_leaves_no_temp_file() -> Result<()> {
    let (store, temp) = test_store()?;
    store.append(expense("2024-01-01", 1, Category::Others))?;

    let names: Vec<_> = fs::read_dir(temp.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names, vec![std::ffi::OsString::from("expenses.csv")]);
    Ok(())
}

#[test]
fn test_load_missing_file_is_read_error() -> Result<()> {
    let (path, _temp) = temp_ledger_path()?;
    let store = LedgerStore::new(StoreConfig::new(path));

    assert!(matches!(
        store.load_all(),
        Err(LedgerError::StorageRead { .. })
    ));
    assert!(matches!(
        store.append(expense("2024-01-01", 1, Category::Food)),
        Err(LedgerError::StorageRead { .. })
    ));
    Ok(())
}

#[test]
fn test_wrong_column_count_is_read_error() -> Result<()> {
    let (store, _temp) = test_store()?;
    fs::write(
        store.path(),
        "date,amount,category,notes\n2024-01-01,10,Food,\n2024-01-02,20,Travel\n",
    )?;

    let err = store.load_all().unwrap_err();
    assert!(matches!(err, LedgerError::StorageRead { .. }));
    assert!(err.to_string().contains("line 3"));
    Ok(())
}

#[test]
fn test_malformed_file_is_not_overwritten_by_append() -> Result<()> {
    let (store, _temp) = test_store()?;
    let corrupt = "date,amount,category,notes\n2024-01-01,lots,Food,\n";
    fs::write(store.path(), corrupt)?;

    assert!(store.append(expense("2024-01-02", 5, Category::Food)).is_err());
    assert_eq!(fs::read_to_string(store.path())?, corrupt);
    Ok(())
}

#[test]
fn test_loads_file_written_with_decorated_labels() -> Result<()> {
    let (store, _temp) = test_store()?;
    fs::write(
        store.path(),
        "Date,Amount,Category,Notes\n2024-01-05,250.0,Food 🍔,\n2024-01-06,99.99,Bills 💡,power\nnot a date,1,Others ✨,\n",
    )?;

    let ledger = store.load_all()?;
    assert_eq!(ledger.len(), 3);

    let records = ledger.as_slice();
    assert_eq!(records[0].category, Category::Food);
    assert_eq!(records[0].amount_cents, 25000);
    assert_eq!(records[1].notes, "power");
    assert_eq!(records[2].date, EntryDate::Unknown("not a date".into()));

    // Rewriting normalizes categories but keeps unreadable dates verbatim.
    store.append(expense("2024-01-07", 1, Category::Health))?;
    let text = fs::read_to_string(store.path())?;
    assert!(text.starts_with("date,amount,category,notes\n2024-01-05,250.00,Food,\n"));
    assert!(text.contains("not a date,1.00,Others,\n"));
    Ok(())
}

#[test]
fn test_unwritable_location_is_write_error() -> Result<()> {
    let (store, temp) = test_store()?;
    // A directory squatting on the temp file name makes the rewrite fail.
    fs::create_dir(temp.path().join("expenses.csv.tmp"))?;

    let result = store.append(Expense::new(
        common::parse_date("2024-01-01"),
        100,
        Category::Food,
    ));
    assert!(matches!(result, Err(LedgerError::StorageWrite { .. })));
    assert!(store.load_all()?.is_empty());
    Ok(())
}

#[test]
fn test_oversized_amounts_are_read_error() -> Result<()> {
    let (store, _temp) = test_store()?;
    fs::write(
        store.path(),
        "date,amount,category,notes\n2024-01-01,92233720368547758.00,Food,\n2024-01-02,92233720368547758.00,Food,\n",
    )?;

    let err = store.load_all().unwrap_err();
    assert!(matches!(err, LedgerError::StorageRead { .. }));
    assert!(err.to_string().contains("line 2"));
    Ok(())
}
