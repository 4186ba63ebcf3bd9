use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Expense, Ledger};
use crate::storage::{LedgerStore, StoreConfig};

use super::reporting::{self, CategoryShare, DailyTotal, Summary, TimePoint};
use super::Result;

/// Application service providing high-level operations over the expense ledger.
/// This is the primary interface for any presentation layer (CLI, TUI, web, ...).
///
/// Each call is one complete load-compute cycle against the backing file.
pub struct ExpenseService {
    store: LedgerStore,
}

/// Everything the dashboard shows, computed from a single load.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub breakdown: Vec<CategoryShare>,
    pub daily: Vec<DailyTotal>,
}

impl ExpenseService {
    /// Create a new service over the given store.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledger described by `config`, creating an empty one on first run.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let store = LedgerStore::new(config);
        store.ensure_initialized()?;
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    // ========================
    // Recording
    // ========================

    pub fn record_expense(&self, expense: Expense) -> Result<()> {
        info!(
            category = %expense.category,
            amount_cents = expense.amount_cents,
            date = %expense.date,
            "recording expense"
        );
        self.store.append(expense)
    }

    // ========================
    // Queries
    // ========================

    pub fn list_expenses(&self) -> Result<Ledger> {
        self.store.load_all()
    }

    pub fn summary(&self) -> Result<Summary> {
        let ledger = self.store.load_all()?;
        Ok(reporting::summarize(&ledger))
    }

    pub fn category_breakdown(&self) -> Result<Vec<CategoryShare>> {
        let ledger = self.store.load_all()?;
        Ok(reporting::category_breakdown(&ledger))
    }

    pub fn time_series(&self) -> Result<Vec<TimePoint>> {
        let ledger = self.store.load_all()?;
        Ok(reporting::time_series(&ledger))
    }

    pub fn daily_totals(&self) -> Result<Vec<DailyTotal>> {
        let ledger = self.store.load_all()?;
        Ok(reporting::daily_totals(&ledger))
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        let ledger = self.store.load_all()?;
        debug!(records = ledger.len(), "building dashboard");

        Ok(Dashboard {
            summary: reporting::summarize(&ledger),
            breakdown: reporting::category_breakdown(&ledger),
            daily: reporting::daily_totals(&ledger),
        })
    }
}
