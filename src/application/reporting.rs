//! Read-only views over a loaded ledger: totals, groupings and chart series.
//!
//! Everything here is a pure function of its input; no I/O happens.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Category, Cents, EntryDate, Ledger};

use super::{LedgerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Cents,
    pub count: usize,
    pub average: Cents,
    pub percentage: f64,
}

/// One point of the time-series view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePoint {
    pub date: EntryDate,
    pub amount: Cents,
    pub category: Category,
}

/// Sum of all expenses on one date. `date` is `None` for entries whose date was unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: Option<NaiveDate>,
    pub total: Cents,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_spent: Cents,
    pub top_category: Option<Category>,
    pub top_category_total: Option<Cents>,
}

/// Sum of every amount. Saturates at `Cents::MAX` rather than overflowing.
pub fn total_spent(ledger: &Ledger) -> Cents {
    ledger
        .iter()
        .fold(0, |total: Cents, e| total.saturating_add(e.amount_cents))
}

/// Totals per category. Categories without any expense are absent.
pub fn category_totals(ledger: &Ledger) -> BTreeMap<Category, Cents> {
    let mut totals = BTreeMap::new();
    for expense in ledger {
        let total: &mut Cents = totals.entry(expense.category).or_insert(0);
        *total = total.saturating_add(expense.amount_cents);
    }
    totals
}

/// The category with the largest total. Equal totals resolve to the
/// alphabetically first category name.
pub fn top_category(ledger: &Ledger) -> Result<(Category, Cents)> {
    category_totals(ledger)
        .into_iter()
        .min_by(|(a_cat, a_total), (b_cat, b_total)| {
            b_total
                .cmp(a_total)
                .then_with(|| a_cat.as_str().cmp(b_cat.as_str()))
        })
        .ok_or(LedgerError::EmptyLedger)
}

/// Every expense as a chart point, in entry order.
pub fn time_series(ledger: &Ledger) -> Vec<TimePoint> {
    ledger
        .iter()
        .map(|e| TimePoint {
            date: e.date.clone(),
            amount: e.amount_cents,
            category: e.category,
        })
        .collect()
}

/// Per-category share of the grand total, largest first.
pub fn category_breakdown(ledger: &Ledger) -> Vec<CategoryShare> {
    let grand_total = total_spent(ledger);

    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for expense in ledger {
        *counts.entry(expense.category).or_insert(0) += 1;
    }

    let mut shares: Vec<CategoryShare> = category_totals(ledger)
        .into_iter()
        .map(|(category, total)| {
            let count = counts.get(&category).copied().unwrap_or_default();
            let percentage = if grand_total > 0 {
                total as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            };
            CategoryShare {
                category,
                total,
                count,
                average: if count > 0 { total / count as i64 } else { 0 },
                percentage,
            }
        })
        .collect();

    shares.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    shares
}

/// Totals per calendar day in ascending date order, with unreadable dates
/// collected into one trailing bucket.
pub fn daily_totals(ledger: &Ledger) -> Vec<DailyTotal> {
    // `None` sorts before `Some`, so unknown dates are moved to the end below.
    let mut days: BTreeMap<Option<NaiveDate>, (Cents, usize)> = BTreeMap::new();
    for expense in ledger {
        let day = days.entry(expense.date.known()).or_insert((0, 0));
        day.0 = day.0.saturating_add(expense.amount_cents);
        day.1 += 1;
    }

    let unknown = days.remove(&None);
    days.into_iter()
        .chain(unknown.map(|bucket| (None, bucket)))
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect()
}

pub fn summarize(ledger: &Ledger) -> Summary {
    let top = top_category(ledger).ok();
    Summary {
        count: ledger.len(),
        total_spent: total_spent(ledger),
        top_category: top.map(|(category, _)| category),
        top_category_total: top.map(|(_, total)| total),
    }
}
