//! Transaction aggregation for charts and the calendar.
//!
//! Pure in-memory transformations: a flat transaction list goes in,
//! chart-ready parallel arrays come out. An empty input always yields
//! empty series and zero totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::categories::CategoryKind;
use crate::transactions::Transaction;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Bucket width for the trend report. Daily whenever the caller has
/// any filter active, monthly otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Monthly,
}

/// Income, expense and running-balance series over sorted time
/// buckets. All vectors have the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Bucket keys, `YYYY-MM-DD` or `YYYY-MM`, chronologically sorted.
    pub keys: Vec<String>,
    /// Display labels, "5 Jan" for daily buckets, "Jan 2024" for
    /// monthly ones.
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    /// Cumulative income minus expense, carried across buckets.
    pub balance: Vec<f64>,
    pub total_income: f64,
    pub total_expense: f64,
}

/// One bucket of the expense distribution chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Expense totals per category, in first-seen order.
    pub slices: Vec<CategorySlice>,
    pub total_income: f64,
    pub total_expense: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Debit,
    Credit,
}

/// One calendar cell entry: the summed debit or credit of a date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarMarker {
    pub date: NaiveDate,
    pub kind: MarkerKind,
    pub amount: f64,
    /// Signed display string, "-120" or "+3500".
    pub label: String,
}

fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Monthly => date.format("%Y-%m").to_string(),
    }
}

fn bucket_label(key: &str, granularity: Granularity) -> String {
    let mut parts = key.split('-');
    let year = parts.next().unwrap_or_default();
    let month: usize = parts
        .next()
        .and_then(|m| m.parse().ok())
        .unwrap_or(1);
    let month_name = MONTH_ABBR[month.clamp(1, 12) - 1];
    match granularity {
        Granularity::Daily => {
            let day: u32 = parts
                .next()
                .and_then(|d| d.parse().ok())
                .unwrap_or(1);
            format!("{day} {month_name}")
        }
        Granularity::Monthly => format!("{month_name} {year}"),
    }
}

fn is_income(transaction: &Transaction) -> bool {
    transaction
        .category
        .as_ref()
        .is_some_and(|category| category.kind == CategoryKind::Income)
}

/// Income/expense/balance time series. Transactions without a category
/// count as expenses.
pub fn trend(transactions: &[Transaction], granularity: Granularity) -> TrendReport {
    if transactions.is_empty() {
        return TrendReport::default();
    }

    // BTreeMap keeps the zero-padded keys chronologically sorted.
    let mut income_by_key: BTreeMap<String, f64> = BTreeMap::new();
    let mut expense_by_key: BTreeMap<String, f64> = BTreeMap::new();
    let mut keys: BTreeMap<String, ()> = BTreeMap::new();

    for transaction in transactions {
        let key = bucket_key(transaction.date, granularity);
        let target = if is_income(transaction) {
            &mut income_by_key
        } else {
            &mut expense_by_key
        };
        *target.entry(key.clone()).or_insert(0.0) += transaction.amount;
        keys.insert(key, ());
    }

    let mut report = TrendReport::default();
    let mut running = 0.0;
    for key in keys.into_keys() {
        let income = income_by_key.get(&key).copied().unwrap_or(0.0);
        let expense = expense_by_key.get(&key).copied().unwrap_or(0.0);
        running += income - expense;

        report.labels.push(bucket_label(&key, granularity));
        report.keys.push(key);
        report.income.push(income);
        report.expense.push(expense);
        report.balance.push(running);
        report.total_income += income;
        report.total_expense += expense;
    }
    report
}

/// Expense totals per category, in the order categories first appear.
/// Uncategorized transactions fall back to the transaction's own
/// legacy `name`; an empty name becomes "Uncategorized".
pub fn category_distribution(transactions: &[Transaction]) -> Distribution {
    let mut distribution = Distribution::default();
    let mut index_by_name: BTreeMap<String, usize> = BTreeMap::new();

    let mut add_slice = |slices: &mut Vec<CategorySlice>, name: String, amount: f64| {
        if let Some(&index) = index_by_name.get(&name) {
            slices[index].amount += amount;
        } else {
            index_by_name.insert(name.clone(), slices.len());
            slices.push(CategorySlice { name, amount });
        }
    };

    for transaction in transactions {
        match &transaction.category {
            Some(category) if category.kind == CategoryKind::Income => {
                distribution.total_income += transaction.amount;
            }
            Some(category) => {
                distribution.total_expense += transaction.amount;
                add_slice(
                    &mut distribution.slices,
                    category.name.clone(),
                    transaction.amount,
                );
            }
            None => {
                distribution.total_expense += transaction.amount;
                let name = transaction.name.clone().unwrap_or_default();
                add_slice(&mut distribution.slices, name, transaction.amount);
            }
        }
    }

    for slice in &mut distribution.slices {
        if slice.name.is_empty() {
            slice.name = "Uncategorized".to_string();
        }
    }
    distribution
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount}")
    }
}

/// Per-date debit and credit markers. Only transactions carrying a
/// category contribute; a date shows at most one debit and one credit
/// marker and the two are never netted.
pub fn calendar_markers(transactions: &[Transaction]) -> Vec<CalendarMarker> {
    let mut debits: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut credits: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for transaction in transactions {
        let Some(category) = &transaction.category else {
            continue;
        };
        let target = match category.kind {
            CategoryKind::Expense => &mut debits,
            CategoryKind::Income => &mut credits,
        };
        *target.entry(transaction.date).or_insert(0.0) += transaction.amount;
    }

    let mut markers = Vec::with_capacity(debits.len() + credits.len());
    for (date, amount) in debits {
        markers.push(CalendarMarker {
            date,
            kind: MarkerKind::Debit,
            amount,
            label: format!("-{}", format_amount(amount)),
        });
    }
    for (date, amount) in credits {
        markers.push(CalendarMarker {
            date,
            kind: MarkerKind::Credit,
            amount,
            label: format!("+{}", format_amount(amount)),
        });
    }
    markers
}
