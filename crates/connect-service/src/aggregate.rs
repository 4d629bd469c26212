//! Aggregation primitives
//!
//! Grouping, calendar bucketing and top-N over in-memory documents. A
//! missing grouping key is its own `None` bucket; empty input gives empty
//! output, never an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// Count per calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

/// Amount and count per calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub count: usize,
}

/// Count per day, `date` formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

/// Group and count by `key`, largest group first.
///
/// Ties keep key order, with the `None` bucket ahead of every key.
pub fn count_by<T, K, F>(items: &[T], key: F) -> Vec<(Option<K>, usize)>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    let mut groups: BTreeMap<Option<K>, usize> = BTreeMap::new();
    for item in items {
        *groups.entry(key(item)).or_default() += 1;
    }
    let mut counted: Vec<_> = groups.into_iter().collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
}

/// Group by `key`, summing `amount` and counting, largest total first.
pub fn sum_by<T, K, F, A>(items: &[T], key: F, amount: A) -> Vec<(Option<K>, f64, usize)>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
    A: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<Option<K>, (f64, usize)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(key(item)).or_default();
        entry.0 += amount(item);
        entry.1 += 1;
    }
    let mut summed: Vec<_> = groups
        .into_iter()
        .map(|(k, (total, count))| (k, total, count))
        .collect();
    summed.sort_by(|a, b| b.1.total_cmp(&a.1));
    summed
}

/// Count per `(year, month)` of `date`, oldest month first.
pub fn monthly_counts<T, F>(items: &[T], date: F) -> Vec<MonthCount>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    monthly_totals(items, date, |_| 0.0)
        .into_iter()
        .map(|m| MonthCount {
            year: m.year,
            month: m.month,
            count: m.count,
        })
        .collect()
}

/// Sum of `amount` and count per `(year, month)` of `date`, oldest first.
pub fn monthly_totals<T, F, A>(items: &[T], date: F, amount: A) -> Vec<MonthTotal>
where
    F: Fn(&T) -> DateTime<Utc>,
    A: Fn(&T) -> f64,
{
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for item in items {
        let d = date(item);
        let entry = months.entry((d.year(), d.month())).or_default();
        entry.0 += amount(item);
        entry.1 += 1;
    }
    months
        .into_iter()
        .map(|((year, month), (total_amount, count))| MonthTotal {
            year,
            month,
            total_amount,
            count,
        })
        .collect()
}

/// Count per day of `date` for items at or after `since`, oldest first.
///
/// Days without items are omitted.
pub fn daily_counts<T, F>(items: &[T], date: F, since: DateTime<Utc>) -> Vec<DayCount>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for item in items {
        let d = date(item);
        if d >= since {
            *days.entry(d.date_naive()).or_default() += 1;
        }
    }
    days.into_iter()
        .map(|(day, count)| DayCount {
            date: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// The `n` items with the highest `score`, highest first.
///
/// Equal scores keep their input order.
pub fn top_n<T, F>(mut items: Vec<T>, n: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
    items.truncate(n);
    items
}
