//! Age of Money calculations
//!
//! Income is treated as a queue of dated buckets. Expenses drain the buckets
//! strictly first-in-first-out, and each expense is aged against the last
//! bucket it drew from, i.e. the youngest dollar it spent.
//!
//! All three functions are pure: they copy what they need from their inputs
//! and keep no state between calls.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{AgeEntry, AgeOfMoneyResult, Money, MonthlyPoint, Transaction, Trend};

/// Number of most recent expenses averaged by default
pub const DEFAULT_AVERAGE_WINDOW: usize = 10;

/// Day difference between the last two points that counts as a trend by default
pub const DEFAULT_TREND_THRESHOLD: f64 = 2.0;

/// Unspent portion of one income transaction
#[derive(Debug, Clone, Copy)]
struct IncomeBucket {
    date: NaiveDate,
    remaining: Money,
}

impl IncomeBucket {
    fn from_income(txn: &Transaction) -> Self {
        // A non-positive "income" is a caller error; it funds nothing.
        let remaining = if txn.amount.is_positive() {
            txn.amount
        } else {
            Money::zero()
        };
        Self {
            date: txn.date,
            remaining,
        }
    }
}

/// Whole calendar days from `from` to `to` (negative if `to` is earlier)
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Match expenses to income FIFO and age each funded expense
///
/// Both lists may be unsorted; copies are sorted by date with ties kept in
/// input order. Each expense's demand is `|amount|`. If income runs out
/// partway through an expense, that expense and every later one are left
/// out of `ages` and `insufficient_data` is set.
///
/// Expenses with a zero amount draw from no bucket and produce no entry.
pub fn calculate_age_of_money(income: &[Transaction], expenses: &[Transaction]) -> AgeOfMoneyResult {
    if expenses.is_empty() {
        return AgeOfMoneyResult::default();
    }
    if income.is_empty() {
        debug!(expenses = expenses.len(), "no income to fund expenses");
        return AgeOfMoneyResult {
            ages: Vec::new(),
            insufficient_data: true,
        };
    }

    let mut sorted_income: Vec<&Transaction> = income.iter().collect();
    sorted_income.sort_by_key(|txn| txn.date);
    let mut sorted_expenses: Vec<&Transaction> = expenses.iter().collect();
    sorted_expenses.sort_by_key(|txn| txn.date);

    let mut buckets: Vec<IncomeBucket> = sorted_income
        .iter()
        .map(|txn| IncomeBucket::from_income(txn))
        .collect();
    let mut cursor = 0;

    let mut result = AgeOfMoneyResult {
        ages: Vec::with_capacity(sorted_expenses.len()),
        insufficient_data: false,
    };

    for expense in sorted_expenses {
        let mut demand = expense.amount.abs();
        let mut last_touched: Option<NaiveDate> = None;

        while demand.is_positive() {
            while cursor < buckets.len() && !buckets[cursor].remaining.is_positive() {
                cursor += 1;
            }
            let Some(bucket) = buckets.get_mut(cursor) else {
                break;
            };

            let taken = demand.min(bucket.remaining);
            bucket.remaining -= taken;
            demand -= taken;
            last_touched = Some(bucket.date);

            if bucket.remaining.is_zero() {
                cursor += 1;
            }
        }

        if demand.is_positive() {
            debug!(
                expense = %expense.id,
                date = %expense.date,
                unfunded = %demand,
                "income exhausted, stopping"
            );
            result.insufficient_data = true;
            break;
        }

        if let Some(funded_on) = last_touched {
            let age = whole_days_between(funded_on, expense.date);
            if age < 0 {
                warn!(
                    expense = %expense.id,
                    funded_on = %funded_on,
                    "expense funded by income dated after it"
                );
            }
            result.ages.push(AgeEntry::new(expense.date, age));
        }
    }

    debug!(
        funded = result.ages.len(),
        insufficient = result.insufficient_data,
        "age of money calculated"
    );
    result
}

/// Average age of the most recent `count` entries, rounded half away from zero
///
/// Returns `None` when there is nothing to average. Entries are assumed to be
/// in chronological order; the last ones are the most recent.
pub fn calculate_average_age(ages: &[AgeEntry], count: usize) -> Option<i64> {
    let window = count.min(ages.len());
    if window == 0 {
        return None;
    }

    let recent = &ages[ages.len() - window..];
    let total: i64 = recent.iter().map(|entry| entry.age).sum();
    let mean = total as f64 / window as f64;
    // f64::round rounds half away from zero, not to even
    Some(mean.round() as i64)
}

/// Classify the change between the last two points of a chronological series
///
/// Differences of exactly `threshold` are still `Stable`. Everything before
/// the last two points is ignored.
pub fn calculate_trend(points: &[MonthlyPoint], threshold: f64) -> Trend {
    let [.., previous, last] = points else {
        return Trend::Stable;
    };

    let diff = last.age_of_money - previous.age_of_money;
    if diff > threshold {
        Trend::Up
    } else if diff < -threshold {
        Trend::Down
    } else {
        Trend::Stable
    }
}
