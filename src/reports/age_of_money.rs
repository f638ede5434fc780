//! Age of Money Report
//!
//! Runs the FIFO matcher over the stored ledger, then rolls the per-expense
//! ages up into a monthly series and a trend.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::io::Write;

use crate::display::report::{format_bar, separator};
use crate::error::{MoneyAgeError, MoneyAgeResult};
use crate::models::{AgeEntry, Money, MonthlyPoint, Trend};
use crate::services::age_of_money::{
    calculate_age_of_money, calculate_average_age, calculate_trend, DEFAULT_AVERAGE_WINDOW,
    DEFAULT_TREND_THRESHOLD,
};
use crate::services::TransactionService;
use crate::storage::Storage;

const BAR_WIDTH: usize = 30;

/// Inputs that shape a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Trailing number of expenses averaged per point
    pub window: usize,
    /// Minimum day change between the last two months to call a trend
    pub threshold: f64,
    /// Ignore transactions before this date
    pub start_date: Option<NaiveDate>,
    /// Ignore transactions after this date
    pub end_date: Option<NaiveDate>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_AVERAGE_WINDOW,
            threshold: DEFAULT_TREND_THRESHOLD,
            start_date: None,
            end_date: None,
        }
    }
}

/// Age of Money Report
#[derive(Debug, Clone, Serialize)]
pub struct AgeOfMoneyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub window: usize,
    pub threshold: f64,
    /// Average age of the most recent `window` funded expenses
    pub current_age: Option<i64>,
    pub trend: Trend,
    /// Income ran out before every expense was funded
    pub insufficient_data: bool,
    pub total_income: Money,
    /// Total spending (negative value)
    pub total_spending: Money,
    pub expense_count: usize,
    pub funded_count: usize,
    pub monthly: Vec<MonthlyPoint>,
    pub ages: Vec<AgeEntry>,
}

impl AgeOfMoneyReport {
    /// Generate the report from the stored ledger
    pub fn generate(storage: &Storage, options: &ReportOptions) -> MoneyAgeResult<Self> {
        if options.window == 0 {
            return Err(MoneyAgeError::Validation(
                "Averaging window must be at least 1".into(),
            ));
        }

        // Buckets must be drained by everything before the range too, so the
        // matcher always sees the ledger from its beginning.
        let (income, expenses) =
            TransactionService::new(storage).ledger(None, options.end_date)?;
        let result = calculate_age_of_money(&income, &expenses);

        let in_range = |date: NaiveDate| options.start_date.map_or(true, |start| date >= start);
        let ages: Vec<AgeEntry> = result
            .ages
            .into_iter()
            .filter(|entry| in_range(entry.date))
            .collect();
        let monthly = monthly_points(&ages, options.window);

        Ok(Self {
            start_date: options.start_date,
            end_date: options.end_date,
            window: options.window,
            threshold: options.threshold,
            current_age: calculate_average_age(&ages, options.window),
            trend: calculate_trend(&monthly, options.threshold),
            insufficient_data: result.insufficient_data,
            total_income: income
                .iter()
                .filter(|t| in_range(t.date))
                .map(|t| t.amount)
                .sum(),
            total_spending: expenses
                .iter()
                .filter(|t| in_range(t.date))
                .map(|t| t.amount)
                .sum(),
            expense_count: expenses.iter().filter(|t| in_range(t.date)).count(),
            funded_count: ages.len(),
            monthly,
            ages,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Age of Money Report\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => output.push_str(&format!("Period: {} to {}\n", start, end)),
            (Some(start), None) => output.push_str(&format!("Period: from {}\n", start)),
            (None, Some(end)) => output.push_str(&format!("Period: through {}\n", end)),
            (None, None) => {}
        }

        match self.current_age {
            Some(age) => output.push_str(&format!(
                "Age of Money: {} {} (last {} expenses)\n",
                age,
                if age == 1 { "day" } else { "days" },
                self.window
            )),
            None => output.push_str("Age of Money: not enough data\n"),
        }
        output.push_str(&format!("Trend: {} {}\n", self.trend.symbol(), self.trend));
        output.push_str(&format!("Total Income: {}\n", self.total_income));
        output.push_str(&format!("Total Spending: {}\n", self.total_spending.abs()));
        output.push_str(&format!(
            "Expenses Funded: {} of {}\n",
            self.funded_count, self.expense_count
        ));

        if self.insufficient_data {
            output.push_str("\nWarning: income ran out before all expenses were funded;\n");
            output.push_str("later expenses are not included in the age.\n");
        }

        if !self.monthly.is_empty() {
            output.push('\n');
            output.push_str(&format!("{:<10} {:>6}  {}\n", "Month", "Days", "Chart"));
            output.push_str(&separator(60));
            output.push('\n');

            let max = self
                .monthly
                .iter()
                .map(|p| p.age_of_money)
                .fold(0.0_f64, f64::max);
            for point in &self.monthly {
                output.push_str(&format!(
                    "{:<10} {:>6.0}  {}\n",
                    point.date,
                    point.age_of_money,
                    format_bar(point.age_of_money, max, BAR_WIDTH)
                ));
            }
        }

        output
    }

    /// Export the monthly series to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> MoneyAgeResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(["Month", "Age of Money (days)"])
            .map_err(|e| MoneyAgeError::Export(e.to_string()))?;

        for point in &self.monthly {
            csv_writer
                .write_record([point.date.clone(), format!("{:.0}", point.age_of_money)])
                .map_err(|e| MoneyAgeError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| MoneyAgeError::Export(e.to_string()))
    }

    /// Export the full report as pretty-printed JSON
    pub fn export_json<W: Write>(&self, writer: W) -> MoneyAgeResult<()> {
        serde_json::to_writer_pretty(writer, self).map_err(|e| MoneyAgeError::Export(e.to_string()))
    }

    /// Export the full report as YAML
    pub fn export_yaml<W: Write>(&self, writer: W) -> MoneyAgeResult<()> {
        serde_yaml::to_writer(writer, self).map_err(|e| MoneyAgeError::Export(e.to_string()))
    }
}

/// Roll per-expense ages up into one point per calendar month
///
/// Each month's point is the trailing `window` average as of the last expense
/// in that month, so the series reads like month-end snapshots. `ages` must be
/// in date order.
pub fn monthly_points(ages: &[AgeEntry], window: usize) -> Vec<MonthlyPoint> {
    let mut points = Vec::new();

    for (idx, entry) in ages.iter().enumerate() {
        let closes_month = ages
            .get(idx + 1)
            .map_or(true, |next| !same_month(next.date, entry.date));
        if !closes_month {
            continue;
        }
        if let Some(average) = calculate_average_age(&ages[..=idx], window) {
            points.push(MonthlyPoint::new(
                entry.date.format("%Y-%m").to_string(),
                average as f64,
            ));
        }
    }

    points
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyAgePaths;
    use crate::models::Transaction;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyAgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn add(storage: &Storage, id: &str, day: &str, dollars: i64) {
        storage
            .transactions
            .upsert(Transaction::new(id, date(day), Money::from_dollars_cents(dollars, 0)))
            .unwrap();
    }

    #[test]
    fn test_monthly_points_snapshot_each_month_end() {
        let ages = vec![
            AgeEntry::new(date("2024-01-05"), 10),
            AgeEntry::new(date("2024-01-20"), 20),
            AgeEntry::new(date("2024-02-03"), 30),
            AgeEntry::new(date("2024-04-10"), 41),
        ];

        let points = monthly_points(&ages, 2);

        assert_eq!(
            points,
            vec![
                MonthlyPoint::new("2024-01", 15.0),
                MonthlyPoint::new("2024-02", 25.0),
                MonthlyPoint::new("2024-04", 36.0),
            ]
        );
    }

    #[test]
    fn test_monthly_points_empty() {
        assert!(monthly_points(&[], 10).is_empty());
    }

    #[test]
    fn test_generate_report() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay-jan", "2024-01-01", 200);
        add(&storage, "pay-jan-2", "2024-01-15", 300);
        add(&storage, "rent", "2024-02-01", -400);
        add(&storage, "food", "2024-03-01", -50);

        let report = AgeOfMoneyReport::generate(&storage, &ReportOptions::default()).unwrap();

        assert_eq!(report.ages.len(), 2);
        assert_eq!(report.ages[0].age, 17);
        // food drains the Jan 15 bucket: 46 days
        assert_eq!(report.ages[1].age, 46);
        assert_eq!(report.current_age, Some(32));
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.trend, Trend::Up);
        assert_eq!(report.total_income.cents(), 50_000);
        assert_eq!(report.total_spending.cents(), -45_000);
        assert!(!report.insufficient_data);
    }

    #[test]
    fn test_generate_report_insufficient() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay", "2024-01-01", 100);
        add(&storage, "rent", "2024-01-15", -500);

        let report = AgeOfMoneyReport::generate(&storage, &ReportOptions::default()).unwrap();

        assert!(report.insufficient_data);
        assert_eq!(report.current_age, None);
        assert_eq!(report.trend, Trend::Stable);
        assert!(report.format_terminal().contains("not enough data"));
        assert!(report.format_terminal().contains("Warning"));
    }

    #[test]
    fn test_date_range_limits_ledger() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay", "2024-01-01", 1000);
        add(&storage, "rent", "2024-01-15", -500);
        add(&storage, "late", "2024-06-01", -100);

        let options = ReportOptions {
            end_date: Some(date("2024-01-31")),
            ..ReportOptions::default()
        };
        let report = AgeOfMoneyReport::generate(&storage, &options).unwrap();

        assert_eq!(report.expense_count, 1);
        assert_eq!(report.current_age, Some(14));
    }

    #[test]
    fn test_start_date_keeps_earlier_income_available() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay", "2024-01-01", 1000);
        add(&storage, "rent-jan", "2024-01-20", -300);
        add(&storage, "rent", "2024-03-10", -500);

        let options = ReportOptions {
            start_date: Some(date("2024-03-01")),
            ..ReportOptions::default()
        };
        let report = AgeOfMoneyReport::generate(&storage, &options).unwrap();

        assert!(!report.insufficient_data);
        assert_eq!(report.ages, vec![AgeEntry::new(date("2024-03-10"), 69)]);
        assert_eq!(report.current_age, Some(69));
        assert_eq!(report.monthly, vec![MonthlyPoint::new("2024-03", 69.0)]);
        assert_eq!(report.expense_count, 1);
        assert_eq!(report.funded_count, 1);
        assert_eq!(report.total_income, Money::zero());
        assert_eq!(report.total_spending.cents(), -50_000);
    }

    #[test]
    fn test_spending_before_start_still_drains_income() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay-jan", "2024-01-01", 500);
        add(&storage, "pay-feb", "2024-02-01", 500);
        add(&storage, "rent-jan", "2024-01-10", -500);
        add(&storage, "food", "2024-03-05", -100);

        let options = ReportOptions {
            start_date: Some(date("2024-03-01")),
            ..ReportOptions::default()
        };
        let report = AgeOfMoneyReport::generate(&storage, &options).unwrap();

        // January's income is gone, so food is paid from February's.
        assert_eq!(report.ages, vec![AgeEntry::new(date("2024-03-05"), 33)]);
    }

    #[test]
    fn test_zero_window_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let options = ReportOptions {
            window: 0,
            ..ReportOptions::default()
        };
        let err = AgeOfMoneyReport::generate(&storage, &options).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_exports() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, "pay", "2024-01-01", 1000);
        add(&storage, "rent", "2024-01-15", -500);
        let report = AgeOfMoneyReport::generate(&storage, &ReportOptions::default()).unwrap();

        let mut csv_out = Vec::new();
        report.export_csv(&mut csv_out).unwrap();
        let csv_text = String::from_utf8(csv_out).unwrap();
        assert_eq!(csv_text, "Month,Age of Money (days)\n2024-01,14\n");

        let mut json_out = Vec::new();
        report.export_json(&mut json_out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json_out).unwrap();
        assert_eq!(value["current_age"], 14);
        assert_eq!(value["trend"], "stable");
        assert_eq!(value["monthly"][0]["ageOfMoney"], 14.0);

        let mut yaml_out = Vec::new();
        report.export_yaml(&mut yaml_out).unwrap();
        let yaml_text = String::from_utf8(yaml_out).unwrap();
        assert!(yaml_text.contains("current_age: 14"));
    }
}
