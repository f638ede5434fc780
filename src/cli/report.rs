//! CLI command for the age of money report

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use super::parse_date_arg;
use crate::config::settings::Settings;
use crate::error::{MoneyAgeError, MoneyAgeResult};
use crate::reports::{AgeOfMoneyReport, ReportOptions};
use crate::storage::Storage;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    /// Human-readable summary with a monthly chart
    #[default]
    Terminal,
    /// Monthly series as CSV
    Csv,
    /// Full report as JSON
    Json,
    /// Full report as YAML
    Yaml,
}

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Number of most recent expenses to average (defaults to the configured window)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Day change that counts as a trend (defaults to the configured threshold)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Terminal)]
    pub format: ReportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    /// Merge command-line overrides with the saved settings
    pub fn options(&self, settings: &Settings) -> MoneyAgeResult<ReportOptions> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(MoneyAgeError::Validation(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        let threshold = self.threshold.unwrap_or(settings.trend_threshold);
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(MoneyAgeError::Validation(format!(
                "Threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        Ok(ReportOptions {
            window: self.window.unwrap_or(settings.average_window),
            threshold,
            start_date: self.start,
            end_date: self.end,
        })
    }
}

/// Handle `report`
pub fn handle_report_command(storage: &Storage, settings: &Settings, args: ReportArgs) -> MoneyAgeResult<()> {
    let options = args.options(settings)?;
    let report = AgeOfMoneyReport::generate(storage, &options)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                MoneyAgeError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_report(&report, args.format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| MoneyAgeError::Export(e.to_string()))?;
            println!("Age of money report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&report, args.format, stdout.lock())?;
        }
    }

    Ok(())
}

fn write_report<W: Write>(report: &AgeOfMoneyReport, format: ReportFormat, mut writer: W) -> MoneyAgeResult<()> {
    match format {
        ReportFormat::Terminal => writer
            .write_all(report.format_terminal().as_bytes())
            .map_err(|e| MoneyAgeError::Export(e.to_string())),
        ReportFormat::Csv => report.export_csv(writer),
        ReportFormat::Json => {
            report.export_json(&mut writer)?;
            writeln!(writer).map_err(|e| MoneyAgeError::Export(e.to_string()))
        }
        ReportFormat::Yaml => report.export_yaml(writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ReportArgs {
        ReportArgs {
            window: None,
            threshold: None,
            start: None,
            end: None,
            format: ReportFormat::Terminal,
            output: None,
        }
    }

    #[test]
    fn test_options_fall_back_to_settings() {
        let mut settings = Settings::default();
        settings.average_window = 7;
        settings.trend_threshold = 4.0;

        let options = args().options(&settings).unwrap();
        assert_eq!(options.window, 7);
        assert_eq!(options.threshold, 4.0);
    }

    #[test]
    fn test_options_overrides_and_validation() {
        let settings = Settings::default();
        let mut overridden = args();
        overridden.window = Some(3);
        overridden.threshold = Some(0.5);
        let options = overridden.options(&settings).unwrap();
        assert_eq!(options.window, 3);
        assert_eq!(options.threshold, 0.5);

        let mut bad_range = args();
        bad_range.start = NaiveDate::from_ymd_opt(2024, 3, 1);
        bad_range.end = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(bad_range.options(&settings).unwrap_err().is_validation());

        let mut bad_threshold = args();
        bad_threshold.threshold = Some(-1.0);
        assert!(bad_threshold.options(&settings).is_err());
    }
}
