use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use moneyage::cli::{
    handle_add_command, handle_delete_command, handle_import_command, handle_list_command,
    handle_report_command, AddArgs, ImportArgs, ListArgs, ReportArgs,
};
use moneyage::config::{paths::MoneyAgePaths, settings::Settings};
use moneyage::storage::{file_io::inspect_json_file, FileStatus, Storage};

#[derive(Parser)]
#[command(
    name = "moneyage",
    version,
    about = "Track how long your money sits before you spend it",
    long_about = "moneyage matches every expense against your oldest unspent income \
                  (first in, first out) and reports how many days old the money \
                  you spend is, averaged over your most recent expenses."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and default settings
    Init,

    /// Show current configuration, or update report defaults
    Config {
        /// Set the number of expenses averaged into the age of money
        #[arg(long)]
        window: Option<usize>,
        /// Set the trend threshold in days
        #[arg(long)]
        threshold: Option<f64>,
        /// Set the currency symbol
        #[arg(long)]
        currency: Option<String>,
    },

    /// Add income (positive amount) or an expense (negative amount)
    Add(AddArgs),

    /// List transactions, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Delete a transaction by id
    #[command(alias = "rm")]
    Delete {
        /// Transaction id
        id: String,
    },

    /// Import transactions from a CSV file
    Import(ImportArgs),

    /// Show the age of money report
    Report(ReportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    moneyage::logging::init(cli.verbose);

    // Initialize paths and settings
    let paths = MoneyAgePaths::new()?;
    debug!(base_dir = %paths.base_dir().display(), "resolved data location");
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing moneyage at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Record income with 'moneyage add 2500 --memo Paycheck'");
            println!("and expenses with 'moneyage add -- -42.10 --memo Groceries'.");
        }
        Some(Commands::Config {
            window,
            threshold,
            currency,
        }) => {
            let changed = window.is_some() || threshold.is_some() || currency.is_some();
            if let Some(window) = window {
                settings.average_window = window;
            }
            if let Some(threshold) = threshold {
                settings.trend_threshold = threshold;
            }
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if changed {
                settings.validate()?;
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            let ledger_path = storage.paths().ledger_file();
            let ledger_status = match inspect_json_file(&ledger_path) {
                FileStatus::Missing => "not created yet".to_string(),
                FileStatus::Valid => format!("{} transactions", storage.transactions.count()?),
                FileStatus::Corrupt => "unreadable".to_string(),
            };

            println!("moneyage Configuration");
            println!("======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!(
                "Settings file:     {}{}",
                paths.settings_file().display(),
                if storage.is_initialized() { "" } else { " (defaults, not saved)" }
            );
            println!("Transactions file: {}", ledger_path.display());
            println!("Ledger:            {}", ledger_status);
            println!();
            println!("Settings:");
            println!("  Average window:     {} expenses", settings.average_window);
            println!("  Trend threshold:    {} days", settings.trend_threshold);
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Import date format: {}", settings.import_date_format);
        }
        Some(Commands::Add(args)) => handle_add_command(&storage, &settings, args)?,
        Some(Commands::List(args)) => handle_list_command(&storage, &settings, args)?,
        Some(Commands::Delete { id }) => handle_delete_command(&storage, &id)?,
        Some(Commands::Import(args)) => handle_import_command(&storage, &settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&storage, &settings, args)?,
        None => {
            println!("moneyage - how old is the money you spend?");
            println!();
            println!("Run 'moneyage --help' for usage information.");
            println!("Run 'moneyage report' to see your age of money.");
        }
    }

    Ok(())
}
