use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::application::{
    BudgetUtilization, ExpenseReport, TransactionFilter, TransactionInput, TransactionService,
};
use crate::domain::{
    ALL_CATEGORIES, CUSTOM_CATEGORY, PRESET_CATEGORIES, Transaction, TransactionKind,
    format_amount, format_currency, format_date, is_preset, resolve_category,
};
use crate::storage::StoragePaths;

/// Money Map - personal finance tracker
#[derive(Parser)]
#[command(name = "moneymap")]
#[command(about = "Track income and expenses, keep a running balance and set category budgets")]
#[command(version)]
pub struct Cli {
    /// Directory holding transactions.json and budgets.json
    #[arg(long, env = "MONEYMAP_DATA_DIR", default_value = ".", global = true)]
    pub data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an income
    Income(TransactionArgs),

    /// Record an expense
    Expense(TransactionArgs),

    /// Edit a transaction (fields not given keep their current value)
    Edit(EditArgs),

    /// Delete a transaction
    Delete {
        /// Transaction number as shown by `list`
        number: usize,
    },

    /// List transactions
    List {
        /// Filter by category ("All" for every category)
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,

        /// Filter from date (DD-MM-YYYY, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (DD-MM-YYYY, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show the current balance
    Balance,

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export transactions to CSV (or everything to JSON)
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// List the preset categories
    Categories,

    /// Delete all transactions and budgets
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct TransactionArgs {
    /// Amount (positive, e.g. "50.00" or "50")
    pub amount: String,

    /// Description of the transaction
    #[arg(short, long)]
    pub description: String,

    /// Category (a preset, or "Others" together with --custom)
    #[arg(short, long)]
    pub category: String,

    /// Custom category name, used when the category is "Others"
    #[arg(long)]
    pub custom: Option<String>,

    /// Date of the transaction (DD-MM-YYYY, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Transaction number as shown by `list`
    pub number: usize,

    /// New amount (positive)
    #[arg(short, long)]
    pub amount: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New category (a preset, or "Others" together with --custom)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Custom category name, used when the category is "Others"
    #[arg(long)]
    pub custom: Option<String>,

    /// New date (DD-MM-YYYY)
    #[arg(long)]
    pub date: Option<String>,

    /// Record the transaction as income
    #[arg(long, conflicts_with = "expense")]
    pub income: bool,

    /// Record the transaction as an expense
    #[arg(long)]
    pub expense: bool,
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set (or replace) the limit for a category
    Set {
        /// Category (a preset, or "Others" together with --custom)
        category: String,

        /// Budget limit (e.g., "200" or "200.00")
        amount: String,

        /// Custom category name, used when the category is "Others"
        #[arg(long)]
        custom: Option<String>,
    },

    /// Remove the limit for a category
    Remove {
        /// Category (a preset, or "Others" together with --custom)
        category: String,

        /// Custom category name, used when the category is "Others"
        #[arg(long)]
        custom: Option<String>,
    },

    /// List all budgets
    List,

    /// Show budget status (spent vs remaining)
    Status {
        /// Category (omit for all budgets)
        category: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Expense breakdown by category
    Expenses {
        /// Chart style
        #[arg(long, value_enum, default_value_t = ChartKind::Pie)]
        chart: ChartKind,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Budget utilization for one category
    Budget {
        /// Budgeted category
        category: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

const CHART_WIDTH: usize = 40;

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = StoragePaths::in_dir(&self.data_dir);
        let mut service = TransactionService::open(&paths)
            .with_context(|| format!("Failed to open data in {}", self.data_dir.display()))?;

        match self.command {
            Commands::Income(args) => {
                run_add_command(&mut service, args, TransactionKind::Income)?;
            }

            Commands::Expense(args) => {
                run_add_command(&mut service, args, TransactionKind::Expense)?;
            }

            Commands::Edit(args) => {
                run_edit_command(&mut service, args)?;
            }

            Commands::Delete { number } => {
                let index = row_index(number)?;
                let removed = service.delete(index)?;
                println!(
                    "Deleted: {} {} ({})",
                    format_date(removed.date),
                    removed.description,
                    format_currency(removed.amount)
                );
                print_balance(&service);
            }

            Commands::List { category, from, to } => {
                let filter = TransactionFilter {
                    category: Some(category),
                    start_date: from,
                    end_date: to,
                };
                run_list_command(&service, &filter);
            }

            Commands::Balance => {
                print_balance(&service);
            }

            Commands::Budget(budget_cmd) => {
                run_budget_command(&mut service, budget_cmd)?;
            }

            Commands::Report(report_cmd) => {
                run_report_command(&service, report_cmd)?;
            }

            Commands::Export { output, format } => {
                run_export_command(&service, output, format)?;
            }

            Commands::Categories => {
                for category in PRESET_CATEGORIES {
                    if category == CUSTOM_CATEGORY {
                        println!("{} (use --custom NAME)", category);
                    } else {
                        println!("{}", category);
                    }
                }
            }

            Commands::Reset { yes } => {
                if !yes {
                    anyhow::bail!(
                        "This deletes all transactions and budgets. Re-run with --yes to confirm."
                    );
                }
                service.clear_all()?;
                println!("All data has been deleted successfully!");
            }
        }

        Ok(())
    }
}

fn run_add_command(
    service: &mut TransactionService,
    args: TransactionArgs,
    kind: TransactionKind,
) -> Result<()> {
    let category = require_category(&args.category, args.custom.as_deref())?;
    let input = TransactionInput {
        date: args.date.unwrap_or_else(today),
        description: args.description,
        amount: args.amount,
        category,
        kind,
    };

    let transaction = service.add(input)?;
    println!(
        "Transaction added: {} {} {} ({})",
        format_date(transaction.date),
        transaction.kind(),
        format_currency(transaction.amount),
        transaction.category
    );
    print_balance(service);
    Ok(())
}

fn run_edit_command(service: &mut TransactionService, args: EditArgs) -> Result<()> {
    let index = row_index(args.number)?;
    let current = service
        .transactions()
        .get(index)
        .cloned()
        .with_context(|| format!("Transaction #{} not found", args.number))?;

    let kind = if args.income {
        TransactionKind::Income
    } else if args.expense {
        TransactionKind::Expense
    } else {
        current.kind()
    };
    let category = match args.category {
        Some(selected) => require_category(&selected, args.custom.as_deref())?,
        None => current.category.clone(),
    };

    let input = TransactionInput {
        date: args.date.unwrap_or_else(|| format_date(current.date)),
        description: args.description.unwrap_or_else(|| current.description.clone()),
        amount: args
            .amount
            .unwrap_or_else(|| current.magnitude().to_string()),
        category,
        kind,
    };

    let result = service.edit(index, input)?;
    println!(
        "Transaction updated: {} -> {}",
        format_currency(result.previous.amount),
        format_currency(result.updated.amount)
    );
    print_balance(service);
    Ok(())
}

fn run_list_command(service: &TransactionService, filter: &TransactionFilter) {
    let filtered = service.filter(filter);
    for error in &filtered.errors {
        eprintln!("Invalid Date: {}", error);
    }

    print_balance(service);
    if filtered.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:>4}  {:<10}  {:<28}  {:>12}  {:<15}  {:<7}",
        "#", "DATE", "DESCRIPTION", "AMOUNT", "CATEGORY", "TYPE"
    );
    println!("{}", "-".repeat(86));
    for row in &filtered.rows {
        print_transaction_row(row.index + 1, row.transaction);
    }
}

fn print_transaction_row(number: usize, transaction: &Transaction) {
    println!(
        "{:>4}  {:<10}  {:<28}  {:>12}  {:<15}  {:<7}",
        number,
        format_date(transaction.date),
        truncate(&transaction.description, 28),
        format_currency(transaction.amount),
        truncate(&transaction.category, 15),
        transaction.kind()
    );
}

fn run_budget_command(service: &mut TransactionService, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            custom,
        } => {
            let category = require_category(&category, custom.as_deref())?;
            let previous = service.set_budget(&category, &amount)?;
            let limit = service.budgets().get(&category).unwrap_or_default();
            match previous {
                Some(old) => println!(
                    "Budget set for {}: {} (was {})",
                    category,
                    format_currency(limit),
                    format_currency(old)
                ),
                None => println!("Budget set for {}: {}", category, format_currency(limit)),
            }
        }

        BudgetCommands::Remove { category, custom } => {
            let category = require_category(&category, custom.as_deref())?;
            match service.remove_budget(&category)? {
                Some(_) => println!("Budget removed for {}", category),
                None => println!("No budget set for {}", category),
            }
        }

        BudgetCommands::List => {
            let budgets = service.budgets();
            if budgets.is_empty() {
                println!("No budgets found.");
            } else {
                for (category, limit) in budgets.iter() {
                    println!("{}: {}", category, format_currency(limit));
                }
            }
        }

        BudgetCommands::Status { category } => {
            let statuses = match category {
                Some(category) => vec![service.budget_utilization(&category)?],
                None => service.budget_overview(),
            };
            if statuses.is_empty() {
                println!("No budgets found.");
            } else {
                println!(
                    "{:<15} {:>12} {:>12} {:>12}",
                    "CATEGORY", "LIMIT", "SPENT", "REMAINING"
                );
                println!("{}", "-".repeat(54));
                for status in &statuses {
                    let marker = if status.is_overspent() { " !" } else { "" };
                    println!(
                        "{:<15} {:>12} {:>12} {:>12}{}",
                        truncate(&status.category, 15),
                        format_currency(status.limit),
                        format_currency(status.spent.abs()),
                        format_currency(status.remaining),
                        marker
                    );
                }
            }
        }
    }
    Ok(())
}

fn run_report_command(service: &TransactionService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Expenses { chart, format } => {
            let report = service.expense_report();
            if report.is_empty() {
                anyhow::bail!("No expenses recorded yet.");
            }
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                ReportFormat::Table => match chart {
                    ChartKind::Pie => print_expense_shares(&report),
                    ChartKind::Bar => print_expense_bars(&report),
                },
            }
        }

        ReportCommands::Budget { category, format } => {
            let status = service.budget_utilization(&category)?;
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                ReportFormat::Table => print_budget_utilization(&status),
            }
        }
    }
    Ok(())
}

fn print_expense_shares(report: &ExpenseReport) {
    println!("Expense Breakdown");
    println!();
    for summary in &report.categories {
        println!(
            "{:<15} {:>6.1}%  {}",
            truncate(&summary.category, 15),
            summary.percentage,
            bar(summary.percentage, 100.0)
        );
    }
    println!();
    println!("{:<15} {}", "TOTAL", format_currency(report.total));
}

fn print_expense_bars(report: &ExpenseReport) {
    use rust_decimal::prelude::ToPrimitive;

    let max = report
        .categories
        .iter()
        .filter_map(|s| s.total.to_f64())
        .fold(0.0_f64, f64::max);

    println!("Expense Breakdown (€)");
    println!();
    for summary in &report.categories {
        let value = summary.total.to_f64().unwrap_or(0.0);
        println!(
            "{:<15} {:>12}  {}",
            truncate(&summary.category, 15),
            format_amount(summary.total),
            bar(value, max)
        );
    }
}

fn print_budget_utilization(status: &BudgetUtilization) {
    let (remaining_pct, spent_pct) = status.shares();
    println!("Budget Utilization for {}", status.category);
    println!();
    println!("  Limit:     {}", format_currency(status.limit));
    println!(
        "  Spent:     {:>12}  {:>5.1}%  {}",
        format_currency(status.spent.abs()),
        spent_pct,
        bar(spent_pct, 100.0)
    );
    println!(
        "  Remaining: {:>12}  {:>5.1}%  {}",
        format_currency(status.remaining),
        remaining_pct,
        bar(remaining_pct, 100.0)
    );
}

fn run_export_command(
    service: &TransactionService,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        ExportFormat::Csv => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Transactions exported successfully! ({} rows)", count);
            }
        }
        ExportFormat::Json => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported {} transactions and {} budgets",
                    snapshot.transactions.len(),
                    snapshot.budgets.len()
                );
            }
        }
    }

    Ok(())
}

fn print_balance(service: &TransactionService) {
    println!("Balance: {}", format_currency(service.balance()));
}

fn require_category(selected: &str, custom: Option<&str>) -> Result<String> {
    let category = resolve_category(selected, custom)
        .with_context(|| "Please enter a custom category name (use --custom NAME).".to_string())?;
    if !is_preset(&category) {
        tracing::debug!(category = %category, "using custom category");
    }
    Ok(category)
}

/// Convert a 1-based row number into a ledger index.
fn row_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .context("Transaction numbers start at 1")
}

fn today() -> String {
    format_date(Local::now().date_naive())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * CHART_WIDTH as f64).round() as usize;
    "█".repeat(width.clamp(1, CHART_WIDTH))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
