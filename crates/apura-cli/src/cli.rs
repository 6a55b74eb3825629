//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Apura - Agency ledger classification and reporting
#[derive(Parser)]
#[command(name = "apura")]
#[command(about = "Financial ledger and DRE reporting for marketing agencies", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Manage transactions (add, list, pay, cancel, delete)
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },

    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: Option<ClientsAction>,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: Option<ProjectsAction>,
    },

    /// Tracked hours and hourly rates
    Time {
        #[command(subcommand)]
        action: TimeAction,
    },

    /// Financial reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Engine settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Delete all data, keeping the schema
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Add a transaction
    Add {
        /// Free-text description
        #[arg(short, long)]
        description: String,

        /// "receita" or "despesa"
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Amount in reais, e.g. 1500.00
        #[arg(short, long)]
        value: String,

        /// Category, e.g. "Fee Mensal", "Salários"
        #[arg(short, long)]
        category: String,

        /// "operacional" or "nao_operacional"
        #[arg(long, default_value = "operacional")]
        nature: String,

        /// Mark as pass-through media spend (repasse)
        #[arg(long)]
        repasse: bool,

        /// "pendente", "pago", "atrasado" or "cancelado"
        #[arg(long, default_value = "pendente")]
        status: String,

        /// Due date YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Competence date YYYY-MM-DD (defaults to the due date)
        #[arg(long)]
        competence: Option<String>,

        /// Payment date YYYY-MM-DD
        #[arg(long)]
        payment_date: Option<String>,

        /// Project to attribute the transaction to
        #[arg(long)]
        project: Option<i64>,
    },

    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Mark a transaction as paid
    Pay {
        /// Transaction ID
        id: i64,

        /// Payment date YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Cancel a transaction (kept in history, excluded from forecasts)
    Cancel {
        /// Transaction ID
        id: i64,
    },

    /// Delete a transaction permanently
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ClientsAction {
    /// Register a client
    Add {
        /// Client name
        name: String,
    },
    /// List clients
    List,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// Register a project for a client
    Add {
        /// Project name
        name: String,

        /// Owning client ID
        #[arg(long)]
        client: i64,
    },
    /// List projects
    List,
}

#[derive(Subcommand)]
pub enum TimeAction {
    /// Log worked time against a project
    Log {
        /// Project ID
        #[arg(long)]
        project: i64,

        /// Team member name
        #[arg(long)]
        member: String,

        /// Worked minutes
        #[arg(long)]
        minutes: i64,

        /// Work date YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Set a member's hourly rate in reais, e.g. 120.00
    Rate {
        /// Team member name
        member: String,

        /// Hourly rate in reais
        rate: String,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Seven-line income statement (DRE)
    Dre {
        #[command(flatten)]
        period: PeriodArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Operational vs repasse cash flow
    Cashflow {
        #[command(flatten)]
        period: PeriodArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Realized vs forecast balance
    Balance {
        #[command(flatten)]
        period: PeriodArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Direct vs fixed cost breakdown
    Costs {
        #[command(flatten)]
        period: PeriodArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Per-client profitability
    Profitability {
        /// Sort order: desc (default) or asc
        #[arg(long, default_value = "desc")]
        sort: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Shared period selection for reports, by competence date
#[derive(clap::Args)]
pub struct PeriodArgs {
    /// Named period: this-month, last-month, this-year, all
    #[arg(long, default_value = "all")]
    pub period: String,

    /// Custom period start YYYY-MM-DD (overrides --period with --to)
    #[arg(long)]
    pub from: Option<String>,

    /// Custom period end YYYY-MM-DD (overrides --period with --from)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show or set the simplified tax rate applied to gross revenue
    TaxRate {
        /// New rate in percent (0 to 100); omit to show the current value
        rate: Option<f64>,
    },
}
