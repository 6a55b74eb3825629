//! Apura CLI - Agency ledger and reporting
//!
//! Usage:
//!   apura init                          Initialize database
//!   apura import --file lancamentos.csv Import transactions
//!   apura tx add ...                    Record a transaction
//!   apura report dre --period this-month
//!   apura report profitability

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Import { file } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Tx { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                TxAction::Add {
                    description,
                    kind,
                    value,
                    category,
                    nature,
                    repasse,
                    status,
                    date,
                    competence,
                    payment_date,
                    project,
                } => commands::cmd_tx_add(
                    &db,
                    commands::TxAddArgs {
                        description,
                        kind,
                        value,
                        category,
                        nature,
                        repasse,
                        status,
                        date,
                        competence,
                        payment_date,
                        project,
                    },
                ),
                TxAction::List { limit } => commands::cmd_tx_list(&db, limit),
                TxAction::Pay { id, date } => commands::cmd_tx_pay(&db, id, date.as_deref()),
                TxAction::Cancel { id } => commands::cmd_tx_cancel(&db, id),
                TxAction::Delete { id } => commands::cmd_tx_delete(&db, id),
            }
        }
        Commands::Clients { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(ClientsAction::List) => commands::cmd_clients_list(&db),
                Some(ClientsAction::Add { name }) => commands::cmd_clients_add(&db, &name),
            }
        }
        Commands::Projects { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                None | Some(ProjectsAction::List) => commands::cmd_projects_list(&db),
                Some(ProjectsAction::Add { name, client }) => {
                    commands::cmd_projects_add(&db, &name, client)
                }
            }
        }
        Commands::Time { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                TimeAction::Log {
                    project,
                    member,
                    minutes,
                    date,
                } => commands::cmd_time_log(&db, project, &member, minutes, date.as_deref()),
                TimeAction::Rate { member, rate } => commands::cmd_rate_set(&db, &member, &rate),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&db_path)?;
            match report_type {
                ReportType::Dre { period, json } => {
                    let (from, to) = commands::resolve_period(&period)?;
                    commands::cmd_report_dre(&db, from, to, json)
                }
                ReportType::Cashflow { period, json } => {
                    let (from, to) = commands::resolve_period(&period)?;
                    commands::cmd_report_cashflow(&db, from, to, json)
                }
                ReportType::Balance { period, json } => {
                    let (from, to) = commands::resolve_period(&period)?;
                    commands::cmd_report_balance(&db, from, to, json)
                }
                ReportType::Costs { period, json } => {
                    let (from, to) = commands::resolve_period(&period)?;
                    commands::cmd_report_costs(&db, from, to, json)
                }
                ReportType::Profitability { sort, json } => {
                    commands::cmd_report_profitability(&db, &sort, json)
                }
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                SettingsAction::TaxRate { rate } => commands::cmd_tax_rate(&db, rate),
            }
        }
        Commands::Reset { yes } => commands::cmd_reset(&db_path, yes),
    }
}
