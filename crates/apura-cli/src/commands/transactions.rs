//! Transaction command implementations

use anyhow::{Context, Result};
use apura_core::db::Database;
use apura_core::import::parse_money;
use apura_core::models::{TransactionInput, TransactionStatus};
use chrono::{NaiveDate, Utc};

use super::{format_brl, truncate};

/// Arguments for `apura tx add`, collected to keep the dispatch readable
pub struct TxAddArgs {
    pub description: String,
    pub kind: String,
    pub value: String,
    pub category: String,
    pub nature: String,
    pub repasse: bool,
    pub status: String,
    pub date: Option<String>,
    pub competence: Option<String>,
    pub payment_date: Option<String>,
    pub project: Option<i64>,
}

fn parse_date_arg(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

pub fn cmd_tx_add(db: &Database, args: TxAddArgs) -> Result<()> {
    let value = parse_money(&args.value).map_err(|e| anyhow::anyhow!("Invalid --value: {}", e))?;
    let date = match args.date {
        Some(raw) => parse_date_arg(&raw, "--date")?.to_string(),
        None => Utc::now().date_naive().to_string(),
    };

    let input = TransactionInput {
        description: args.description,
        kind: args.kind,
        nature: args.nature,
        cost_type: None,
        is_repasse: args.repasse,
        category: args.category,
        value,
        status: args.status,
        date,
        competence_date: args.competence,
        payment_date: args.payment_date,
        project_id: args.project,
    };

    let tx = db.create_transaction(&input)?;

    println!("✅ Recorded transaction {}:", tx.id);
    println!(
        "   {} │ {} │ {} │ {}",
        tx.date,
        format_brl(tx.value),
        tx.category,
        truncate(&tx.description, 40)
    );
    if tx.is_repasse {
        println!("   Classified as repasse (excluded from operational results).");
    }

    Ok(())
}

pub fn cmd_tx_list(db: &Database, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(limit)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  apura tx add --description \"Fee Acme\" --type receita --value 5000.00 --category \"Fee Mensal\"");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.kind {
            apura_core::models::TransactionKind::Expense => {
                format!("\x1b[31m-{}\x1b[0m", format_brl(tx.value)) // Red for expenses
            }
            apura_core::models::TransactionKind::Revenue => {
                format!("\x1b[32m+{}\x1b[0m", format_brl(tx.value)) // Green for revenue
            }
        };
        let marker = if tx.is_repasse { " [repasse]" } else { "" };

        println!(
            "   [{}] {} │ {:>16} │ {:9} │ {}{}",
            tx.id,
            tx.date,
            amount_str,
            tx.status,
            truncate(&tx.description, 32),
            marker
        );
    }

    Ok(())
}

pub fn cmd_tx_pay(db: &Database, id: i64, date: Option<&str>) -> Result<()> {
    let payment_date = date.map(|raw| parse_date_arg(raw, "--date")).transpose()?;

    let tx = db.mark_paid(id, payment_date)?;

    println!("✅ Transaction {} marked as paid:", id);
    println!(
        "   {} │ {} │ {}",
        tx.payment_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        format_brl(tx.value),
        truncate(&tx.description, 40)
    );

    Ok(())
}

pub fn cmd_tx_cancel(db: &Database, id: i64) -> Result<()> {
    let tx = db.set_transaction_status(id, TransactionStatus::Cancelled, None)?;

    println!("✅ Transaction {} cancelled:", id);
    println!(
        "   {} │ {} │ {}",
        tx.date,
        format_brl(tx.value),
        truncate(&tx.description, 40)
    );
    println!();
    println!("   Cancelled transactions stay in history but leave all totals.");

    Ok(())
}

pub fn cmd_tx_delete(db: &Database, id: i64) -> Result<()> {
    // Show what is about to go before deleting it
    let tx = db.get_transaction(id)?;
    db.delete_transaction(id)?;

    println!("✅ Deleted transaction {}:", id);
    println!(
        "   {} │ {} │ {}",
        tx.date,
        format_brl(tx.value),
        truncate(&tx.description, 40)
    );

    Ok(())
}
