//! Report command implementations

use anyhow::{Context, Result};
use apura_core::db::Database;
use apura_core::models::StatementLine;
use apura_core::profitability::ProfitSort;
use chrono::{Datelike, NaiveDate, Utc};

use super::{format_brl, truncate};
use crate::cli::PeriodArgs;

/// Resolve period arguments to optional (from, to) competence bounds
pub fn resolve_period(args: &PeriodArgs) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    // Custom dates win over the named period
    if args.from.is_some() || args.to.is_some() {
        let from = args
            .from
            .as_deref()
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .context("Invalid --from date format (use YYYY-MM-DD)")?;
        let to = args
            .to
            .as_deref()
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .context("Invalid --to date format (use YYYY-MM-DD)")?;
        return Ok((from, to));
    }

    let today = Utc::now().date_naive();
    resolve_named_period(&args.period, today)
}

fn resolve_named_period(
    period: &str,
    today: NaiveDate,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    match period.to_lowercase().as_str() {
        "this-month" => {
            let from = first_of_month(today.year(), today.month());
            Ok((Some(from), Some(today)))
        }
        "last-month" => {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            let from = first_of_month(year, month);
            let to = first_of_month(today.year(), today.month())
                .pred_opt()
                .unwrap_or(from);
            Ok((Some(from), Some(to)))
        }
        "this-year" => {
            let from = first_of_month(today.year(), 1);
            Ok((Some(from), Some(today)))
        }
        "all" => Ok((None, None)),
        _ => anyhow::bail!(
            "Unknown period: {}. Available: this-month, last-month, this-year, all",
            period
        ),
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Month is always in 1..=12 here
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn print_period(from: Option<NaiveDate>, to: Option<NaiveDate>) {
    match (from, to) {
        (None, None) => println!("   Period: all time"),
        (from, to) => println!(
            "   Period: {} to {}",
            from.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
            to.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
        ),
    }
}

fn print_statement_line(line: &StatementLine, drill_down: bool) {
    match line.percent_of_revenue {
        Some(pct) => println!(
            "   {:24} │ {:>16} │ {:>6.2}%",
            line.label,
            format_brl(line.value),
            pct
        ),
        None => println!("   {:24} │ {:>16} │", line.label, format_brl(line.value)),
    }
    if drill_down {
        for category in &line.categories {
            println!(
                "     {:22} │ {:>16} │",
                truncate(&category.name, 22),
                format_brl(category.value)
            );
        }
    }
}

pub fn cmd_report_dre(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let dre = db.income_statement(from, to)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dre)?);
        return Ok(());
    }

    println!();
    println!("📊 DRE - Demonstrativo de Resultado");
    print_period(from, to);
    println!("   Tax rate: {:.1}%", dre.tax_rate_percent);
    println!("   ──────────────────────────┼──────────────────┼────────");

    print_statement_line(&dre.gross_revenue, true);
    print_statement_line(&dre.taxes, false);
    print_statement_line(&dre.variable_costs, true);
    print_statement_line(&dre.contribution_margin, false);
    print_statement_line(&dre.fixed_costs, true);
    print_statement_line(&dre.investments, true);
    println!("   ──────────────────────────┼──────────────────┼────────");
    print_statement_line(&dre.net_profit, false);

    if dre.repasse.inflow != 0 || dre.repasse.outflow != 0 {
        println!();
        println!(
            "   ℹ️  Repasse (not in the lines above): in {} / out {} / net {}",
            format_brl(dre.repasse.inflow),
            format_brl(dre.repasse.outflow),
            format_brl(dre.repasse.net)
        );
    }

    Ok(())
}

pub fn cmd_report_cashflow(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let totals = db.ledger_totals(from, to)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals.cash_flow)?);
        return Ok(());
    }

    println!();
    println!("💰 Cash Flow");
    print_period(from, to);
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Operational  revenue {:>16} │ expense {:>16} │ result {:>16}",
        format_brl(totals.operational.revenue),
        format_brl(totals.operational.expense),
        format_brl(totals.operational.result)
    );
    println!(
        "   Repasse      inflow  {:>16} │ outflow {:>16} │ net    {:>16}",
        format_brl(totals.repasse.inflow),
        format_brl(totals.repasse.outflow),
        format_brl(totals.repasse.net)
    );
    println!("   ─────────────────────────────────────────────");
    println!("   Net movement {:>16}", format_brl(totals.cash_flow.net));

    Ok(())
}

pub fn cmd_report_balance(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let totals = db.ledger_totals(from, to)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals.balance)?);
        return Ok(());
    }

    println!();
    println!("⚖️  Realized vs Forecast");
    print_period(from, to);
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Realized (paid)          {:>16}",
        format_brl(totals.balance.realized.result)
    );
    println!(
        "   Forecast (non-cancelled) {:>16}",
        format_brl(totals.balance.forecast.result)
    );
    println!(
        "   Gap                      {:>16}",
        format_brl(totals.balance.gap)
    );

    Ok(())
}

pub fn cmd_report_costs(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let totals = db.ledger_totals(from, to)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals.costs)?);
        return Ok(());
    }

    println!();
    println!("🧮 Cost Breakdown");
    print_period(from, to);
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Direct (project-linked)  {:>16}",
        format_brl(totals.costs.direct)
    );
    println!(
        "   Fixed (structure)        {:>16}",
        format_brl(totals.costs.fixed)
    );
    println!(
        "   Total                    {:>16}",
        format_brl(totals.costs.total)
    );

    Ok(())
}

pub fn cmd_report_profitability(db: &Database, sort: &str, json: bool) -> Result<()> {
    let sort: ProfitSort = sort.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let rows = db.client_profitability(sort)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No clients found. Register one with:");
        println!("  apura clients add \"Acme\"");
        return Ok(());
    }

    println!();
    println!("📈 Client Profitability");
    println!(
        "   {:20} │ {:>14} │ {:>14} │ {:>14} │ {:>14} │ {:>7}",
        "Client", "Revenue", "Direct", "Labor", "Profit", "Margin"
    );
    println!("   ─────────────────────┼────────────────┼────────────────┼────────────────┼────────────────┼────────");

    for row in &rows {
        println!(
            "   {:20} │ {:>14} │ {:>14} │ {:>14} │ {:>14} │ {:>6.1}%",
            truncate(&row.client_name, 20),
            format_brl(row.revenue),
            format_brl(row.direct_costs),
            format_brl(row.labor_cost),
            format_brl(row.profit),
            row.margin
        );
        if !row.members_without_rate.is_empty() {
            println!(
                "     ⚠️  no hourly rate for: {}",
                row.members_without_rate.join(", ")
            );
        }
    }

    Ok(())
}
