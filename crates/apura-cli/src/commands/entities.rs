//! Client, project, time entry and hourly rate commands

use anyhow::{Context, Result};
use apura_core::db::Database;
use apura_core::import::parse_money;
use chrono::{NaiveDate, Utc};

use super::{format_brl, truncate};

pub fn cmd_clients_add(db: &Database, name: &str) -> Result<()> {
    let client = db.add_client(name)?;
    println!("✅ Registered client [{}] {}", client.id, client.name);
    Ok(())
}

pub fn cmd_clients_list(db: &Database) -> Result<()> {
    let clients = db.list_clients()?;

    if clients.is_empty() {
        println!("No clients yet. Register one with:");
        println!("  apura clients add \"Acme\"");
        return Ok(());
    }

    println!();
    println!("👥 Clients");
    println!("   ──────────────────────────────");
    for client in clients {
        println!("   [{}] {}", client.id, client.name);
    }

    Ok(())
}

pub fn cmd_projects_add(db: &Database, name: &str, client_id: i64) -> Result<()> {
    let project = db.add_project(name, client_id)?;
    println!(
        "✅ Registered project [{}] {} (client {})",
        project.id, project.name, project.client_id
    );
    Ok(())
}

pub fn cmd_projects_list(db: &Database) -> Result<()> {
    let projects = db.list_projects()?;

    if projects.is_empty() {
        println!("No projects yet. Register one with:");
        println!("  apura projects add \"Site novo\" --client 1");
        return Ok(());
    }

    println!();
    println!("📁 Projects");
    println!("   ──────────────────────────────");
    for project in projects {
        println!(
            "   [{}] {} (client {})",
            project.id,
            truncate(&project.name, 40),
            project.client_id
        );
    }

    Ok(())
}

pub fn cmd_time_log(
    db: &Database,
    project_id: i64,
    member: &str,
    minutes: i64,
    date: Option<&str>,
) -> Result<()> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };

    let entry = db.add_time_entry(project_id, member, minutes, date)?;

    println!(
        "✅ Logged {}min for {} on project {} ({})",
        entry.minutes, entry.member, entry.project_id, entry.date
    );

    Ok(())
}

pub fn cmd_rate_set(db: &Database, member: &str, rate: &str) -> Result<()> {
    let rate = parse_money(rate).map_err(|e| anyhow::anyhow!("Invalid rate: {}", e))?;
    db.set_hourly_rate(member, rate)?;

    println!("✅ Hourly rate for {} set to {}", member, format_brl(rate));

    Ok(())
}
