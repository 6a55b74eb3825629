//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` / `open_db` - Database location and opening
//! - `cmd_init` - Initialize the database
//! - `cmd_import` - Import transactions from CSV
//! - `cmd_reset` - Wipe all data, keeping the schema

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apura_core::db::Database;

/// Resolve the database path: explicit --db wins, otherwise a file in
/// the user data directory, falling back to the current directory.
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let base = match dirs::data_dir() {
        Some(dir) => dir.join("apura"),
        None => PathBuf::from("."),
    };
    if !base.exists() {
        std::fs::create_dir_all(&base)
            .with_context(|| format!("Failed to create {}", base.display()))?;
    }
    Ok(base.join("apura.db"))
}

/// Open the database, running migrations if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Register clients: apura clients add \"Acme\"");
    println!("  2. Record transactions: apura tx add --description ... ");
    println!("  3. Or import a batch: apura import --file lancamentos.csv");

    Ok(())
}

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let summary = apura_core::import_csv_file(db, file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!();
    println!("📊 Import Summary");
    println!("   Imported: {}", summary.imported);
    println!("   Rejected: {}", summary.failed);

    for error in &summary.errors {
        println!("   ❌ Row {}: {}", error.row, error.message);
    }

    if summary.failed > 0 {
        println!();
        println!("   Rejected rows were skipped; fix them and re-import.");
    }

    Ok(())
}

pub fn cmd_reset(db_path: &Path, yes: bool) -> Result<()> {
    use std::io::{self, Write};

    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    if !yes {
        print!("⚠️  This will delete all transactions, clients, projects and time entries.\n\n");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let db = open_db(db_path)?;
    db.soft_reset()?;

    println!("✅ Database reset complete.");

    Ok(())
}
