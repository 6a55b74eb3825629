//! CSV import of transaction batches
//!
//! Each row is mapped to a raw [`TransactionInput`] and pushed through
//! the same validate -> prepare -> persist path as manual entry; the
//! importer adds no rules of its own. Row failures are collected and
//! reported, never fatal to the batch.
//!
//! Expected header:
//! `description,type,nature,is_repasse,category,value,status,date,competence_date,payment_date,project_id`
//! with `value` in reais (e.g. `1000.00`), converted to minor units.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::TransactionInput;

#[derive(Debug, Deserialize)]
struct CsvRow {
    description: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    nature: String,
    #[serde(default)]
    is_repasse: String,
    category: String,
    value: String,
    #[serde(default)]
    status: String,
    date: String,
    #[serde(default)]
    competence_date: String,
    #[serde(default)]
    payment_date: String,
    #[serde(default)]
    project_id: String,
}

/// One rejected row
#[derive(Debug, Clone)]
pub struct ImportRowError {
    /// 1-based data row number (header not counted)
    pub row: usize,
    pub message: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

/// Parse a decimal reais amount ("1234.56" or "1234,56") to minor units
pub fn parse_money(raw: &str) -> std::result::Result<i64, String> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err("empty amount".to_string());
    }
    let (whole, frac) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };
    if frac.len() > 2 {
        return Err(format!("more than two decimal places: {}", raw));
    }
    let whole: i64 = whole
        .parse()
        .map_err(|_| format!("invalid amount: {}", raw))?;
    let frac: i64 = if frac.is_empty() {
        0
    } else {
        // Pad "5" to "50"
        format!("{:0<2}", frac)
            .parse()
            .map_err(|_| format!("invalid amount: {}", raw))?
    };
    if whole < 0 {
        return Err(format!("negative amount: {}", raw));
    }
    whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| format!("amount out of range: {}", raw))
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "sim" | "yes"
    )
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn row_to_input(row: &CsvRow) -> std::result::Result<TransactionInput, String> {
    let value = parse_money(&row.value)?;
    let project_id = match non_empty(&row.project_id) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| format!("invalid project_id: {}", raw))?,
        ),
        None => None,
    };
    Ok(TransactionInput {
        description: row.description.clone(),
        kind: row.kind.clone(),
        nature: non_empty(&row.nature).unwrap_or_else(|| "operacional".to_string()),
        cost_type: None,
        is_repasse: parse_bool(&row.is_repasse),
        category: row.category.clone(),
        value,
        status: non_empty(&row.status).unwrap_or_else(|| "pendente".to_string()),
        date: row.date.trim().to_string(),
        competence_date: non_empty(&row.competence_date),
        payment_date: non_empty(&row.payment_date),
        project_id,
    })
}

/// Import transactions from a CSV reader
pub fn import_transactions(db: &Database, reader: impl Read) -> Result<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut summary = ImportSummary::default();

    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let outcome = record
            .map_err(|e| e.to_string())
            .and_then(|row| row_to_input(&row))
            .and_then(|input| {
                db.create_transaction(&input)
                    .map_err(|e| e.to_string())
            });

        match outcome {
            Ok(_) => summary.imported += 1,
            Err(message) => {
                warn!(row = row_number, %message, "import row rejected");
                summary.failed += 1;
                summary.errors.push(ImportRowError {
                    row: row_number,
                    message,
                });
            }
        }
    }

    info!(
        imported = summary.imported,
        failed = summary.failed,
        "import finished"
    );
    Ok(summary)
}

/// Import transactions from a CSV file on disk
pub fn import_csv_file(db: &Database, path: &Path) -> Result<ImportSummary> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Import(format!("cannot open {}: {}", path.display(), e)))?;
    import_transactions(db, file)
}
