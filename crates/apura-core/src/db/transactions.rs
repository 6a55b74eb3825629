//! Transaction lifecycle operations
//!
//! Every write path runs the full validate -> prepare pipeline, at
//! creation and on every later mutation. The table never holds a
//! partially valid row: either the pipeline passes and the whole row is
//! written, or the write is rejected with the collected violations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{parse_date_col, parse_datetime, parse_enum_col, Database};
use crate::error::{Error, Result};
use crate::models::{
    PreparedTransaction, Transaction, TransactionInput, TransactionStatus,
};
use crate::prepare::prepare;

fn map_transaction_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let created_at_str: String = row.get(13)?;
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        kind: parse_enum_col(2, row.get::<_, String>(2)?)?,
        nature: parse_enum_col(3, row.get::<_, String>(3)?)?,
        cost_type: parse_enum_col(4, row.get::<_, String>(4)?)?,
        is_repasse: row.get(5)?,
        category: row.get(6)?,
        value: row.get(7)?,
        status: parse_enum_col(8, row.get::<_, String>(8)?)?,
        date: parse_date_col(9, row.get::<_, String>(9)?)?,
        competence_date: parse_date_col(10, row.get::<_, String>(10)?)?,
        payment_date: row
            .get::<_, Option<String>>(11)?
            .map(|s| parse_date_col(11, s))
            .transpose()?,
        project_id: row.get(12)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const TRANSACTION_COLUMNS: &str = "id, description, type, nature, cost_type, is_repasse, \
     category, value, status, date, competence_date, payment_date, project_id, created_at";

impl Database {
    /// Create a transaction: validate, prepare, insert
    pub fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction> {
        let validated = self.validator().validate(input)?;
        let prepared = prepare(validated);
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions
                (description, type, nature, cost_type, is_repasse, category, value,
                 status, date, competence_date, payment_date, project_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                prepared.description,
                prepared.kind.as_str(),
                prepared.nature.as_str(),
                prepared.cost_type.as_str(),
                prepared.is_repasse,
                prepared.category,
                prepared.value,
                prepared.status.as_str(),
                prepared.date.to_string(),
                prepared.competence_date.to_string(),
                prepared.payment_date.map(|d| d.to_string()),
                prepared.project_id,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, category = %prepared.category, "transaction created");
        drop(conn);
        self.get_transaction(id)
    }

    /// Replace a transaction's fields, re-running the full pipeline
    pub fn update_transaction(&self, id: i64, input: &TransactionInput) -> Result<Transaction> {
        // Reject unknown ids before validating, for a clearer error
        let _ = self.get_transaction(id)?;

        let validated = self.validator().validate(input)?;
        let prepared = prepare(validated);
        let conn = self.conn()?;

        conn.execute(
            r#"
            UPDATE transactions SET
                description = ?, type = ?, nature = ?, cost_type = ?, is_repasse = ?,
                category = ?, value = ?, status = ?, date = ?, competence_date = ?,
                payment_date = ?, project_id = ?
            WHERE id = ?
            "#,
            params![
                prepared.description,
                prepared.kind.as_str(),
                prepared.nature.as_str(),
                prepared.cost_type.as_str(),
                prepared.is_repasse,
                prepared.category,
                prepared.value,
                prepared.status.as_str(),
                prepared.date.to_string(),
                prepared.competence_date.to_string(),
                prepared.payment_date.map(|d| d.to_string()),
                prepared.project_id,
                id,
            ],
        )?;

        drop(conn);
        self.get_transaction(id)
    }

    /// Transition a transaction's status, re-checking all invariants
    ///
    /// Marking paid without a payment date lets the preparer default it
    /// to today; any other transition leaves the payment date untouched.
    pub fn set_transaction_status(
        &self,
        id: i64,
        status: TransactionStatus,
        payment_date: Option<NaiveDate>,
    ) -> Result<Transaction> {
        let current = self.get_transaction(id)?;
        let mut input = current.to_input();
        input.status = status.as_str().to_string();
        if let Some(date) = payment_date {
            input.payment_date = Some(date.to_string());
        }
        self.update_transaction(id, &input)
    }

    /// Mark a transaction as paid
    pub fn mark_paid(&self, id: i64, payment_date: Option<NaiveDate>) -> Result<Transaction> {
        self.set_transaction_status(id, TransactionStatus::Paid, payment_date)
    }

    /// Delete a transaction unconditionally
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Transaction not found: {}", id)));
        }
        Ok(())
    }

    /// Fetch one transaction
    pub fn get_transaction(&self, id: i64) -> Result<Transaction> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM transactions WHERE id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id],
            map_transaction_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Transaction not found: {}", id)))
    }

    /// List transactions, newest due date first
    pub fn list_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit], map_transaction_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Full ledger snapshot for the pure aggregation functions
    ///
    /// Optionally bounded to a competence-date period.
    pub fn snapshot(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PreparedTransaction>> {
        let conn = self.conn()?;

        let mut conditions = Vec::new();
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(from) = from {
            conditions.push("competence_date >= ?");
            query_params.push(Box::new(from.to_string()));
        }
        if let Some(to) = to {
            conditions.push("competence_date <= ?");
            query_params.push(Box::new(to.to_string()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY id",
            TRANSACTION_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            map_transaction_row(row).map(|tx| tx.prepared())
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
