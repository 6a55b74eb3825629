//! Time tracking and hourly rates

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date_col, Database};
use crate::error::{Error, Result};
use crate::models::TimeEntry;

fn map_time_entry_row(row: &Row<'_>) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        member: row.get(2)?,
        minutes: row.get(3)?,
        date: parse_date_col(4, row.get::<_, String>(4)?)?,
    })
}

impl Database {
    pub fn add_time_entry(
        &self,
        project_id: i64,
        member: &str,
        minutes: i64,
        date: NaiveDate,
    ) -> Result<TimeEntry> {
        let member = member.trim();
        if member.is_empty() {
            return Err(Error::InvalidData("member must not be empty".into()));
        }
        if minutes <= 0 {
            return Err(Error::InvalidData("minutes must be positive".into()));
        }
        let _ = self.get_project(project_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO time_entries (project_id, member, minutes, date) VALUES (?, ?, ?, ?)",
            params![project_id, member, minutes, date.to_string()],
        )?;
        let id = conn.last_insert_rowid();

        conn.query_row(
            "SELECT id, project_id, member, minutes, date FROM time_entries WHERE id = ?",
            params![id],
            map_time_entry_row,
        )
        .map_err(Into::into)
    }

    pub fn list_time_entries(&self) -> Result<Vec<TimeEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, member, minutes, date FROM time_entries ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], map_time_entry_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Set a member's hourly rate in minor units per hour
    pub fn set_hourly_rate(&self, member: &str, rate: i64) -> Result<()> {
        let member = member.trim();
        if member.is_empty() {
            return Err(Error::InvalidData("member must not be empty".into()));
        }
        if rate < 0 {
            return Err(Error::InvalidData("rate must not be negative".into()));
        }
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO hourly_rates (member, rate) VALUES (?, ?)
            ON CONFLICT(member) DO UPDATE SET rate = excluded.rate
            "#,
            params![member, rate],
        )?;
        Ok(())
    }

    /// All configured hourly rates, keyed by member
    pub fn hourly_rates(&self) -> Result<HashMap<String, i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT member, rate FROM hourly_rates")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get(1)?)))?;
        Ok(rows.collect::<std::result::Result<HashMap<_, _>, _>>()?)
    }
}
