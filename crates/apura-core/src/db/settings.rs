//! Organization-level settings

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};

const TAX_RATE_KEY: &str = "tax_rate_percent";

impl Database {
    /// Configured tax percentage applied to gross revenue (default 0)
    pub fn tax_rate(&self) -> Result<f64> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![TAX_RATE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(s) => s
                .parse()
                .map_err(|_| Error::InvalidData(format!("stored tax rate is not a number: {}", s))),
            None => Ok(0.0),
        }
    }

    pub fn set_tax_rate(&self, percent: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::InvalidData(
                "tax rate must be between 0 and 100".into(),
            ));
        }
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![TAX_RATE_KEY, percent.to_string()],
        )?;
        Ok(())
    }
}
