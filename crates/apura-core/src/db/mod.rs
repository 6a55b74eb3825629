//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Transaction lifecycle (validate -> prepare -> persist)
//! - `clients` - Clients and their projects
//! - `time_entries` - Time tracking and hourly rates
//! - `settings` - Organization-level configuration (tax rate)
//! - `reports` - Snapshot fetch plus the derived financial views
//!
//! The database is the read-through repository at the engine boundary:
//! reports always fetch a fresh snapshot and hand it to the pure
//! aggregation functions, never caching derived state.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};
use crate::validate::TransactionValidator;

mod clients;
mod reports;
mod settings;
mod time_entries;
mod transactions;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored DATE column
pub(crate) fn parse_date_col(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

/// Parse a stored enum column via FromStr
pub(crate) fn parse_enum_col<T>(idx: usize, s: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    validator: TransactionValidator,
    /// Keeps a throwaway database's directory alive; removed (WAL
    /// sidecars included) when the last clone drops
    temp_dir: Option<Arc<tempfile::TempDir>>,
}

impl Database {
    /// Create a new database connection pool
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            validator: TransactionValidator::new(),
            temp_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a file in a fresh temporary directory rather than
    /// `:memory:` because the connection pool would give each
    /// connection its own empty in-memory database. The directory is
    /// deleted when the last clone of this handle drops.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("apura.db");
        let path = path
            .to_str()
            .ok_or_else(|| Error::InvalidData("temp path is not valid UTF-8".into()))?;

        let mut db = Self::new(path)?;
        db.temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    pub(crate) fn validator(&self) -> &TransactionValidator {
        &self.validator
    }

    /// Clear all ledger data but preserve configuration
    ///
    /// Clears: transactions, time_entries, projects, clients,
    /// hourly_rates. Preserves: settings.
    pub fn soft_reset(&self) -> Result<()> {
        let conn = self.conn()?;

        // Delete in order respecting foreign key constraints
        conn.execute_batch(
            r#"
            DELETE FROM time_entries;
            DELETE FROM transactions;
            DELETE FROM projects;
            DELETE FROM clients;
            DELETE FROM hourly_rates;
            "#,
        )?;

        info!("Database soft reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Clients
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Projects, always owned by one client
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                client_id INTEGER NOT NULL REFERENCES clients(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_projects_client ON projects(client_id);

            -- The classified ledger. Rows only land here after the
            -- validate -> prepare pipeline; the same pipeline runs again
            -- on every update.
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                type TEXT NOT NULL,                  -- receita, despesa
                nature TEXT NOT NULL,                -- operacional, nao_operacional
                cost_type TEXT NOT NULL,             -- direto, fixo (derived)
                is_repasse BOOLEAN NOT NULL DEFAULT 0,
                category TEXT NOT NULL,
                value INTEGER NOT NULL,              -- minor units (centavos)
                status TEXT NOT NULL DEFAULT 'pendente',
                date DATE NOT NULL,                  -- due/expected date
                competence_date DATE NOT NULL,       -- accounting period
                payment_date DATE,                   -- actual settlement
                project_id INTEGER REFERENCES projects(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_competence ON transactions(competence_date);
            CREATE INDEX IF NOT EXISTS idx_transactions_status ON transactions(status);
            CREATE INDEX IF NOT EXISTS idx_transactions_project ON transactions(project_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_repasse ON transactions(is_repasse);

            -- Time tracking
            CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY,
                project_id INTEGER NOT NULL REFERENCES projects(id),
                member TEXT NOT NULL,
                minutes INTEGER NOT NULL,
                date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_time_entries_project ON time_entries(project_id);
            CREATE INDEX IF NOT EXISTS idx_time_entries_member ON time_entries(member);

            -- Hourly rate per team member, minor units per hour
            CREATE TABLE IF NOT EXISTS hourly_rates (
                member TEXT PRIMARY KEY,
                rate INTEGER NOT NULL
            );

            -- Organization-level settings (tax rate percentage)
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}
