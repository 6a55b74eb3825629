//! Apura Core Library
//!
//! Financial ledger classification and reporting engine for a marketing
//! agency:
//! - Category rules (repasse eligibility, DRE drill-down groups)
//! - Transaction validation and preparation pipeline
//! - Pure ledger aggregation (operational, repasse, cash flow,
//!   realized vs forecast, cost breakdown)
//! - Seven-line income statement (DRE) builder
//! - Per-client profitability
//! - SQLite persistence and CSV import at the boundary
//!
//! Every report re-derives its numbers from a full snapshot through the
//! same shared filters, so the views cannot drift apart.

pub mod categories;
pub mod db;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod prepare;
pub mod profitability;
pub mod statement;
pub mod validate;

pub use categories::{is_repasse_eligible, CategoryGroup, CategoryMatcher, CategoryRule};
pub use db::Database;
pub use error::{Error, Result};
pub use import::{import_csv_file, import_transactions, ImportSummary};
pub use prepare::{prepare, prepare_at};
pub use profitability::{compute_profitability, ProfitSort};
pub use statement::{build_income_statement, IncomeStatementBuilder};
pub use validate::{
    FieldError, TransactionValidator, ValidationErrors, ValidationLimits, ViolationCode,
};
