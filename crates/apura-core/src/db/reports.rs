//! Derived financial views over the stored ledger
//!
//! Thin read-through layer: fetch a fresh snapshot, hand it to the pure
//! aggregation and statement functions, return the result. No derived
//! state is ever written back, so concurrent readers need no
//! coordination and a misread here cannot corrupt the ledger.

use chrono::NaiveDate;

use super::Database;
use crate::error::Result;
use crate::ledger;
use crate::models::{ClientProfitability, IncomeStatement, LedgerTotals};
use crate::profitability::{compute_profitability, ProfitSort};
use crate::statement::IncomeStatementBuilder;

impl Database {
    /// All ledger aggregates, optionally bounded to a competence period
    pub fn ledger_totals(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<LedgerTotals> {
        let snapshot = self.snapshot(from, to)?;
        Ok(ledger::aggregate(&snapshot))
    }

    /// The seven-line DRE using the configured tax rate
    pub fn income_statement(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<IncomeStatement> {
        let snapshot = self.snapshot(from, to)?;
        let tax_rate = self.tax_rate()?;
        Ok(IncomeStatementBuilder::new().build(&snapshot, tax_rate))
    }

    /// Per-client profitability over the full ledger
    ///
    /// The four collections are fetched independently, so the join is a
    /// best-effort point-in-time view, not a transactionally consistent
    /// one.
    pub fn client_profitability(&self, sort: ProfitSort) -> Result<Vec<ClientProfitability>> {
        let clients = self.list_clients()?;
        let projects = self.list_projects()?;
        let snapshot = self.snapshot(None, None)?;
        let time_entries = self.list_time_entries()?;
        let hourly_rates = self.hourly_rates()?;
        Ok(compute_profitability(
            &clients,
            &projects,
            &snapshot,
            &time_entries,
            &hourly_rates,
            sort,
        ))
    }
}
