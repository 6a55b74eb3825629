//! Ledger aggregation primitives
//!
//! Pure folds over a snapshot of ledger-ready transactions. Every
//! report in the crate goes through these filters, so the income
//! statement, cash flow and profitability views can never disagree on
//! what counts as operational or pass-through.
//!
//! All functions are total and re-derive their result from the full
//! snapshot on every call; there is no incremental state to corrupt.

use crate::models::{
    CashFlowSummary, CostBreakdown, CostType, LedgerTotals, Nature, OperationalTotals,
    PreparedTransaction, RealizedVsForecast, RepasseTotals, TransactionKind, TransactionStatus,
};

/// Operational flow: counts toward the agency's own result
///
/// Repasse is excluded here no matter its nature; the preparer forces
/// repasse non-operational, but the filter does not rely on that.
pub(crate) fn is_operational(tx: &PreparedTransaction) -> bool {
    tx.nature == Nature::Operational && !tx.is_repasse
}

fn sum_by_kind<'a>(txs: impl Iterator<Item = &'a PreparedTransaction>) -> OperationalTotals {
    let mut revenue = 0;
    let mut expense = 0;
    for tx in txs {
        match tx.kind {
            TransactionKind::Revenue => revenue += tx.value,
            TransactionKind::Expense => expense += tx.value,
        }
    }
    OperationalTotals {
        revenue,
        expense,
        result: revenue - expense,
    }
}

/// Revenue, expense and result over operational, non-repasse flows
pub fn operational_totals(txs: &[PreparedTransaction]) -> OperationalTotals {
    sum_by_kind(txs.iter().filter(|tx| is_operational(tx)))
}

/// Pass-through inflow, outflow and net
pub fn repasse_totals(txs: &[PreparedTransaction]) -> RepasseTotals {
    let mut inflow = 0;
    let mut outflow = 0;
    for tx in txs.iter().filter(|tx| tx.is_repasse) {
        match tx.kind {
            TransactionKind::Revenue => inflow += tx.value,
            TransactionKind::Expense => outflow += tx.value,
        }
    }
    RepasseTotals {
        inflow,
        outflow,
        net: inflow - outflow,
    }
}

/// Operational result plus repasse net, both components reported apart
pub fn cash_flow(txs: &[PreparedTransaction]) -> CashFlowSummary {
    let operational = operational_totals(txs);
    let repasse = repasse_totals(txs);
    CashFlowSummary {
        net: operational.result + repasse.net,
        operational,
        repasse,
    }
}

/// Operational totals restricted to settled transactions
pub fn realized_totals(txs: &[PreparedTransaction]) -> OperationalTotals {
    sum_by_kind(
        txs.iter()
            .filter(|tx| is_operational(tx) && tx.status == TransactionStatus::Paid),
    )
}

/// Operational totals over everything not cancelled
pub fn forecast_totals(txs: &[PreparedTransaction]) -> OperationalTotals {
    sum_by_kind(
        txs.iter()
            .filter(|tx| is_operational(tx) && tx.status != TransactionStatus::Cancelled),
    )
}

/// What actually happened vs what is expected
pub fn realized_vs_forecast(txs: &[PreparedTransaction]) -> RealizedVsForecast {
    let realized = realized_totals(txs);
    let forecast = forecast_totals(txs);
    RealizedVsForecast {
        realized,
        forecast,
        gap: forecast.result - realized.result,
    }
}

/// Operational, non-repasse expenses by cost type
pub fn cost_breakdown(txs: &[PreparedTransaction]) -> CostBreakdown {
    let mut direct = 0;
    let mut fixed = 0;
    for tx in txs
        .iter()
        .filter(|tx| is_operational(tx) && tx.kind == TransactionKind::Expense)
    {
        match tx.cost_type {
            CostType::Direct => direct += tx.value,
            CostType::Fixed => fixed += tx.value,
        }
    }
    CostBreakdown {
        direct,
        fixed,
        total: direct + fixed,
    }
}

/// All aggregates derived from one snapshot
pub fn aggregate(txs: &[PreparedTransaction]) -> LedgerTotals {
    LedgerTotals {
        operational: operational_totals(txs),
        repasse: repasse_totals(txs),
        cash_flow: cash_flow(txs),
        balance: realized_vs_forecast(txs),
        costs: cost_breakdown(txs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn tx(
        kind: TransactionKind,
        value: i64,
        category: &str,
        is_repasse: bool,
    ) -> PreparedTransaction {
        PreparedTransaction {
            description: format!("{} {}", category, value),
            kind,
            nature: if is_repasse {
                Nature::NonOperational
            } else {
                Nature::Operational
            },
            cost_type: CostType::Fixed,
            is_repasse,
            category: category.to_string(),
            value,
            status: TransactionStatus::Pending,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            competence_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            payment_date: None,
            project_id: None,
        }
    }

    #[test]
    fn test_single_revenue_counts_as_operational() {
        let txs = vec![tx(TransactionKind::Revenue, 100_000, "Fee Mensal", false)];
        let totals = operational_totals(&txs);
        assert_eq!(totals.revenue, 100_000);
        assert_eq!(totals.expense, 0);
        assert_eq!(totals.result, 100_000);
    }

    #[test]
    fn test_repasse_expense_stays_out_of_operational() {
        let txs = vec![tx(
            TransactionKind::Expense,
            50_000,
            "Compra de Mídia/Ads",
            true,
        )];
        assert_eq!(operational_totals(&txs), OperationalTotals::default());
        let repasse = repasse_totals(&txs);
        assert_eq!(repasse.outflow, 50_000);
        assert_eq!(repasse.net, -50_000);
    }

    #[test]
    fn test_operational_excludes_repasse_even_if_marked_operational() {
        // The filter must not rely on the preparer's nature correction.
        let mut bad = tx(TransactionKind::Expense, 30_000, "Mídia Google", true);
        bad.nature = Nature::Operational;
        let txs = vec![bad, tx(TransactionKind::Revenue, 10_000, "Fee Mensal", false)];
        let totals = operational_totals(&txs);
        assert_eq!(totals.expense, 0);
        assert_eq!(totals.revenue, 10_000);
    }

    #[test]
    fn test_cash_flow_keeps_components_apart() {
        let txs = vec![
            tx(TransactionKind::Revenue, 100_000, "Fee Mensal", false),
            tx(TransactionKind::Expense, 40_000, "Aluguel", false),
            tx(TransactionKind::Revenue, 50_000, "Repasse Mídia", true),
            tx(TransactionKind::Expense, 45_000, "Compra de Mídia/Ads", true),
        ];
        let flow = cash_flow(&txs);
        assert_eq!(flow.operational.result, 60_000);
        assert_eq!(flow.repasse.net, 5_000);
        assert_eq!(flow.net, 65_000);
    }

    #[test]
    fn test_realized_only_counts_paid() {
        let mut paid = tx(TransactionKind::Revenue, 70_000, "Fee Mensal", false);
        paid.status = TransactionStatus::Paid;
        let pending = tx(TransactionKind::Revenue, 30_000, "Fee Mensal", false);
        let txs = vec![paid, pending];

        assert_eq!(realized_totals(&txs).revenue, 70_000);
        assert_eq!(operational_totals(&txs).revenue, 100_000);
    }

    #[test]
    fn test_forecast_excludes_cancelled() {
        let mut cancelled = tx(TransactionKind::Revenue, 20_000, "Fee Mensal", false);
        cancelled.status = TransactionStatus::Cancelled;
        let txs = vec![cancelled, tx(TransactionKind::Revenue, 80_000, "Fee Mensal", false)];

        let balance = realized_vs_forecast(&txs);
        assert_eq!(balance.forecast.revenue, 80_000);
        assert_eq!(balance.realized.revenue, 0);
        assert_eq!(balance.gap, 80_000);
        // Unrestricted view still sees the cancelled row
        assert_eq!(operational_totals(&txs).revenue, 100_000);
    }

    #[test]
    fn test_cost_breakdown_splits_by_cost_type() {
        let mut direct = tx(TransactionKind::Expense, 25_000, "Freela", false);
        direct.cost_type = CostType::Direct;
        direct.project_id = Some(1);
        let fixed = tx(TransactionKind::Expense, 60_000, "Salários", false);
        let repasse = tx(TransactionKind::Expense, 10_000, "Compra de Mídia/Ads", true);
        let txs = vec![direct, fixed, repasse];

        let costs = cost_breakdown(&txs);
        assert_eq!(costs.direct, 25_000);
        assert_eq!(costs.fixed, 60_000);
        assert_eq!(costs.total, 85_000);
    }

    #[test]
    fn test_aggregate_is_consistent_with_parts() {
        let txs = vec![
            tx(TransactionKind::Revenue, 100_000, "Fee Mensal", false),
            tx(TransactionKind::Expense, 40_000, "Aluguel", false),
            tx(TransactionKind::Expense, 45_000, "Compra de Mídia/Ads", true),
        ];
        let totals = aggregate(&txs);
        assert_eq!(totals.operational, operational_totals(&txs));
        assert_eq!(totals.repasse, repasse_totals(&txs));
        assert_eq!(totals.cash_flow.net, totals.operational.result + totals.repasse.net);
    }

    #[test]
    fn test_empty_snapshot_is_all_zeros() {
        let totals = aggregate(&[]);
        assert_eq!(totals.operational, OperationalTotals::default());
        assert_eq!(totals.repasse, RepasseTotals::default());
        assert_eq!(totals.costs, CostBreakdown::default());
    }
}
