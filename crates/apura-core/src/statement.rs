//! Income statement (DRE) builder
//!
//! Builds the seven-line DRE from a transaction snapshot and the
//! configured tax rate. All arithmetic is integer minor units; the only
//! rounding happens once, on the tax line. Repasse totals ride along as
//! an informational extra, never summed into the seven lines.

use std::collections::HashMap;

use crate::categories::{CategoryGroup, CategoryMatcher};
use crate::ledger::{self, is_operational};
use crate::models::{
    CategoryAmount, IncomeStatement, PreparedTransaction, StatementLine, TransactionKind,
};

/// Builds DRE statements with a given category rule table
#[derive(Debug, Clone, Default)]
pub struct IncomeStatementBuilder {
    matcher: CategoryMatcher,
}

impl IncomeStatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matcher(matcher: CategoryMatcher) -> Self {
        Self { matcher }
    }

    pub fn build(&self, txs: &[PreparedTransaction], tax_rate_percent: f64) -> IncomeStatement {
        let revenues: Vec<&PreparedTransaction> = txs
            .iter()
            .filter(|tx| is_operational(tx) && tx.kind == TransactionKind::Revenue)
            .collect();

        let expenses: Vec<&PreparedTransaction> = txs
            .iter()
            .filter(|tx| is_operational(tx) && tx.kind == TransactionKind::Expense)
            .collect();

        let mut variable = Vec::new();
        let mut investment = Vec::new();
        let mut fixed = Vec::new();
        for tx in &expenses {
            match self.matcher.classify(&tx.category) {
                CategoryGroup::Variable => variable.push(*tx),
                CategoryGroup::Investment => investment.push(*tx),
                // Fixed by elimination, whatever else the category is
                _ => fixed.push(*tx),
            }
        }

        let gross_revenue: i64 = revenues.iter().map(|tx| tx.value).sum();
        let taxes = (gross_revenue as f64 * tax_rate_percent / 100.0).round() as i64;
        let variable_total: i64 = variable.iter().map(|tx| tx.value).sum();
        let contribution_margin = gross_revenue - taxes - variable_total;
        let fixed_total: i64 = fixed.iter().map(|tx| tx.value).sum();
        let investment_total: i64 = investment.iter().map(|tx| tx.value).sum();
        let net_profit = contribution_margin - fixed_total - investment_total;

        IncomeStatement {
            gross_revenue: StatementLine {
                label: "Receita Bruta".to_string(),
                value: gross_revenue,
                percent_of_revenue: None,
                categories: group_by_category(&revenues),
            },
            taxes: StatementLine {
                label: "Impostos".to_string(),
                value: taxes,
                percent_of_revenue: None,
                categories: Vec::new(),
            },
            variable_costs: StatementLine {
                label: "Custos Variáveis".to_string(),
                value: variable_total,
                percent_of_revenue: None,
                categories: group_by_category(&variable),
            },
            contribution_margin: StatementLine {
                label: "Margem de Contribuição".to_string(),
                value: contribution_margin,
                percent_of_revenue: Some(percent_of(contribution_margin, gross_revenue)),
                categories: Vec::new(),
            },
            fixed_costs: StatementLine {
                label: "Custos Fixos".to_string(),
                value: fixed_total,
                percent_of_revenue: None,
                categories: group_by_category(&fixed),
            },
            investments: StatementLine {
                label: "Investimentos".to_string(),
                value: investment_total,
                percent_of_revenue: None,
                categories: group_by_category(&investment),
            },
            net_profit: StatementLine {
                label: "Lucro Operacional".to_string(),
                value: net_profit,
                percent_of_revenue: Some(percent_of(net_profit, gross_revenue)),
                categories: Vec::new(),
            },
            repasse: ledger::repasse_totals(txs),
            tax_rate_percent,
        }
    }
}

/// Build a DRE with the built-in category taxonomy
pub fn build_income_statement(
    txs: &[PreparedTransaction],
    tax_rate_percent: f64,
) -> IncomeStatement {
    IncomeStatementBuilder::new().build(txs, tax_rate_percent)
}

/// Percentage with two decimals; 0 when the base is 0
fn percent_of(value: i64, base: i64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    (value as f64 / base as f64 * 10_000.0).round() / 100.0
}

/// Sum values per category, sorted by value descending, ties by label
/// ascending for determinism
fn group_by_category(txs: &[&PreparedTransaction]) -> Vec<CategoryAmount> {
    let mut by_category: HashMap<&str, i64> = HashMap::new();
    for tx in txs {
        *by_category.entry(tx.category.as_str()).or_insert(0) += tx.value;
    }
    let mut groups: Vec<CategoryAmount> = by_category
        .into_iter()
        .map(|(name, value)| CategoryAmount {
            name: name.to_string(),
            value,
        })
        .collect();
    groups.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostType, Nature, TransactionStatus};
    use chrono::NaiveDate;

    fn tx(kind: TransactionKind, value: i64, category: &str, is_repasse: bool) -> PreparedTransaction {
        PreparedTransaction {
            description: category.to_string(),
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
    fn test_seven_line_identity() {
        // Revenue 1.000,00; 15% tax; variable costs 100,00
        let txs = vec![
            tx(TransactionKind::Revenue, 100_000, "Fee Mensal", false),
            tx(TransactionKind::Expense, 10_000, "Taxas de Pagamento", false),
            tx(TransactionKind::Expense, 20_000, "Salários", false),
            tx(TransactionKind::Expense, 5_000, "Equipamentos", false),
        ];
        let dre = build_income_statement(&txs, 15.0);

        assert_eq!(dre.gross_revenue.value, 100_000);
        assert_eq!(dre.taxes.value, 15_000);
        assert_eq!(dre.variable_costs.value, 10_000);
        assert_eq!(dre.contribution_margin.value, 75_000);
        assert_eq!(dre.contribution_margin.percent_of_revenue, Some(75.0));
        assert_eq!(dre.fixed_costs.value, 20_000);
        assert_eq!(dre.investments.value, 5_000);
        assert_eq!(dre.net_profit.value, 50_000);
        assert_eq!(dre.net_profit.percent_of_revenue, Some(50.0));

        // The line identities hold exactly
        assert_eq!(
            dre.contribution_margin.value,
            dre.gross_revenue.value - dre.taxes.value - dre.variable_costs.value
        );
        assert_eq!(
            dre.net_profit.value,
            dre.contribution_margin.value - dre.fixed_costs.value - dre.investments.value
        );
    }

    #[test]
    fn test_repasse_is_informational_only() {
        // A repasse expense appears in the informational
        // line and in none of the seven computed lines.
        let txs = vec![
            tx(TransactionKind::Revenue, 100_000, "Fee Mensal", false),
            tx(TransactionKind::Expense, 50_000, "Compra de Mídia/Ads", true),
        ];
        let dre = build_income_statement(&txs, 0.0);

        assert_eq!(dre.repasse.outflow, 50_000);
        assert_eq!(dre.variable_costs.value, 0);
        assert_eq!(dre.fixed_costs.value, 0);
        assert_eq!(dre.investments.value, 0);
        assert_eq!(dre.net_profit.value, 100_000);
    }

    #[test]
    fn test_taxes_round_half_up() {
        // 333,33 at 15% = 49,9995 -> 50,00
        let txs = vec![tx(TransactionKind::Revenue, 33_333, "Fee Mensal", false)];
        let dre = build_income_statement(&txs, 15.0);
        assert_eq!(dre.taxes.value, 5_000);
    }

    #[test]
    fn test_category_drilldown_sorted_desc_with_label_ties() {
        let txs = vec![
            tx(TransactionKind::Revenue, 30_000, "Consultoria", false),
            tx(TransactionKind::Revenue, 50_000, "Fee Mensal", false),
            tx(TransactionKind::Revenue, 20_000, "Fee Mensal", false),
            tx(TransactionKind::Revenue, 30_000, "Projeto Pontual", false),
        ];
        let dre = build_income_statement(&txs, 0.0);

        let names: Vec<&str> = dre
            .gross_revenue
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        // Fee Mensal 70k, then the 30k tie broken alphabetically
        assert_eq!(names, vec!["Fee Mensal", "Consultoria", "Projeto Pontual"]);
        assert_eq!(dre.gross_revenue.categories[0].value, 70_000);
    }

    #[test]
    fn test_unknown_expense_category_falls_to_fixed() {
        let txs = vec![
            tx(TransactionKind::Revenue, 10_000, "Fee Mensal", false),
            tx(TransactionKind::Expense, 4_000, "Categoria Inventada", false),
        ];
        let dre = build_income_statement(&txs, 0.0);
        assert_eq!(dre.fixed_costs.value, 4_000);
        assert_eq!(dre.variable_costs.value, 0);
        assert_eq!(dre.investments.value, 0);
    }

    #[test]
    fn test_empty_snapshot_zero_margins() {
        let dre = build_income_statement(&[], 15.0);
        assert_eq!(dre.gross_revenue.value, 0);
        assert_eq!(dre.contribution_margin.percent_of_revenue, Some(0.0));
        assert_eq!(dre.net_profit.percent_of_revenue, Some(0.0));
    }
}
