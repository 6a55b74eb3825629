//! Domain models for Apura
//!
//! Monetary values are integers in minor currency units (centavos).
//! There are no fractional amounts anywhere in the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Transaction kind: money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Receita - money in
    Revenue,
    /// Despesa - money out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "receita",
            Self::Expense => "despesa",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receita" | "revenue" => Ok(Self::Revenue),
            "despesa" | "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a transaction counts toward the operational result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    /// Counts toward the income statement
    Operational,
    /// Excluded from the income statement (repasse flows live here)
    NonOperational,
}

impl Nature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operacional",
            Self::NonOperational => "nao_operacional",
        }
    }
}

impl std::str::FromStr for Nature {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operacional" | "operational" => Ok(Self::Operational),
            "nao_operacional" | "não_operacional" | "non_operational" => Ok(Self::NonOperational),
            _ => Err(format!("Unknown nature: {}", s)),
        }
    }
}

impl std::fmt::Display for Nature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cost attribution for expenses
///
/// Always derived from project linkage during preparation, never taken
/// from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    /// Attributable to one client/project
    Direct,
    /// General overhead
    Fixed,
}

impl CostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direto",
            Self::Fixed => "fixo",
        }
    }
}

impl std::str::FromStr for CostType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direto" | "direct" => Ok(Self::Direct),
            "fixo" | "fixed" => Ok(Self::Fixed),
            _ => Err(format!("Unknown cost type: {}", s)),
        }
    }
}

impl std::fmt::Display for CostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Paid => "pago",
            Self::Overdue => "atrasado",
            Self::Cancelled => "cancelado",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendente" | "pending" => Ok(Self::Pending),
            "pago" | "paid" => Ok(Self::Paid),
            "atrasado" | "overdue" => Ok(Self::Overdue),
            "cancelado" | "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw transaction input, before validation
///
/// Enum fields arrive as free text and date fields as ISO strings; the
/// validator parses and checks them, collecting every violation instead
/// of stopping at the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    pub description: String,
    /// "receita" or "despesa"
    #[serde(rename = "type")]
    pub kind: String,
    /// "operacional" or "nao_operacional"
    pub nature: String,
    /// Ignored in practice: cost type is derived from project linkage
    pub cost_type: Option<String>,
    /// Pass-through media spend paid on a client's behalf
    pub is_repasse: bool,
    pub category: String,
    /// Minor currency units, must be positive
    pub value: i64,
    pub status: String,
    /// Due/expected date, ISO format (YYYY-MM-DD)
    pub date: String,
    /// Accounting period; defaults to `date` when absent
    pub competence_date: Option<String>,
    /// Actual settlement date
    pub payment_date: Option<String>,
    pub project_id: Option<i64>,
}

/// A transaction that passed structural and business-rule validation
///
/// Fields are parsed and bounded but defaults and corrections have not
/// been applied yet; that is the preparer's job.
#[derive(Debug, Clone)]
pub struct ValidatedTransaction {
    pub description: String,
    pub kind: TransactionKind,
    pub nature: Nature,
    pub cost_type: Option<CostType>,
    pub is_repasse: bool,
    pub category: String,
    pub value: i64,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    pub competence_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
}

/// A ledger-ready transaction: validated, normalized, defaults applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedTransaction {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub nature: Nature,
    pub cost_type: CostType,
    pub is_repasse: bool,
    pub category: String,
    pub value: i64,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    pub competence_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
}

/// A persisted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub nature: Nature,
    pub cost_type: CostType,
    pub is_repasse: bool,
    pub category: String,
    pub value: i64,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    pub competence_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Raw-input view of this row, used to re-run the validate/prepare
    /// pipeline on every mutation
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            description: self.description.clone(),
            kind: self.kind.as_str().to_string(),
            nature: self.nature.as_str().to_string(),
            cost_type: Some(self.cost_type.as_str().to_string()),
            is_repasse: self.is_repasse,
            category: self.category.clone(),
            value: self.value,
            status: self.status.as_str().to_string(),
            date: self.date.to_string(),
            competence_date: Some(self.competence_date.to_string()),
            payment_date: self.payment_date.map(|d| d.to_string()),
            project_id: self.project_id,
        }
    }

    /// Ledger-ready view of this row (drops identity columns)
    pub fn prepared(&self) -> PreparedTransaction {
        PreparedTransaction {
            description: self.description.clone(),
            kind: self.kind,
            nature: self.nature,
            cost_type: self.cost_type,
            is_repasse: self.is_repasse,
            category: self.category.clone(),
            value: self.value,
            status: self.status,
            date: self.date,
            competence_date: self.competence_date,
            payment_date: self.payment_date,
            project_id: self.project_id,
        }
    }
}

/// A client of the agency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A project, always owned by one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A time-tracking entry linked to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub project_id: i64,
    /// Team member the time belongs to
    pub member: String,
    pub minutes: i64,
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Operational totals: nature = operational, repasse excluded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalTotals {
    pub revenue: i64,
    pub expense: i64,
    /// revenue - expense
    pub result: i64,
}

/// Pass-through totals: is_repasse only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepasseTotals {
    pub inflow: i64,
    pub outflow: i64,
    /// inflow - outflow
    pub net: i64,
}

/// Cash flow: operational result plus repasse net, components kept apart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub operational: OperationalTotals,
    pub repasse: RepasseTotals,
    /// operational.result + repasse.net
    pub net: i64,
}

/// Paid-only vs all-non-cancelled operational totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedVsForecast {
    /// What actually settled (status = paid)
    pub realized: OperationalTotals,
    /// What is expected (everything not cancelled)
    pub forecast: OperationalTotals,
    /// forecast.result - realized.result
    pub gap: i64,
}

/// Operational, non-repasse expenses split by cost type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub direct: i64,
    pub fixed: i64,
    pub total: i64,
}

/// Everything the aggregator derives from one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub operational: OperationalTotals,
    pub repasse: RepasseTotals,
    pub cash_flow: CashFlowSummary,
    pub balance: RealizedVsForecast,
    pub costs: CostBreakdown,
}

/// Per-category amount for drill-down inside a statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub name: String,
    pub value: i64,
}

/// One line of the income statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    pub label: String,
    pub value: i64,
    /// Percentage of gross revenue, only on margin lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_of_revenue: Option<f64>,
    /// Per-category drill-down, sorted by value descending
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub categories: Vec<CategoryAmount>,
}

/// The seven-line DRE (Demonstrativo de Resultado)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub gross_revenue: StatementLine,
    pub taxes: StatementLine,
    pub variable_costs: StatementLine,
    pub contribution_margin: StatementLine,
    pub fixed_costs: StatementLine,
    pub investments: StatementLine,
    pub net_profit: StatementLine,
    /// Informational only, never summed into the lines above
    pub repasse: RepasseTotals,
    pub tax_rate_percent: f64,
}

/// Per-client profitability row
///
/// The labor cost leg treats members without a configured hourly rate
/// as costing zero, which inflates apparent profitability. That is a
/// known data-quality gap, surfaced through `members_without_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfitability {
    pub client_id: i64,
    pub client_name: String,
    pub revenue: i64,
    pub direct_costs: i64,
    pub labor_cost: i64,
    pub profit: i64,
    /// Percent with two decimals; 0 when revenue is 0
    pub margin: f64,
    /// Members whose time was counted at rate 0
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members_without_rate: Vec<String>,
}
