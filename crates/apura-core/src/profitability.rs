//! Per-client profitability
//!
//! Joins the ledger with projects, clients, time tracking and hourly
//! rates. The join is best-effort point-in-time: the collections are
//! fetched independently and may be momentarily out of sync, and a
//! transaction or time entry referencing an unknown project is treated
//! as unassigned rather than failing the report.
//!
//! Members without a configured hourly rate contribute zero labor cost,
//! which inflates apparent profitability; affected members are listed
//! on each row so consumers can see the gap instead of trusting it.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::ledger::is_operational;
use crate::models::{
    Client, ClientProfitability, PreparedTransaction, Project, TimeEntry, TransactionKind,
};

/// Row ordering for profitability reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfitSort {
    Ascending,
    #[default]
    Descending,
}

impl std::str::FromStr for ProfitSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(format!("Unknown sort order: {} (use asc or desc)", s)),
        }
    }
}

/// Compute one profitability row per client
pub fn compute_profitability(
    clients: &[Client],
    projects: &[Project],
    txs: &[PreparedTransaction],
    time_entries: &[TimeEntry],
    hourly_rates: &HashMap<String, i64>,
    sort: ProfitSort,
) -> Vec<ClientProfitability> {
    let project_client: HashMap<i64, i64> =
        projects.iter().map(|p| (p.id, p.client_id)).collect();

    struct Accum {
        revenue: i64,
        direct_costs: i64,
        labor_cost: i64,
        members_without_rate: BTreeSet<String>,
    }

    let mut per_client: HashMap<i64, Accum> = clients
        .iter()
        .map(|c| {
            (
                c.id,
                Accum {
                    revenue: 0,
                    direct_costs: 0,
                    labor_cost: 0,
                    members_without_rate: BTreeSet::new(),
                },
            )
        })
        .collect();

    for tx in txs.iter().filter(|tx| is_operational(tx)) {
        let Some(project_id) = tx.project_id else {
            continue;
        };
        let Some(client_id) = project_client.get(&project_id) else {
            warn!(project_id, "transaction references unknown project, treated as unassigned");
            continue;
        };
        let Some(acc) = per_client.get_mut(client_id) else {
            warn!(client_id, "project references unknown client, skipped");
            continue;
        };
        match tx.kind {
            TransactionKind::Revenue => acc.revenue += tx.value,
            TransactionKind::Expense => acc.direct_costs += tx.value,
        }
    }

    for entry in time_entries {
        let Some(client_id) = project_client.get(&entry.project_id) else {
            continue;
        };
        let Some(acc) = per_client.get_mut(client_id) else {
            continue;
        };
        match hourly_rates.get(&entry.member) {
            Some(rate) => {
                // minutes/60 x rate, rounded to the nearest minor unit
                acc.labor_cost +=
                    ((entry.minutes as f64 / 60.0) * *rate as f64).round() as i64;
            }
            None => {
                acc.members_without_rate.insert(entry.member.clone());
            }
        }
    }

    let mut rows: Vec<ClientProfitability> = clients
        .iter()
        .filter_map(|client| {
            let acc = per_client.get(&client.id)?;
            let profit = acc.revenue - acc.direct_costs - acc.labor_cost;
            let margin = if acc.revenue > 0 {
                (profit as f64 / acc.revenue as f64 * 10_000.0).round() / 100.0
            } else {
                0.0
            };
            Some(ClientProfitability {
                client_id: client.id,
                client_name: client.name.clone(),
                revenue: acc.revenue,
                direct_costs: acc.direct_costs,
                labor_cost: acc.labor_cost,
                profit,
                margin,
                members_without_rate: acc.members_without_rate.iter().cloned().collect(),
            })
        })
        .collect();

    match sort {
        ProfitSort::Ascending => {
            rows.sort_by(|a, b| a.profit.cmp(&b.profit).then_with(|| a.client_name.cmp(&b.client_name)))
        }
        ProfitSort::Descending => {
            rows.sort_by(|a, b| b.profit.cmp(&a.profit).then_with(|| a.client_name.cmp(&b.client_name)))
        }
    }
    rows
}
