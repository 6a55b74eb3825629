//! Transaction preparation
//!
//! Normalization of a validated transaction into its ledger-ready form.
//! Everything here is a silent correction, not an error: callers must
//! expect these fields to change regardless of what they supplied.
//!
//! The repasse-nature correction runs first; later steps (and
//! everything downstream) may depend on nature being settled.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::models::{
    CostType, Nature, PreparedTransaction, TransactionStatus, ValidatedTransaction,
};

/// Normalize a validated transaction (defaults against today's date)
pub fn prepare(validated: ValidatedTransaction) -> PreparedTransaction {
    prepare_at(validated, Utc::now().date_naive())
}

/// Normalize with an explicit reference date; total and deterministic
pub fn prepare_at(validated: ValidatedTransaction, today: NaiveDate) -> PreparedTransaction {
    // Repasse flows are never operational, whatever the caller said.
    let nature = if validated.is_repasse {
        if validated.nature == Nature::Operational {
            debug!(
                description = %validated.description,
                "forcing nature to non-operational on repasse transaction"
            );
        }
        Nature::NonOperational
    } else {
        validated.nature
    };

    // Cost type follows project linkage, never caller input.
    let cost_type = if validated.project_id.is_some() {
        CostType::Direct
    } else {
        CostType::Fixed
    };

    // Accounting period defaults to the due date.
    let competence_date = validated.competence_date.unwrap_or(validated.date);

    // A paid transaction always carries a settlement date.
    let payment_date = match (validated.status, validated.payment_date) {
        (TransactionStatus::Paid, None) => Some(today),
        (_, payment_date) => payment_date,
    };

    PreparedTransaction {
        description: validated.description,
        kind: validated.kind,
        nature,
        cost_type,
        is_repasse: validated.is_repasse,
        category: validated.category,
        value: validated.value,
        status: validated.status,
        date: validated.date,
        competence_date,
        payment_date,
        project_id: validated.project_id,
    }
}
