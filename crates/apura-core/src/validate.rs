//! Transaction validation
//!
//! Validation is a pure function over the raw input: it parses enum and
//! date fields, enforces structural bounds and the repasse business
//! rule, and returns every violation at once. It never fixes anything;
//! normalization belongs to [`crate::prepare`], so "what failed" and
//! "what was auto-corrected" stay distinct.

use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::is_repasse_eligible;
use crate::models::{
    CostType, Nature, TransactionInput, TransactionKind, TransactionStatus, ValidatedTransaction,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Classification of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Structural input problem: missing or out-of-range field
    SchemaViolation,
    /// Repasse flag on a category outside the repasse-eligible set
    BusinessRuleViolation,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaViolation => "schema_violation",
            Self::BusinessRuleViolation => "business_rule_violation",
        }
    }
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: ViolationCode,
}

impl FieldError {
    fn schema(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: ViolationCode::SchemaViolation,
        }
    }

    fn business_rule(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: ViolationCode::BusinessRuleViolation,
        }
    }
}

/// All violations found in one input, collected rather than fail-fast
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors attached to one field
    pub fn for_field(&self, field: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.field == field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Bounds applied during validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    /// Maximum transaction value in minor units
    pub max_value: i64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        // R$ 10.000.000,00
        Self {
            max_value: 1_000_000_000,
        }
    }
}

/// Validates raw transaction input against structural constraints and
/// the repasse business rule
#[derive(Debug, Clone, Default)]
pub struct TransactionValidator {
    limits: ValidationLimits,
}

impl TransactionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Validate against today's date (for the competence-date bound)
    pub fn validate(
        &self,
        input: &TransactionInput,
    ) -> std::result::Result<ValidatedTransaction, ValidationErrors> {
        self.validate_at(input, Utc::now().date_naive())
    }

    /// Validate with an explicit reference date; pure and deterministic
    pub fn validate_at(
        &self,
        input: &TransactionInput,
        today: NaiveDate,
    ) -> std::result::Result<ValidatedTransaction, ValidationErrors> {
        let mut errors = Vec::new();

        if input.description.trim().is_empty() {
            errors.push(FieldError::schema("description", "must not be empty"));
        }

        if input.category.trim().is_empty() {
            errors.push(FieldError::schema("category", "must not be empty"));
        }

        if input.value <= 0 {
            errors.push(FieldError::schema(
                "value",
                "must be a positive amount in minor units",
            ));
        } else if input.value > self.limits.max_value {
            errors.push(FieldError::schema(
                "value",
                format!("exceeds the maximum of {} minor units", self.limits.max_value),
            ));
        }

        let kind: Option<TransactionKind> = match input.kind.parse() {
            Ok(k) => Some(k),
            Err(e) => {
                errors.push(FieldError::schema("type", e));
                None
            }
        };

        let nature: Option<Nature> = match input.nature.parse() {
            Ok(n) => Some(n),
            Err(e) => {
                errors.push(FieldError::schema("nature", e));
                None
            }
        };

        // Cost type is derived later, but a supplied value must still be
        // a recognized one.
        let cost_type: Option<CostType> = match input.cost_type.as_deref() {
            Some(raw) => match raw.parse() {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.push(FieldError::schema("cost_type", e));
                    None
                }
            },
            None => None,
        };

        let status: Option<TransactionStatus> = match input.status.parse() {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push(FieldError::schema("status", e));
                None
            }
        };

        let date = parse_date(&input.date, "date", &mut errors);
        let competence_date = match input.competence_date.as_deref() {
            Some(raw) => parse_date(raw, "competence_date", &mut errors),
            None => None,
        };
        let payment_date = match input.payment_date.as_deref() {
            Some(raw) => parse_date(raw, "payment_date", &mut errors),
            None => None,
        };

        // Competence may not sit more than one year in the future. The
        // bound applies to the effective value: when no competence date
        // was supplied, the due date stands in, because that is what the
        // preparer will default it to.
        if let Some(competence) = competence_date.or(date) {
            let bound = today
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDate::MAX);
            if competence > bound {
                errors.push(FieldError::schema(
                    "competence_date",
                    "must not be more than one year in the future",
                ));
            }
        }

        // Repasse is only valid on media-spend categories. Rejected, never
        // coerced: the fix is dropping the flag, not rewriting the category.
        if input.is_repasse && !is_repasse_eligible(&input.category) {
            errors.push(FieldError::business_rule(
                "is_repasse",
                format!(
                    "category \"{}\" is not eligible for repasse",
                    input.category
                ),
            ));
        }

        if !errors.is_empty() {
            debug!(
                violations = errors.len(),
                description = %input.description,
                "transaction rejected"
            );
            return Err(ValidationErrors(errors));
        }

        // Every parse failure was recorded above, so with no errors all
        // four are present.
        match (kind, nature, status, date) {
            (Some(kind), Some(nature), Some(status), Some(date)) => Ok(ValidatedTransaction {
                description: input.description.trim().to_string(),
                kind,
                nature,
                cost_type,
                is_repasse: input.is_repasse,
                category: input.category.trim().to_string(),
                value: input.value,
                status,
                date,
                competence_date,
                payment_date,
                project_id: input.project_id,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn parse_date(raw: &str, field: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(FieldError::schema(
                field,
                format!("invalid date \"{}\" (use YYYY-MM-DD)", raw),
            ));
            None
        }
    }
}
