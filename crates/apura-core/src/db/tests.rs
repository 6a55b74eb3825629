//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;
use crate::profitability::ProfitSort;

fn input(kind: &str, value: i64, category: &str) -> TransactionInput {
    TransactionInput {
        description: format!("{} {}", category, value),
        kind: kind.to_string(),
        nature: "operacional".to_string(),
        cost_type: None,
        is_repasse: false,
        category: category.to_string(),
        value,
        status: "pendente".to_string(),
        date: "2026-03-10".to_string(),
        competence_date: None,
        payment_date: None,
        project_id: None,
    }
}

#[test]
fn test_in_memory_cleans_up_on_drop() {
    let db = Database::in_memory().unwrap();
    let path = std::path::PathBuf::from(db.path().to_string());
    assert!(path.exists());

    let clone = db.clone();
    drop(db);
    // Still alive while a clone holds the directory
    assert!(path.exists());

    drop(clone);
    assert!(!path.exists());
}

#[test]
fn test_create_applies_pipeline() {
    let db = Database::in_memory().unwrap();

    let mut raw = input("despesa", 50_000, "Compra de Mídia/Ads");
    raw.is_repasse = true;
    raw.nature = "operacional".to_string();
    let tx = db.create_transaction(&raw).unwrap();

    // Repasse forced non-operational despite the input
    assert_eq!(tx.nature, Nature::NonOperational);
    // No project -> fixed
    assert_eq!(tx.cost_type, CostType::Fixed);
    // Competence defaulted to the due date
    assert_eq!(tx.competence_date, tx.date);
}

#[test]
fn test_create_rejects_business_rule_violation() {
    let db = Database::in_memory().unwrap();

    let mut raw = input("despesa", 10_000, "Salários");
    raw.is_repasse = true;
    let err = db.create_transaction(&raw).unwrap_err();

    match err {
        Error::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.0[0].field, "is_repasse");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    // Nothing was persisted
    assert!(db.list_transactions(10).unwrap().is_empty());
}

#[test]
fn test_update_recheck_invariants() {
    let db = Database::in_memory().unwrap();
    let tx = db.create_transaction(&input("despesa", 10_000, "Salários")).unwrap();

    // Flipping the repasse flag on a non-eligible category must fail
    let mut bad = tx.to_input();
    bad.is_repasse = true;
    assert!(matches!(
        db.update_transaction(tx.id, &bad),
        Err(Error::Validation(_))
    ));

    // The stored row is untouched
    let stored = db.get_transaction(tx.id).unwrap();
    assert!(!stored.is_repasse);
}

#[test]
fn test_update_rederives_cost_type() {
    let db = Database::in_memory().unwrap();
    let client = db.add_client("Acme").unwrap();
    let project = db.add_project("Site novo", client.id).unwrap();

    let tx = db.create_transaction(&input("despesa", 20_000, "Freela")).unwrap();
    assert_eq!(tx.cost_type, CostType::Fixed);

    let mut linked = tx.to_input();
    linked.project_id = Some(project.id);
    let updated = db.update_transaction(tx.id, &linked).unwrap();
    assert_eq!(updated.cost_type, CostType::Direct);
}

#[test]
fn test_mark_paid_defaults_payment_date() {
    let db = Database::in_memory().unwrap();
    let tx = db.create_transaction(&input("receita", 100_000, "Fee Mensal")).unwrap();
    assert_eq!(tx.payment_date, None);

    let paid = db.mark_paid(tx.id, None).unwrap();
    assert_eq!(paid.status, TransactionStatus::Paid);
    assert!(paid.payment_date.is_some());
}

#[test]
fn test_mark_paid_keeps_explicit_date() {
    let db = Database::in_memory().unwrap();
    let tx = db.create_transaction(&input("receita", 100_000, "Fee Mensal")).unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
    let paid = db.mark_paid(tx.id, Some(date)).unwrap();
    assert_eq!(paid.payment_date, Some(date));
}

#[test]
fn test_delete_transaction() {
    let db = Database::in_memory().unwrap();
    let tx = db.create_transaction(&input("receita", 100_000, "Fee Mensal")).unwrap();

    db.delete_transaction(tx.id).unwrap();
    assert!(matches!(
        db.get_transaction(tx.id),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.delete_transaction(tx.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_snapshot_period_filter() {
    let db = Database::in_memory().unwrap();

    let mut march = input("receita", 10_000, "Fee Mensal");
    march.competence_date = Some("2026-03-01".to_string());
    db.create_transaction(&march).unwrap();

    let mut april = input("receita", 20_000, "Fee Mensal");
    april.competence_date = Some("2026-04-01".to_string());
    db.create_transaction(&april).unwrap();

    let all = db.snapshot(None, None).unwrap();
    assert_eq!(all.len(), 2);

    let march_only = db
        .snapshot(
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 31),
        )
        .unwrap();
    assert_eq!(march_only.len(), 1);
    assert_eq!(march_only[0].value, 10_000);
}

#[test]
fn test_client_project_crud() {
    let db = Database::in_memory().unwrap();

    let client = db.add_client("Acme").unwrap();
    assert!(client.id > 0);

    // Duplicate client names are rejected by the schema
    assert!(db.add_client("Acme").is_err());

    let project = db.add_project("Site novo", client.id).unwrap();
    assert_eq!(project.client_id, client.id);

    // Project for a missing client fails with NotFound
    assert!(matches!(
        db.add_project("Orfão", 999),
        Err(Error::NotFound(_))
    ));

    assert_eq!(db.list_clients().unwrap().len(), 1);
    assert_eq!(db.list_projects().unwrap().len(), 1);
}

#[test]
fn test_time_entries_and_rates() {
    let db = Database::in_memory().unwrap();
    let client = db.add_client("Acme").unwrap();
    let project = db.add_project("Site novo", client.id).unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let entry = db.add_time_entry(project.id, "ana", 90, date).unwrap();
    assert_eq!(entry.minutes, 90);

    assert!(db.add_time_entry(project.id, "ana", 0, date).is_err());
    assert!(db.add_time_entry(999, "ana", 60, date).is_err());

    db.set_hourly_rate("ana", 10_000).unwrap();
    db.set_hourly_rate("ana", 12_000).unwrap(); // upsert
    let rates = db.hourly_rates().unwrap();
    assert_eq!(rates.get("ana"), Some(&12_000));
}

#[test]
fn test_tax_rate_setting() {
    let db = Database::in_memory().unwrap();

    assert_eq!(db.tax_rate().unwrap(), 0.0);
    db.set_tax_rate(15.5).unwrap();
    assert_eq!(db.tax_rate().unwrap(), 15.5);
    assert!(db.set_tax_rate(120.0).is_err());
    assert!(db.set_tax_rate(-1.0).is_err());
}

#[test]
fn test_reports_read_through() {
    let db = Database::in_memory().unwrap();
    db.set_tax_rate(15.0).unwrap();

    db.create_transaction(&input("receita", 100_000, "Fee Mensal")).unwrap();
    db.create_transaction(&input("despesa", 10_000, "Taxas de Pagamento")).unwrap();
    let mut repasse = input("despesa", 50_000, "Compra de Mídia/Ads");
    repasse.is_repasse = true;
    db.create_transaction(&repasse).unwrap();

    let totals = db.ledger_totals(None, None).unwrap();
    assert_eq!(totals.operational.revenue, 100_000);
    assert_eq!(totals.operational.expense, 10_000);
    assert_eq!(totals.repasse.outflow, 50_000);
    assert_eq!(totals.cash_flow.net, 90_000 - 50_000);

    let dre = db.income_statement(None, None).unwrap();
    assert_eq!(dre.taxes.value, 15_000);
    assert_eq!(dre.contribution_margin.value, 75_000);
    assert_eq!(dre.repasse.outflow, 50_000);
}

#[test]
fn test_profitability_via_db() {
    let db = Database::in_memory().unwrap();
    let client = db.add_client("Acme").unwrap();
    let project = db.add_project("Site novo", client.id).unwrap();

    let mut revenue = input("receita", 500_000, "Fee Mensal");
    revenue.project_id = Some(project.id);
    db.create_transaction(&revenue).unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    db.add_time_entry(project.id, "ana", 600, date).unwrap();
    db.set_hourly_rate("ana", 10_000).unwrap();

    let rows = db.client_profitability(ProfitSort::Descending).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].revenue, 500_000);
    assert_eq!(rows[0].labor_cost, 100_000);
    assert_eq!(rows[0].profit, 400_000);
}
