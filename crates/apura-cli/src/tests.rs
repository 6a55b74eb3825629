//! CLI command tests
//!
//! Commands print to stdout, so these check outcomes through the
//! database rather than captured output.

use apura_core::db::Database;
use apura_core::models::TransactionStatus;

use crate::commands::{self, TxAddArgs};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn add_args(description: &str, kind: &str, value: &str, category: &str) -> TxAddArgs {
    TxAddArgs {
        description: description.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        category: category.to_string(),
        nature: "operacional".to_string(),
        repasse: false,
        status: "pendente".to_string(),
        date: Some("2026-03-10".to_string()),
        competence: None,
        payment_date: None,
        project: None,
    }
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_tx_add() {
    let db = setup_test_db();
    let result = commands::cmd_tx_add(&db, add_args("Fee Acme", "receita", "5000.00", "Fee Mensal"));
    assert!(result.is_ok());

    let txs = db.list_transactions(10).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].value, 500_000);
}

#[test]
fn test_cmd_tx_add_rejects_bad_value() {
    let db = setup_test_db();
    let result = commands::cmd_tx_add(&db, add_args("Fee", "receita", "abc", "Fee Mensal"));
    assert!(result.is_err());
    assert!(db.list_transactions(10).unwrap().is_empty());
}

#[test]
fn test_cmd_tx_add_rejects_ineligible_repasse() {
    let db = setup_test_db();
    let mut args = add_args("Folha", "despesa", "100.00", "Salários");
    args.repasse = true;
    let result = commands::cmd_tx_add(&db, args);
    assert!(result.is_err());
}

#[test]
fn test_cmd_tx_pay_and_cancel() {
    let db = setup_test_db();
    commands::cmd_tx_add(&db, add_args("Fee", "receita", "100.00", "Fee Mensal")).unwrap();
    let id = db.list_transactions(1).unwrap()[0].id;

    commands::cmd_tx_pay(&db, id, Some("2026-03-12")).unwrap();
    let tx = db.get_transaction(id).unwrap();
    assert_eq!(tx.status, TransactionStatus::Paid);
    assert_eq!(tx.payment_date.map(|d| d.to_string()), Some("2026-03-12".to_string()));

    commands::cmd_tx_cancel(&db, id).unwrap();
    let tx = db.get_transaction(id).unwrap();
    assert_eq!(tx.status, TransactionStatus::Cancelled);
}

#[test]
fn test_cmd_tx_delete_missing() {
    let db = setup_test_db();
    assert!(commands::cmd_tx_delete(&db, 999).is_err());
}

// ========== Entity Command Tests ==========

#[test]
fn test_cmd_clients_and_projects() {
    let db = setup_test_db();
    commands::cmd_clients_add(&db, "Acme").unwrap();
    let client = &db.list_clients().unwrap()[0];

    commands::cmd_projects_add(&db, "Site novo", client.id).unwrap();
    assert_eq!(db.list_projects().unwrap().len(), 1);

    // Project pointing at an unknown client fails
    assert!(commands::cmd_projects_add(&db, "Orfão", 999).is_err());
}

#[test]
fn test_cmd_time_and_rate() {
    let db = setup_test_db();
    commands::cmd_clients_add(&db, "Acme").unwrap();
    let client = &db.list_clients().unwrap()[0];
    commands::cmd_projects_add(&db, "Site novo", client.id).unwrap();
    let project = &db.list_projects().unwrap()[0];

    commands::cmd_time_log(&db, project.id, "ana", 90, Some("2026-03-10")).unwrap();
    assert_eq!(db.list_time_entries().unwrap().len(), 1);

    commands::cmd_rate_set(&db, "ana", "120.00").unwrap();
    assert_eq!(db.hourly_rates().unwrap().get("ana"), Some(&12_000));
}

// ========== Settings / Report Command Tests ==========

#[test]
fn test_cmd_tax_rate() {
    let db = setup_test_db();
    commands::cmd_tax_rate(&db, Some(15.0)).unwrap();
    assert_eq!(db.tax_rate().unwrap(), 15.0);
    assert!(commands::cmd_tax_rate(&db, Some(150.0)).is_err());
}

#[test]
fn test_report_commands_run() {
    let db = setup_test_db();
    commands::cmd_tx_add(&db, add_args("Fee", "receita", "1000.00", "Fee Mensal")).unwrap();

    assert!(commands::cmd_report_dre(&db, None, None, false).is_ok());
    assert!(commands::cmd_report_cashflow(&db, None, None, true).is_ok());
    assert!(commands::cmd_report_balance(&db, None, None, false).is_ok());
    assert!(commands::cmd_report_costs(&db, None, None, true).is_ok());
    assert!(commands::cmd_report_profitability(&db, "desc", false).is_ok());
    assert!(commands::cmd_report_profitability(&db, "sideways", false).is_err());
}
