//! CLI workflow tests that need no network

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn kaizen() -> Command {
    Command::cargo_bin("kaizen").unwrap()
}

const SESSION_FIXTURE: &str = r#"{
  "result": {
    "rows": [
      {"oportunidade_melhoria": "Automatizar cotações", "tarefa": "Implantar RPA", "criterio_aceitacao": "Tempo < 1 dia"},
      {"oportunidade_melhoria": "Definir KPIs", "tarefa": "Mapear indicadores", "criterio_aceitacao": "Painel mensal"}
    ]
  },
  "additional": [],
  "selected": []
}"#;

#[test]
fn analyze_rejects_missing_mandatory_fields() {
    kaizen()
        .args(["analyze", "--ramo-empresa", "Moda", "--atividade", "Compras"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Missing mandatory fields"))
        .stderr(predicate::str::contains("causa"));
}

#[test]
fn analyze_fails_fast_on_missing_index() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("process_index.db");

    // Credential present and record valid: the missing index is the
    // first failure, before any provider request
    kaizen()
        .env("KAIZEN_API_KEY", "sk-test")
        .args([
            "analyze",
            "--ramo-empresa",
            "Moda",
            "--direcionadores",
            "Aumentar lucro",
            "--nome-processo",
            "Compras",
            "--atividade",
            "Cotação",
            "--evento",
            "Reunião mensal",
            "--causa",
            "Processo manual",
            "--index",
            missing.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Case index not found"));
}

#[test]
fn status_reports_missing_index() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("process_index.db");

    kaizen()
        .args(["status", "--index", missing.to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Case index not found"));
}

#[test]
fn refine_lists_numbered_opportunities() {
    let temp = TempDir::new().unwrap();
    let session_path = temp.path().join("session.json");
    fs::write(&session_path, SESSION_FIXTURE).unwrap();

    kaizen()
        .args(["refine", "--session", session_path.to_str().unwrap(), "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Automatizar cotações"))
        .stdout(predicate::str::contains("2. Definir KPIs"));
}

#[test]
fn refine_selects_and_exports_pipe_csv() {
    let temp = TempDir::new().unwrap();
    let session_path = temp.path().join("session.json");
    let out_path = temp.path().join("final.csv");
    fs::write(&session_path, SESSION_FIXTURE).unwrap();

    kaizen()
        .args([
            "refine",
            "--session",
            session_path.to_str().unwrap(),
            "--select",
            "2",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&out_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "oportunidade_melhoria|tarefa|criterio_aceitacao"
    );
    assert_eq!(
        lines.next().unwrap(),
        "Definir KPIs|Mapear indicadores|Painel mensal"
    );

    // Curation state persisted for further rounds
    let saved = fs::read_to_string(&session_path).unwrap();
    assert!(saved.contains("\"Definir KPIs\""));
}

#[test]
fn refine_manual_addition_round_trips() {
    let temp = TempDir::new().unwrap();
    let session_path = temp.path().join("session.json");
    let out_path = temp.path().join("final.csv");
    fs::write(&session_path, SESSION_FIXTURE).unwrap();

    kaizen()
        .args([
            "refine",
            "--session",
            session_path.to_str().unwrap(),
            "--add",
            "Nova oportunidade",
            "--select",
            "3",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&out_path).unwrap();
    // Manual additions export with empty task and criterion
    assert!(csv.lines().any(|l| l == "Nova oportunidade||"));
}

#[test]
fn refine_rejects_out_of_range_selection() {
    let temp = TempDir::new().unwrap();
    let session_path = temp.path().join("session.json");
    fs::write(&session_path, SESSION_FIXTURE).unwrap();

    kaizen()
        .args([
            "refine",
            "--session",
            session_path.to_str().unwrap(),
            "--select",
            "9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No opportunity number 9"));
}
