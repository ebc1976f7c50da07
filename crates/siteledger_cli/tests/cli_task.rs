use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("siteledger-{nanos}-{file_name}"))
}

fn write_store(path: &Path, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "projects": [{
            "id": "project-1",
            "name": "Maple Street Duplex",
            "client": "R. Okafor",
            "budget": 25_000_000,
            "deadline": "2026-12-01",
            "status": "in-progress",
            "created_at": "2026-01-05T00:00:00Z",
            "updated_at": "2026-01-05T00:00:00Z"
        }],
        "tasks": tasks
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_siteledger"))
        .args(args)
        .env("SITELEDGER_STORE_PATH", store_path)
        .env("SITELEDGER_CONFIG_PATH", store_path.with_extension("config.json"))
        .output()
        .expect("failed to run siteledger")
}

#[test]
fn task_add_starts_pending_and_takes_category_name() {
    let store_path = temp_path("cli-task-add.json");
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &store_path,
        &[
            "--json",
            "task",
            "add",
            "project-1",
            "--category",
            "Plumbing",
            "--contract-value",
            "18500.50",
            "--contractor",
            "Ines Duarte",
            "--duration",
            "3",
            "--duration-unit",
            "weeks",
            "--start-date",
            "2026-04-01",
        ],
    );

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed["name"], "Plumbing Work");
    assert_eq!(parsed["status"], "pending");
    assert_eq!(parsed["progress"], 0);
    assert_eq!(parsed["contract_value"], 1_850_050);
    assert_eq!(parsed["duration"]["amount"], 3);
    assert_eq!(parsed["duration"]["unit"], "weeks");
    assert_eq!(stored["tasks"][0]["contractor_name"], "Ines Duarte");
}

#[test]
fn task_add_rejects_zero_contract_value() {
    let store_path = temp_path("cli-task-zero.json");
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &store_path,
        &[
            "task",
            "add",
            "project-1",
            "--name",
            "Roofing",
            "--contract-value",
            "0",
        ],
    );

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("contract value"));
    assert_eq!(stored["tasks"].as_array().map(Vec::len), Some(0));
}

#[test]
fn task_add_rejects_unknown_project() {
    let store_path = temp_path("cli-task-no-project.json");
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &store_path,
        &[
            "task",
            "add",
            "project-2",
            "--name",
            "Roofing",
            "--contract-value",
            "1000",
        ],
    );

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}

#[test]
fn task_show_lists_payments_and_balance() {
    let store_path = temp_path("cli-task-show.json");
    write_store(
        &store_path,
        serde_json::json!([{
            "id": "task-1",
            "project_id": "project-1",
            "name": "Framing Work",
            "contractor_name": "Dale Reyes",
            "company_name": "Reyes Framing",
            "contract_value": 8_000_000,
            "status": "in-progress",
            "progress": 25,
            "created_at": "2026-01-05T00:00:00Z"
        }]),
    );
    let mut stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    stored["transactions"] = serde_json::json!([{
        "id": "TRX-1",
        "project_id": "project-1",
        "linked_task_id": "task-1",
        "date": "2026-01-10",
        "description": "Payment for Framing Work",
        "category": "Payment",
        "amount": -3_000_000,
        "payment_method": "zelle",
        "status": "completed",
        "reference": "TRX-000001-001",
        "created_at": "2026-01-10T00:00:00Z"
    }]);
    std::fs::write(&store_path, stored.to_string()).unwrap();

    let plain = run(&store_path, &["task", "show", "task-1"]);
    let json = run(&store_path, &["--json", "task", "show", "task-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(plain.status.success());
    let stdout = String::from_utf8_lossy(&plain.stdout);
    assert!(stdout.contains("Framing Work (task-1)"));
    assert!(stdout.contains("Contractor: Dale Reyes, Reyes Framing"));
    assert!(stdout.contains("Paid:      $30,000.00 (37.5%)"));
    assert!(stdout.contains("Remaining: $50,000.00"));
    assert!(stdout.contains("TRX-000001-001"));

    let parsed: serde_json::Value = serde_json::from_slice(&json.stdout).expect("json");
    assert_eq!(parsed["total_paid"], 3_000_000);
    assert_eq!(parsed["remaining_balance"], 5_000_000);
    assert_eq!(parsed["transactions"].as_array().map(Vec::len), Some(1));
}

#[test]
fn task_list_plain_text() {
    let store_path = temp_path("cli-task-list.json");
    write_store(
        &store_path,
        serde_json::json!([{
            "id": "task-1",
            "project_id": "project-1",
            "name": "Framing Work",
            "contract_value": 10_000_000,
            "status": "pending",
            "progress": 0,
            "created_at": "2026-01-05T00:00:00Z"
        }]),
    );

    let output = run(&store_path, &["task", "list", "project-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Framing Work"));
    assert!(stdout.contains("$100,000.00"));
    assert!(stdout.contains("0%"));
}
