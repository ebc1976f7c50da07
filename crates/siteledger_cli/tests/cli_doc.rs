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

fn write_store(path: &Path) {
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
        }]
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
fn doc_add_and_list() {
    let store_path = temp_path("cli-doc.json");
    write_store(&store_path);

    let added = run(
        &store_path,
        &[
            "doc",
            "add",
            "project-1",
            "permit.pdf",
            "--main-category",
            "owner",
            "--sub-category",
            "Permits",
            "--size-bytes",
            "2621440",
            "--uploaded-by",
            "site office",
        ],
    );
    let listed = run(&store_path, &["--json", "doc", "list", "project-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(added.status.success());
    let stdout = String::from_utf8_lossy(&added.stdout);
    assert!(stdout.contains("Added document: permit.pdf"));
    assert!(stdout.contains("2.50 MB"));

    let parsed: serde_json::Value = serde_json::from_slice(&listed.stdout).expect("json");
    assert_eq!(parsed[0]["name"], "permit.pdf");
    assert_eq!(parsed[0]["main_category"], "owner");
    assert_eq!(parsed[0]["sub_category"], "Permits");
    assert_eq!(parsed[0]["uploaded_by"], "site office");
}

#[test]
fn doc_add_rejects_unknown_category() {
    let store_path = temp_path("cli-doc-bad-category.json");
    write_store(&store_path);

    let output = run(
        &store_path,
        &[
            "doc",
            "add",
            "project-1",
            "permit.pdf",
            "--main-category",
            "inspector",
            "--sub-category",
            "Permits",
        ],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
