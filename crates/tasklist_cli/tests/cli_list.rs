use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, tasks: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&tasks).unwrap()).unwrap();
}

#[test]
fn list_command_renders_checkbox_rows() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-list.json");

    write_store(
        &store_path,
        serde_json::json!([
            { "id": "task-1", "text": "Buy milk", "status": false },
            { "id": "task-2", "text": "Water plants", "status": true }
        ]),
    );

    let output = Command::new(exe)
        .args(["list"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ ] task-1 | Buy milk"));
    assert!(stdout.contains("[x] task-2 | Water plants"));
}

#[test]
fn list_command_preserves_insertion_order() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-list-order.json");

    write_store(
        &store_path,
        serde_json::json!([
            { "id": "task-2", "text": "second added first", "status": false },
            { "id": "task-1", "text": "first added last", "status": false }
        ]),
    );

    let output = Command::new(exe)
        .args(["list"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find("task-2").unwrap();
    let second = stdout.find("task-1").unwrap();
    assert!(first < second);
}

#[test]
fn list_command_json_outputs_structural_fields_only() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-list-json.json");

    write_store(
        &store_path,
        serde_json::json!([
            { "id": "task-1", "text": "Buy milk", "status": false }
        ]),
    );

    let output = Command::new(exe)
        .args(["--json", "list"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");

    let tasks = parsed.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "task-1");
    assert_eq!(tasks[0]["text"], "Buy milk");
    assert_eq!(tasks[0]["status"], serde_json::Value::Bool(false));
    assert_eq!(tasks[0].as_object().unwrap().len(), 3);
}

#[test]
fn list_command_with_empty_store_prints_nothing() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-list-empty.json");

    let output = Command::new(exe)
        .args(["list"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
