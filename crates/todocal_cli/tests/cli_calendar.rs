use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todocal-{nanos}-{file_name}"))
}

fn seed_store(store_path: &PathBuf) {
    let content = serde_json::json!({
        "exportDate": "2025-06-01",
        "version": "1.0",
        "todos": [
            {
                "id": "a1",
                "taskName": "Fix login bug",
                "importance": "HIGH",
                "tags": [],
                "priority": 9,
                "description": "",
                "startDate": "2025-06-01",
                "endDate": "2025-06-03",
                "status": "WAITING",
                "isCompleted": false
            }
        ]
    });

    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

#[test]
fn calendar_json_is_a_six_by_seven_grid() {
    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-calendar-json.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["--json", "calendar", "2025", "6"])
        .env("TODOCAL_STORE_PATH", &store_path)
        .output()
        .expect("failed to run calendar command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    let rows = parsed.as_array().expect("rows");
    assert_eq!(rows.len(), 6);
    for row in rows {
        assert_eq!(row.as_array().map(Vec::len), Some(7));
    }

    // June 2025 starts on a Sunday, so the grid opens on the first.
    assert_eq!(rows[0][0]["date"], "2025-06-01");
    assert_eq!(rows[0][0]["tasks"], 1);
    assert_eq!(rows[0][2]["date"], "2025-06-03");
    assert_eq!(rows[0][2]["tasks"], 1);
    assert_eq!(rows[0][3]["tasks"], 0);
    assert_eq!(rows[5][6]["date"], "2025-07-12");
}

#[test]
fn calendar_json_pads_with_adjacent_months() {
    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-calendar-pad.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["--json", "calendar", "2025", "9"])
        .env("TODOCAL_STORE_PATH", &store_path)
        .output()
        .expect("failed to run calendar command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");

    // September 2025 starts on a Monday, so the grid leads with August 31.
    assert_eq!(parsed[0][0]["date"], "2025-08-31");
    assert_eq!(parsed[0][1]["date"], "2025-09-01");
}

#[test]
fn calendar_plain_shows_weekday_header_and_counts() {
    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-calendar-plain.json");
    let config_path = temp_path("cli-calendar-config.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["calendar", "2025", "6"])
        .env("TODOCAL_STORE_PATH", &store_path)
        .env("TODOCAL_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run calendar command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2025-06"));
    assert!(stdout.contains("Sun  Mon  Tue  Wed  Thu  Fri  Sat"));
    assert!(stdout.contains("1(1)"));
    assert_eq!(stdout.lines().count(), 8);
}

#[test]
fn calendar_rejects_bad_month() {
    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-calendar-badmonth.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["calendar", "2025", "13"])
        .env("TODOCAL_STORE_PATH", &store_path)
        .output()
        .expect("failed to run calendar command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
