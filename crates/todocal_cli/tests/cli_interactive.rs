use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todocal-{nanos}-{file_name}"))
}

fn run_interactive(input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-interactive.json");

    let mut child = Command::new(exe)
        .env("TODOCAL_STORE_PATH", &store_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");

    std::fs::remove_file(&store_path).ok();
    output
}

#[test]
fn interactive_help_shows_usage() {
    let output = run_interactive("help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let output = run_interactive("?\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error() {
    let output = run_interactive("nope\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn interactive_add_then_list_sees_the_task() {
    let output = run_interactive(
        "add \"demo task\" --start 2025-06-01 --end 2025-06-03\nlist all\nexit\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: demo task"));
    assert!(stdout.contains("2025-06-01"));
}

#[test]
fn interactive_exit_asks_about_open_tasks_today() {
    use time::macros::format_description;
    use time::{OffsetDateTime, UtcOffset};

    let exe = env!("CARGO_BIN_EXE_todocal");
    let store_path = temp_path("cli-interactive-exit.json");

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let format = format_description!("[year]-[month]-[day]");
    let today = OffsetDateTime::now_utc()
        .to_offset(offset)
        .date()
        .format(&format)
        .expect("format today");

    let content = serde_json::json!({
        "exportDate": today,
        "version": "1.0",
        "todos": [
            {
                "id": "a1",
                "taskName": "due today",
                "importance": "HIGH",
                "tags": [],
                "priority": 5,
                "description": "",
                "startDate": today,
                "endDate": today,
                "status": "WAITING",
                "isCompleted": false
            }
        ]
    });
    std::fs::write(&store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();

    let mut child = Command::new(exe)
        .env("TODOCAL_STORE_PATH", &store_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(b"exit\ny\n")
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- due today"));
    assert!(stdout.contains("Close anyway?"));
}

#[test]
fn interactive_unterminated_quote_prints_error() {
    let output = run_interactive("add \"demo task\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated quote"));
}
