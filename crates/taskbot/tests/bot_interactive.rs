use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskbot-{nanos}-{file_name}"))
}

fn write_config(path: &PathBuf) {
    std::fs::write(path, "{\"token\":\"123456:integration\"}").unwrap();
}

fn run_bot(config_path: &PathBuf, store_path: &PathBuf, input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_taskbot");

    let mut child = Command::new(exe)
        .env("TASKBOT_CONFIG_PATH", config_path)
        .env("TASKBOT_STORE_PATH", store_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn bot");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child.wait_with_output().expect("failed to read bot output")
}

#[test]
fn add_dialogue_persists_the_task() {
    let config_path = temp_path("config.json");
    let store_path = temp_path("tasks.json");
    write_config(&config_path);

    let output = run_bot(
        &config_path,
        &store_path,
        "todo\nwrite report\nsetime\n15 min\n",
    );
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(stored["tasks"][0]["task"], "write report");
    assert_eq!(stored["tasks"][0]["timer"], "15 min");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Saved task \"write report\""));
    assert!(stdout.contains("[10 min] [15 min]"));
}

#[test]
fn start_with_no_tasks_reports_nothing_to_start() {
    let config_path = temp_path("config.json");
    let store_path = temp_path("tasks.json");
    write_config(&config_path);

    let output = run_bot(&config_path, &store_path, "start\n");
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no pending tasks"));
}

#[test]
fn start_offers_persisted_tasks_from_a_previous_run() {
    let config_path = temp_path("config.json");
    let store_path = temp_path("tasks.json");
    write_config(&config_path);

    let output = run_bot(&config_path, &store_path, "todo\nstretch\nsetime\n10 min\n");
    assert!(output.status.success());

    let output = run_bot(&config_path, &store_path, "start\n");
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Which task do you want to start first?"));
    assert!(stdout.contains("[stretch]"));
}

#[test]
fn missing_config_aborts_startup() {
    let config_path = temp_path("missing-config.json");
    let store_path = temp_path("tasks.json");

    let output = run_bot(&config_path, &store_path, "");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"));
}

#[test]
fn blank_token_aborts_startup() {
    let config_path = temp_path("blank-config.json");
    let store_path = temp_path("tasks.json");
    std::fs::write(&config_path, "{\"token\":\"\"}").unwrap();

    let output = run_bot(&config_path, &store_path, "");
    std::fs::remove_file(&config_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("token is required"));
}

#[test]
fn unknown_chatter_is_ignored() {
    let config_path = temp_path("config.json");
    let store_path = temp_path("tasks.json");
    write_config(&config_path);

    let output = run_bot(&config_path, &store_path, "hello there\n");
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Saved task"));
    assert!(!stdout.contains("Which task"));
}
