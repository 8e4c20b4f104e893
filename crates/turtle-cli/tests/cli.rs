use std::path::PathBuf;
use std::process::{Command, Output};

fn turtle_bt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_turtle-bt"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to spawn turtle-bt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn sample(name: &str) -> String {
    format!("{}/../../trees/{name}", env!("CARGO_MANIFEST_DIR"))
}

/// Writes `content` to a per-test file under the temp dir.
fn scratch(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("turtle-bt-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn catalog_lists_the_builtin_actions() {
    let output = turtle_bt(&["catalog"]);
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    let catalog: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    assert!(catalog["primitives"]["GoToPose"].is_mapping());
    assert!(catalog["composites"]["PatrolWaypoints"].is_mapping());
    assert!(text.contains("/turtle1/cmd_vel"));
}

#[test]
fn show_prints_structure_without_status() {
    let output = turtle_bt(&["show", "builtin:draw_square"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("{-} DrawSquare\n    --> SetPenRed\n    --> Corner1\n"));
}

#[test]
fn check_reports_sample_trees_as_valid() {
    for tree in ["draw_triangle.yaml", "guarded_patrol.yaml"] {
        let output = turtle_bt(&["check", &sample(tree)]);
        assert_eq!(output.status.code(), Some(0), "{tree}");

        let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(report["valid"], true);
        assert!(report["critical"].as_array().unwrap().is_empty());
    }
}

#[test]
fn check_fails_on_critical_findings() {
    let path = scratch(
        "empty.yaml",
        "name: broken\nroot: { type: Sequence, children: [{ type: Selector, name: Empty }] }\n",
    );
    let output = turtle_bt(&["check", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["critical"][0], "Selector `Empty` has no children");
}

#[test]
fn run_exit_codes_follow_the_outcome() {
    let pen = scratch("pen.yaml", "name: pen\nroot: { type: PenUp, name: Lift }\n");
    let output = turtle_bt(&["run", pen.to_str().unwrap(), "--quiet"]);
    std::fs::remove_file(&pen).ok();
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Final tree state:\n--> Lift [✓]\n"));
    assert!(text.contains("completed successfully after 1 ticks"));

    let outside = scratch(
        "outside.yaml",
        "name: outside\nroot: { type: CheckBounds, name: East, min_x: 8.0 }\n",
    );
    let output = turtle_bt(&["run", outside.to_str().unwrap(), "--quiet"]);
    std::fs::remove_file(&outside).ok();
    assert_eq!(output.status.code(), Some(1));

    let output = turtle_bt(&[
        "run",
        "builtin:draw_square",
        "--tick-rate",
        "200",
        "--max-ticks",
        "3",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("--- Tick 3 ---"));
    assert!(text.contains("timed out before completing after 3 ticks"));
}

#[test]
fn load_and_config_errors_exit_with_3() {
    let output = turtle_bt(&["run", "builtin:no_such_tree"]);
    assert_eq!(output.status.code(), Some(3));

    let output = turtle_bt(&["show", "/nonexistent/tree.yaml"]);
    assert_eq!(output.status.code(), Some(3));

    let config = scratch("config.yaml", "executor: { tick_rate_hz: 0.0 }\n");
    let output = turtle_bt(&[
        "--config",
        config.to_str().unwrap(),
        "run",
        "builtin:draw_square",
    ]);
    std::fs::remove_file(&config).ok();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn sample_runner_config_parses() {
    let output = turtle_bt(&[
        "--config",
        &sample("runner.yaml"),
        "show",
        "builtin:patrol_waypoints",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("{-} PatrolRectangle"));
}

#[test]
fn json_logs_go_to_stderr() {
    let outside = scratch(
        "outside-json.yaml",
        "name: outside\nroot: { type: CheckBounds, name: East, min_x: 8.0 }\n",
    );
    let output = turtle_bt(&["--log-json", "run", outside.to_str().unwrap(), "--quiet"]);
    std::fs::remove_file(&outside).ok();
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "Turtle out of bounds"));
    assert!(!stdout(&output).contains("\"level\""));
}
