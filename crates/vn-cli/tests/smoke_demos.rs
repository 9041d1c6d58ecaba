use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn demos_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

fn run_agent(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_vn-cli");
    Command::new(bin)
        .arg("agent")
        .args(args)
        .output()
        .expect("agent command should run")
}

fn parse_state_out(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("STATE_OUT:").map(|v| v.to_string()))
        .filter(|value| value != "NONE")
}

fn demo_dirs() -> Vec<PathBuf> {
    let mut dirs = fs::read_dir(demos_root())
        .expect("demos dir should be readable")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.join("script.json").is_file())
        .collect::<Vec<_>>();
    dirs.sort();
    dirs
}

#[test]
fn every_demo_starts_through_the_agent() {
    let dirs = demo_dirs();
    assert!(!dirs.is_empty(), "expected demos");

    for dir in dirs {
        let name = dir
            .file_name()
            .and_then(|name| name.to_str())
            .expect("demo name should be utf-8")
            .to_string();
        let state = std::env::temp_dir().join(format!("vn-cli-smoke-{}.json", name));
        let script = dir.join("script.json");
        let output = run_agent(&[
            "start",
            "--script",
            script.to_str().expect("path should be utf-8"),
            "--state-out",
            state.to_str().expect("path should be utf-8"),
        ]);
        assert!(output.status.success(), "start failed for {}", name);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("RESULT:OK"), "{}: {}", name, stdout);
        assert!(stdout.contains("EVENT:"), "{}: {}", name, stdout);
    }
}

#[test]
fn agent_choice_flow_reaches_end() {
    let script = demos_root().join("02-branching-choice").join("script.json");
    let state_1 = std::env::temp_dir().join("vn-cli-agent-choice-1.json");
    let state_2 = std::env::temp_dir().join("vn-cli-agent-choice-2.json");
    let state_3 = std::env::temp_dir().join("vn-cli-agent-choice-3.json");
    let state_4 = std::env::temp_dir().join("vn-cli-agent-choice-4.json");

    let start = run_agent(&[
        "start",
        "--script",
        script.to_str().expect("path should be utf-8"),
        "--state-out",
        state_1.to_str().expect("path should be utf-8"),
    ]);
    assert!(start.status.success(), "start failed");
    let start_stdout = String::from_utf8_lossy(&start.stdout);
    assert!(start_stdout.contains("EVENT:SAY"));
    assert!(start_stdout.contains(r#""kind":"background""#));
    assert!(parse_state_out(&start_stdout).is_some());

    let advance = run_agent(&[
        "advance",
        "--state-in",
        state_1.to_str().expect("path should be utf-8"),
        "--state-out",
        state_2.to_str().expect("path should be utf-8"),
    ]);
    let advance_stdout = String::from_utf8_lossy(&advance.stdout);
    assert!(advance_stdout.contains("EVENT:CHOICE"));
    assert!(advance_stdout.contains(r#"CHOICE:tea|"Tea""#));

    let choose = run_agent(&[
        "choose",
        "--state-in",
        state_2.to_str().expect("path should be utf-8"),
        "--label",
        "tea",
        "--state-out",
        state_3.to_str().expect("path should be utf-8"),
    ]);
    let choose_stdout = String::from_utf8_lossy(&choose.stdout);
    assert!(choose_stdout.contains("EVENT:SAY"));
    assert!(choose_stdout.contains("One tea, coming up."));

    let finish = run_agent(&[
        "advance",
        "--state-in",
        state_3.to_str().expect("path should be utf-8"),
        "--state-out",
        state_4.to_str().expect("path should be utf-8"),
    ]);
    let finish_stdout = String::from_utf8_lossy(&finish.stdout);
    assert!(finish_stdout.contains("EVENT:END"));
    assert!(finish_stdout.contains("STATE_OUT:NONE"));
}

#[test]
fn agent_reports_errors_on_stdout() {
    let output = run_agent(&[
        "choose",
        "--state-in",
        "/definitely/not/here.json",
        "--label",
        "tea",
        "--state-out",
        "/tmp/unused.json",
    ]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:CLI_STATE_NOT_FOUND"));
}
