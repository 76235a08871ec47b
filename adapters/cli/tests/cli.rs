use std::{fs, process::Command};

fn zombie_survival() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zombie-survival"))
}

#[test]
fn json_summary_reports_the_first_wave() {
    let output = zombie_survival()
        .args(["--frames", "120", "--seed", "42", "--json", "--log-level", "warn"])
        .output()
        .expect("failed to run the zombie-survival binary");

    assert!(output.status.success(), "zombie-survival exited with {:?}", output.status);
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON summary");
    assert_eq!(summary["frames"], 120);
    assert_eq!(summary["waves_started"], 1);
    assert_eq!(summary["zombies_spawned"], 10);
    assert_eq!(summary["game_over"], false);
}

#[test]
fn runs_are_reproducible_for_a_seed() {
    let run = || {
        zombie_survival()
            .args(["--frames", "300", "--seed", "7", "--json", "--log-level", "off"])
            .output()
            .expect("failed to run the zombie-survival binary")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("zombie-survival-{}.toml", std::process::id()));
    fs::write(&path, "[waves]\nbase_count = 3\n").expect("write temp config");

    let output = zombie_survival()
        .arg("--config")
        .arg(&path)
        .args(["--frames", "120", "--json", "--log-level", "off"])
        .output()
        .expect("failed to run the zombie-survival binary");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON summary");
    assert_eq!(summary["zombies_spawned"], 3);
}

#[test]
fn invalid_config_fails_with_context() {
    let path = std::env::temp_dir().join(format!(
        "zombie-survival-invalid-{}.toml",
        std::process::id()
    ));
    fs::write(&path, "[zombie]\nspeed = -1.0\n").expect("write temp config");

    let output = zombie_survival()
        .arg("--config")
        .arg(&path)
        .args(["--log-level", "off"])
        .output()
        .expect("failed to run the zombie-survival binary");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation"), "unexpected stderr: {stderr}");
}
