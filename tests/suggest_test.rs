use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PROVIDER_ENV_VARS: [&str; 15] = [
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "GEMINI_API_KEY",
    "DEEPSEEK_API_KEY",
    "AI_API_KEY",
    "AI_BASE_URL",
    "AI_PROVIDER",
    "AI_MODEL",
    "RETITLE_PROVIDER",
    "RETITLE_MODEL",
    "RETITLE_CONFIG_PATH",
    "RETITLE_LOWERCASE",
    "RETITLE_SUBTITLES",
    "RETITLE_HOME",
    "RETITLE_LOGS_DIR",
];

fn retitle_cmd(workdir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("retitle");
    cmd.current_dir(workdir);
    for var in PROVIDER_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RETITLE_HOME", workdir.join(".retitle"));
    cmd
}

#[test]
fn suggest_without_provider_reports_unconfigured() {
    let tmp = tempdir().expect("tempdir");
    let note = tmp.path().join("untitled.md");
    fs::write(&note, "Quarterly revenue rose 12% compared to last year.").expect("write note");

    retitle_cmd(tmp.path())
        .arg("suggest")
        .arg(&note)
        .assert()
        .failure()
        .stderr(predicates::str::contains("no completion provider configured"));
}

#[test]
fn suggest_surfaces_network_failure_from_unreachable_endpoint() {
    let tmp = tempdir().expect("tempdir");
    let note = tmp.path().join("untitled.md");
    fs::write(&note, "Quarterly revenue rose 12% compared to last year.").expect("write note");

    retitle_cmd(tmp.path())
        .env("AI_API_KEY", "test-key")
        .env("AI_BASE_URL", "http://127.0.0.1:9")
        .arg("suggest")
        .arg(&note)
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "network failure calling completion service",
        ));
}

#[test]
fn suggest_fails_for_missing_file() {
    let tmp = tempdir().expect("tempdir");

    retitle_cmd(tmp.path())
        .env("AI_API_KEY", "test-key")
        .env("AI_BASE_URL", "http://127.0.0.1:9")
        .arg("suggest")
        .arg(tmp.path().join("does-not-exist.md"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read"));
}
