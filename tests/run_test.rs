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
fn run_without_files_reports_an_issue() {
    let tmp = tempdir().expect("tempdir");

    retitle_cmd(tmp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicates::str::contains("no files given"));
}

#[test]
fn run_leaves_notes_untouched_when_the_service_is_unreachable() {
    let tmp = tempdir().expect("tempdir");
    let note = tmp.path().join("untitled.md");
    fs::write(&note, "Meeting notes from the platform sync.").expect("write note");

    retitle_cmd(tmp.path())
        .env("AI_API_KEY", "test-key")
        .env("AI_BASE_URL", "http://127.0.0.1:9")
        .arg("run")
        .arg(&note)
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "network failure calling completion service",
        ));

    assert!(note.exists(), "failed derivation must not rename the note");
    assert_eq!(
        fs::read_to_string(&note).expect("read note"),
        "Meeting notes from the platform sync."
    );
}

#[test]
fn run_continues_past_unreadable_files() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.md");
    let present = tmp.path().join("present.md");
    fs::write(&present, "Some content.").expect("write note");

    // Both files fail (one unreadable, one unreachable service), and both
    // failures are reported rather than the first aborting the batch.
    retitle_cmd(tmp.path())
        .env("AI_API_KEY", "test-key")
        .env("AI_BASE_URL", "http://127.0.0.1:9")
        .arg("run")
        .arg(&missing)
        .arg(&present)
        .assert()
        .failure()
        .stderr(predicates::str::contains("missing.md"))
        .stderr(predicates::str::contains("present.md"));

    assert!(present.exists());
}
