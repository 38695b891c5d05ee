use assert_cmd::prelude::*; // Add methods on commands
use assert_fs::prelude::*; // Create temp files/dirs
use assert_fs::TempDir;
use predicates::prelude::*; // Used for writing assertions
use serde_json::json;
use std::process::Command; // Run programs
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZERO_BATCH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// A command for the step binary with a clean input environment
fn step_cmd() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("swarm-upload-dir")?;
    for (name, _) in std::env::vars_os() {
        let upper = name.to_string_lossy().to_uppercase();
        if upper.starts_with("INPUT_") || upper == "GITHUB_OUTPUT" {
            cmd.env_remove(name);
        }
    }
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

/// Sets up a temporary directory with a small site to upload.
fn setup_site() -> Result<TempDir, Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    temp_dir.child("index.html").write_str("<h1>Hello Swarm</h1>")?;
    temp_dir.child("css/site.css").write_str("body {}")?;
    Ok(temp_dir)
}

#[test]
fn test_invalid_batch_id_fails() -> Result<(), Box<dyn std::error::Error>> {
    let site = setup_site()?;
    let outputs = TempDir::new()?;
    let output_file = outputs.child("output");

    step_cmd()?
        .env("INPUT_BEE-URL", "http://127.0.0.1:1")
        .env("INPUT_POSTAGE-BATCH-ID", "deadbeef")
        .env("INPUT_DIR", site.path())
        .env("GITHUB_OUTPUT", output_file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Error running main: postage-batch-id must be a 64-character hexadecimal string",
        ));

    // Nothing was published
    output_file.assert(predicate::path::missing());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_non_utf8_environment_still_reports_failure() -> Result<(), Box<dyn std::error::Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let site = setup_site()?;

    step_cmd()?
        .env("SOME_UNRELATED", OsStr::from_bytes(b"\xff\xfe"))
        .env("INPUT_BEE-URL", "http://127.0.0.1:1")
        .env("INPUT_POSTAGE-BATCH-ID", "deadbeef")
        .env("INPUT_DIR", site.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::error::Error running main: postage-batch-id must be a 64-character hexadecimal string",
        ));
    Ok(())
}

#[test]
fn test_missing_required_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    step_cmd()?
        .env("INPUT_POSTAGE-BATCH-ID", ZERO_BATCH)
        .env("INPUT_DIR", ".")
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::Error running main: Input required and not supplied: bee-url"));
    Ok(())
}

#[test]
fn test_non_numeric_retry_fails() -> Result<(), Box<dyn std::error::Error>> {
    step_cmd()?
        .args(["--input", "bee-url=http://127.0.0.1:1"])
        .args(["--input", &format!("postage-batch-id={}", ZERO_BATCH)])
        .args(["--input", "dir=."])
        .args(["--input", "retry=often"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Input retry must be a base-10 number, got 'often'"));
    Ok(())
}

#[test]
fn test_unreachable_node_fails_upload() -> Result<(), Box<dyn std::error::Error>> {
    let site = setup_site()?;

    step_cmd()?
        .env("INPUT_BEE-URL", "http://127.0.0.1:1")
        .env("INPUT_POSTAGE-BATCH-ID", ZERO_BATCH)
        .env("INPUT_DIR", site.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::Error uploading files:"))
        .stdout(predicate::str::contains("Uploading directory"));
    Ok(())
}

#[test]
fn test_bad_input_flag_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    step_cmd()?
        .args(["--input", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected NAME=VALUE"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_publishes_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bzz"))
        .and(header("swarm-postage-batch-id", ZERO_BATCH))
        .and(header("swarm-pin", "true"))
        .and(header("x-api-key", "k"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("swarm-tag", "42")
                .set_body_json(json!({ "reference": "abc123" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let site = setup_site()?;
    let outputs = TempDir::new()?;
    let output_file = outputs.child("output");
    let config = outputs.child("inputs.toml");
    config.write_str("pin = true\n")?;

    let mut cmd = step_cmd()?;
    cmd.arg("--config")
        .arg(config.path())
        .env("INPUT_BEE-URL", server.uri())
        .env("INPUT_POSTAGE-BATCH-ID", ZERO_BATCH)
        .env("INPUT_DIR", site.path())
        .env("INPUT_HEADERS", "X-Api-Key: k")
        .env("GITHUB_OUTPUT", output_file.path());

    // The mock server keeps serving on the runtime while the binary blocks
    let output = tokio::task::spawn_blocking(move || cmd.output()).await??;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("reference abc123"))
        .stdout(predicate::str::contains("::error::").not());

    let content = std::fs::read_to_string(output_file.path())?;
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("reference<<ghadelimiter_"));
    assert_eq!(lines[1], "abc123");
    assert!(lines[3].starts_with("tagUid<<ghadelimiter_"));
    assert_eq!(lines[4], "42");

    Ok(())
}
