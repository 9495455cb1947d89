// CLI integration tests for the offline parse flow.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_meshwire");
    Command::new(exe)
}

fn parse_json(output: &[u8]) -> Value {
    let text = std::str::from_utf8(output).expect("utf8");
    serde_json::from_str(text).expect("valid json")
}

#[test]
fn parse_file_emits_record_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("response.txt");
    std::fs::write(
        &input,
        "{'message': 'hi', 'session_id': 'abc123', 'image': '', 'object': ''}",
    )
    .expect("write input");

    let output = cmd()
        .args(["parse", input.to_str().unwrap()])
        .output()
        .expect("parse");
    assert!(output.status.success());

    let record = parse_json(&output.stdout);
    assert_eq!(record.get("message").unwrap().as_str().unwrap(), "hi");
    assert_eq!(
        record.get("session_id").unwrap().as_str().unwrap(),
        "abc123"
    );
    assert_eq!(record.get("image").unwrap().as_str().unwrap(), "");
    assert_eq!(record.get("object").unwrap().as_str().unwrap(), "");
}

#[test]
fn parse_reads_stdin_when_no_file() {
    let mut child = cmd()
        .arg("parse")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"{'message': 'from stdin', 'session_id': 's1'}")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());

    let record = parse_json(&output.stdout);
    assert_eq!(
        record.get("message").unwrap().as_str().unwrap(),
        "from stdin"
    );
}

#[test]
fn normalized_only_prints_repaired_text() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("response.txt");
    std::fs::write(&input, "{'message': 'hi', 'session_id': 's1'}").expect("write input");

    let output = cmd()
        .args(["parse", "--normalized-only", input.to_str().unwrap()])
        .output()
        .expect("parse");
    assert!(output.status.success());

    let text = std::str::from_utf8(&output.stdout).expect("utf8");
    assert_eq!(text.trim_end(), r#"{"message": "hi", "session_id": "s1"}"#);
}

#[test]
fn malformed_input_fails_with_syntax_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("response.txt");
    std::fs::write(&input, "definitely not a mapping").expect("write input");

    let output = cmd()
        .args(["parse", input.to_str().unwrap()])
        .output()
        .expect("parse");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(4));

    let err = parse_json(&output.stderr);
    let inner = err.get("error").and_then(|v| v.as_object()).expect("error");
    assert_eq!(inner.get("kind").unwrap().as_str().unwrap(), "Syntax");
    // raw upstream text stays out of the user-facing error surface
    assert!(!output.stderr.windows(9).any(|w| w == b"definitely"));
}

#[test]
fn missing_input_file_is_io_error() {
    let output = cmd()
        .args(["parse", "/nonexistent/response.txt"])
        .output()
        .expect("parse");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(7));
}
