// Runs the built binary the way a user would, with the program text piped through stdin.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_forthvm(args: &[&str], stdin_text: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_forthvm"))
        .args(args)
        .env_remove("FORTHVM_TRACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start forthvm");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin_text.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}

#[test]
fn end_of_input_exits_cleanly_with_a_farewell() {
    let output = run_forthvm(&[], ": SQUARE DUP * ;\n7 SQUARE PRINT\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout, "49\nGoodbye.\n");
}

#[test]
fn parse_error_exits_with_failure() {
    let output = run_forthvm(&[], "1 PRINT\n12x4\n2 PRINT\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert_eq!(stdout, "1\n");
    assert!(stderr.contains("PARSE ERROR: 12x4."));
}

#[test]
fn runtime_errors_are_reported_and_skipped() {
    let output = run_forthvm(&[], "DROP\n5 PRINT\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert_eq!(stdout, "5\nGoodbye.\n");
    assert!(stderr.contains("Stack underflow."));
}

#[test]
fn program_words_on_the_command_line() {
    let output = run_forthvm(&["6", "-4", "+", "PRINT"], "");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
}

#[test]
fn source_file_runs_before_stdin() {
    let path = std::env::temp_dir().join(format!("forthvm-cli-{}.f", std::process::id()));

    std::fs::write(&path, ": GREET 72 EMIT 105 EMIT CR ;\n").unwrap();

    let output = run_forthvm(&["-f", path.to_str().unwrap()], "GREET\n");

    std::fs::remove_file(&path).unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hi\nGoodbye.\n");
}

#[test]
fn source_file_and_program_words_are_exclusive() {
    let output = run_forthvm(&["-f", "prelude.f", "1", "PRINT"], "");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr.contains("cannot be used with"));
}

#[test]
fn missing_source_file_fails() {
    let output = run_forthvm(&["-f", "/no/such/forthvm/file.f"], "");

    assert!(!output.status.success());
}
