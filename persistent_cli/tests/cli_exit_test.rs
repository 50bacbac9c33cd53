use std::io::Write;
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_persistent_cli"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to spawn persistent_cli")
}

#[test]
fn missing_target_entry_point_exits_with_one() {
    let output = run_cli(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("LLVMFuzzerTestOneInput"),
        "unexpected stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_config_file_exits_with_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not-a-key = true").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let output = run_cli(&["--config-file", &path]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR:"), "unexpected stderr: {stderr}");
}

#[test]
fn zero_buffer_size_is_rejected() {
    let output = run_cli(&["--buffer-size", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("buffer-size"), "unexpected stderr: {stderr}");
}
