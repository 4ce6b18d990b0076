use std::io::Write;
use std::process::{Command, Stdio};

fn zcalc(args: &[&str], stdin: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_zcalc"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let out = child.wait_with_output().unwrap();
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn keys_from_arguments() {
    assert_eq!(zcalc(&["7", "+", "3", "="], ""), "10\n");
    assert_eq!(zcalc(&["1/0="], ""), "Error\n");
}

#[test]
fn keys_from_stdin() {
    let out = zcalc(&[], "12x²\n=\nc\n2 sqrt 9 =\n");
    assert_eq!(out, "12x²\n144\n0\n6\n");
}

#[test]
fn unknown_input_is_skipped() {
    let out = zcalc(&[], "4\nhello\n+1=\n");
    assert_eq!(out, "4\n5\n");
}

#[test]
fn steps_print_every_press() {
    let out = zcalc(&["--steps", "9", "~"], "");
    assert_eq!(out, "   9 -> 9\n +/- -> (-9)\n(-9)\n");
}
