mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hydrogen_density"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "error")
        .stdin(Stdio::null())
        .output()
        .expect("spawn hydrogen_density")
}

fn written_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn usage_errors_exit_with_two() {
    let dir = common::scratch_dir("exit_usage");
    let cases: [&[&str]; 4] = [
        &["--verbose"],
        &["2", "1"],
        &["two", "1", "0", "1"],
        &["1", "0", "0", "1", "9"],
    ];
    for args in cases {
        let output = run_in(&dir, args);
        assert_eq!(output.status.code(), Some(2), "args {args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Usage: hydrogen_density"), "args {args:?}: {stderr}");
    }
    assert!(written_files(&dir).is_empty());
}

#[test]
fn validation_failures_exit_with_one_and_write_nothing() {
    let dir = common::scratch_dir("exit_validation");
    let cases: [(&[&str], &str); 5] = [
        (&["0", "0", "0", "1"], "n must be an integer"),
        (&["2", "2", "0", "1"], "l must be an integer"),
        (&["2", "1", "-2", "1"], "m must be an integer"),
        (&["1", "0", "0", "0"], "a0 scale factor"),
        (&["1", "0", "0", "1", "--colormap", "nope"], "nope is not a recognized colormap"),
    ];
    for (args, message) in cases {
        let output = run_in(&dir, args);
        assert_eq!(output.status.code(), Some(1), "args {args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(message), "args {args:?}: {stderr}");
    }
    assert!(written_files(&dir).is_empty());
}

#[test]
fn closed_stdin_during_prompt_exits_with_one() {
    let dir = common::scratch_dir("exit_prompt");
    let output = run_in(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Principal quantum number (n): "));
    assert!(written_files(&dir).is_empty());
}

#[test]
fn successful_render_exits_with_zero() {
    let dir = common::scratch_dir("exit_success");
    let output = run_in(&dir, &["2", "1", "0", "1", "--dark_theme"]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(written_files(&dir), vec!["(2,1,0)[dt].png".to_string()]);

    let help = run_in(&dir, &["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&help.stdout).contains("--colormap NAME"));
}
