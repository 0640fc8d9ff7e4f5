use std::process::{Command, Output};

use assert_fs::{TempDir, prelude::*};
use predicates::prelude::*;

fn sprout(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sprout"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn combined_output(output: &Output) -> String {
    let mut s = String::from_utf8_lossy(&output.stdout).into_owned();
    s.push_str(&String::from_utf8_lossy(&output.stderr));
    s
}

#[test]
fn second_run_exits_with_error_status() {
    let temp = TempDir::new().unwrap();

    let first = sprout(&temp, &["tutorials/my_post"]);
    assert!(first.status.success(), "{}", combined_output(&first));
    let post = temp.child("content/tutorials/my_post.md");
    post.assert(predicate::path::is_file());
    let original = std::fs::read_to_string(post.path()).unwrap();

    let second = sprout(&temp, &["tutorials/my_post"]);
    assert_eq!(second.status.code(), Some(255));
    let output = combined_output(&second);
    assert!(output.contains("content/tutorials/my_post.md"), "{output}");
    assert!(output.contains("already exists"), "{output}");
    post.assert(original.as_str());
}

#[test]
fn missing_name_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    let output = sprout(&temp, &[]);
    assert_eq!(output.status.code(), Some(2));
    temp.child("content").assert(predicate::path::missing());
}

#[test]
fn missing_default_config_is_not_reported() {
    let temp = TempDir::new().unwrap();

    let output = sprout(&temp, &["hello"]);
    assert!(output.status.success());
    let output = combined_output(&output);
    assert!(!output.contains("not found"), "{output}");
    assert!(!output.contains("WARN"), "{output}");
}

#[test]
fn format_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    temp.child("sprout.toml").write_str("format = \"yaml\"\n").unwrap();

    let output = sprout(&temp, &["--format", "toml", "hello"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    temp.child("content/hello.md").assert(predicate::str::starts_with("+++\nid = "));
}

#[test]
fn type_flag_overrides_inferred_type() {
    let temp = TempDir::new().unwrap();

    let output = sprout(&temp, &["-t", "blog", "notes/hello"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    temp.child("content/notes/hello.md")
        .assert(predicate::str::contains("type: blog\ntags: []\ncategories: []\n"));
}

#[test]
fn template_flag_is_relative_to_working_directory() {
    let temp = TempDir::new().unwrap();
    temp.child("site/sprout.toml").write_str("").unwrap();
    temp.child("drafts/new_post.md").write_str("type: {type}\n").unwrap();

    let output = sprout(
        &temp,
        &["--config", "site/sprout.toml", "--template", "drafts/new_post.md", "-t", "note", "hi"],
    );
    assert!(output.status.success(), "{}", combined_output(&output));
    temp.child("site/content/hi.md").assert("type: note\n");
}
