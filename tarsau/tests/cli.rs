//! End-to-end tests driving the `tarsau` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tarsau<I, S>(cwd: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_tarsau"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.txt"), b"first\n").unwrap();
    std::fs::write(dir.path().join("two.txt"), b"second\nfile\n").unwrap();
    dir
}

#[test]
fn build_then_extract() {
    let dir = setup();

    let out = tarsau(dir.path(), &["b", "-o", "bundle.sau", "one.txt", "two.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("Archive created successfully: bundle.sau"));

    let out = tarsau(dir.path(), &["a", "bundle.sau", "restored"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("Archive extracted successfully to restored"));

    let restored = dir.path().join("restored");
    assert_eq!(std::fs::read(restored.join("one.txt")).unwrap(), b"first\n");
    assert_eq!(
        std::fs::read(restored.join("two.txt")).unwrap(),
        b"second\nfile\n"
    );
}

#[test]
fn flag_spelling() {
    let dir = setup();

    let out = tarsau(dir.path(), &["-b", "-o", "flags.sau", "one.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let out = tarsau(dir.path(), &["-a", "flags.sau", "restored"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        std::fs::read(dir.path().join("restored/one.txt")).unwrap(),
        b"first\n"
    );
}

#[test]
fn default_output_name() {
    let dir = setup();

    let out = tarsau(dir.path(), &["build", "one.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(dir.path().join("a.sau").is_file());
}

#[test]
fn list_as_json() {
    let dir = setup();
    let out = tarsau(dir.path(), &["b", "one.txt", "two.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let out = tarsau(dir.path(), &["list", "--json", "a.sau"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let listing: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = listing.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "one.txt");
    assert_eq!(entries[0]["size"], 6);
    assert_eq!(entries[1]["name"], "two.txt");
    assert_eq!(entries[1]["size"], 12);
}

#[test]
fn list_table() {
    let dir = setup();
    let out = tarsau(dir.path(), &["b", "one.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let out = tarsau(dir.path(), &["l", "a.sau"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).lines().any(|l| l.ends_with("one.txt")));
}

#[test]
fn non_text_input_fails_with_one_line() {
    let dir = setup();
    std::fs::write(dir.path().join("blob.bin"), [0xde, 0xad, 0xbe, 0xef]).unwrap();

    let out = tarsau(dir.path(), &["b", "one.txt", "blob.bin"]);
    assert_eq!(out.status.code(), Some(1));

    let err = stderr(&out);
    assert_eq!(err.lines().count(), 1, "{}", err);
    assert!(err.starts_with("error: "));
    assert!(err.contains("not a plain-text file"));
    assert!(!dir.path().join("a.sau").exists());
}

#[test]
fn too_many_files() {
    let dir = TempDir::new().unwrap();
    let mut args = vec!["b".to_string()];
    for i in 0..33 {
        let name = format!("f{}.txt", i);
        std::fs::write(dir.path().join(&name), b"x").unwrap();
        args.push(name);
    }

    let out = tarsau(dir.path(), &args);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Too many input files"));

    args.pop();
    let out = tarsau(dir.path(), &args);
    assert!(out.status.success(), "{}", stderr(&out));
}

#[test]
fn truncated_archive_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("broken.sau"),
        b"0000000011\n|ok.txt,644,2|ok|cut.txt,644,50|abc",
    )
    .unwrap();

    let out = tarsau(dir.path(), &["a", "broken.sau", "out"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert_eq!(err.lines().count(), 1, "{}", err);
    assert!(err.contains("Unexpected end of archive"));
    assert_eq!(std::fs::read(dir.path().join("out/ok.txt")).unwrap(), b"ok");
}

#[test]
fn missing_archive_fails() {
    let dir = TempDir::new().unwrap();
    let out = tarsau(dir.path(), &["a", "nope.sau", "out"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("inappropriate or corrupt"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_arguments_fail() {
    let dir = TempDir::new().unwrap();
    assert!(!tarsau(dir.path(), &["b"]).status.success());
    assert!(!tarsau(dir.path(), &["a", "only-archive.sau"]).status.success());
    assert!(!tarsau(dir.path(), Vec::<&str>::new()).status.success());
}
