#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Setup {
    _root: TempDir,
    home: PathBuf,
    store: PathBuf,
    config: PathBuf,
}

fn setup(body: &str) -> Setup {
    let root = tempfile::tempdir().expect("tempdir");
    let base = fs::canonicalize(root.path()).unwrap();
    let home = base.join("home");
    let store = base.join("store");
    fs::create_dir(&home).unwrap();
    fs::create_dir(&store).unwrap();
    let config = base.join("stow.ini");
    fs::write(
        &config,
        format!("[dirs]\nmedia = {}\n\n[media]\n{body}", store.display()),
    )
    .unwrap();
    Setup {
        _root: root,
        home,
        store,
        config,
    }
}

fn run(args: &[&str]) -> Output {
    let me = assert_cmd::cargo::cargo_bin!("home_stow");
    Command::new(me).args(args).output().expect("spawn binary")
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

#[test]
fn no_arguments_is_a_usage_error() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn two_configs_is_a_usage_error() {
    let out = run(&["a.ini", "b.ini"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn help_exits_zero() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("CONFIG"));
}

#[test]
fn missing_config_exits_one_without_touching_home() {
    let s = setup("Music/\n");
    fs::create_dir(s.home.join("Music")).unwrap();
    let missing = s.config.with_file_name("nope.ini");

    let out = run(&[path_str(&missing), "--home", path_str(&s.home)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope.ini"));
    assert!(!fs::symlink_metadata(s.home.join("Music")).unwrap().file_type().is_symlink());
}

#[test]
fn malformed_config_exits_one_and_names_the_file() {
    let s = setup("Music/\n");
    fs::write(&s.config, "[dirs\nmedia = /mnt/media\n").unwrap();

    let out = run(&[path_str(&s.config), "--home", path_str(&s.home)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("stow.ini"));
}

#[test]
fn links_declared_paths_and_reports_on_stdout() {
    let s = setup("Music/\n");
    fs::create_dir(s.home.join("Music")).unwrap();
    fs::write(s.home.join("Music/a.mp3"), "a").unwrap();

    let out = run(&[path_str(&s.config), "--home", path_str(&s.home), "--yes"]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ok: linked"), "stdout: {stdout}");
    assert!(stdout.contains("1 changed"), "stdout: {stdout}");
    assert_eq!(fs::read_link(s.home.join("Music")).unwrap(), s.store.join("Music"));
}

#[test]
fn per_path_warnings_do_not_fail_the_run() {
    let s = setup("Music/\n");
    fs::write(s.home.join("Music"), "a file, not a dir").unwrap();

    let out = run(&[path_str(&s.config), "--home", path_str(&s.home)]);

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("warn:"));
}

#[test]
fn json_logs_go_to_stderr_with_structured_fields() {
    let s = setup("Music/\n");
    fs::create_dir(s.home.join("Music")).unwrap();

    let out = run(&[
        path_str(&s.config),
        "--home",
        path_str(&s.home),
        "--json",
        "--log-level",
        "info",
    ]);
    assert!(out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();
    assert!(!events.is_empty(), "no JSON lines on stderr: {stderr}");
    assert!(
        events.iter().any(|e| e["fields"]["kind"] == "linked"),
        "no linked event in: {stderr}"
    );
    // stdout stays plain status lines
    assert!(String::from_utf8_lossy(&out.stdout)
        .lines()
        .all(|l| serde_json::from_str::<serde_json::Value>(l).is_err()));
}

#[test]
fn log_file_receives_events() {
    let s = setup("Music/\n");
    let log = s.config.with_file_name("logs").join("stow.log");

    let out = run(&[
        path_str(&s.config),
        "--home",
        path_str(&s.home),
        "--log-file",
        path_str(&log),
    ]);
    assert!(out.status.success());

    let contents = fs::read_to_string(&log).expect("log file written");
    assert!(contents.contains("starting reconciliation"), "log: {contents}");
}
