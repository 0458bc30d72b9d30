//! CLI end-to-end tests
//!
//! Tests for the shelf command-line interface.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the shelf binary
#[allow(deprecated)]
fn shelf_cmd() -> Command {
    Command::cargo_bin("shelf").unwrap()
}

/// A temp workspace with a config pointing the database and media root inside it.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = dir.path().join("shelf.json");
        let json = serde_json::json!({
            "database": { "path": dir.path().join("shelf.db") },
            "media": { "root": dir.path().join("media") },
        });
        fs::write(&config, json.to_string()).unwrap();
        Self { dir, config }
    }

    fn cmd(&self) -> Command {
        let mut cmd = shelf_cmd();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    /// Run a command that must succeed and return its stdout.
    fn run(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "shelf {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    /// Run an `add` command and return the new record's ID.
    fn add(&self, args: &[&str]) -> String {
        let out = self.run(args);
        out.split_whitespace()
            .nth(2)
            .unwrap_or_else(|| panic!("no id in {out:?}"))
            .to_string()
    }

    fn media(&self) -> PathBuf {
        self.dir.path().join("media")
    }

    fn write_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, common::png_bytes(width, height)).unwrap();
        path
    }
}

fn dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = shelf_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = shelf_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelf"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = shelf_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("shelf "));
}

#[test]
fn test_cli_validate_valid_config() {
    let ws = Workspace::new();
    let mut cmd = shelf_cmd();
    cmd.arg("validate")
        .arg(&ws.config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Cover size: 210x280"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("broken.json");
    fs::write(&config, "{ not json").unwrap();

    let mut cmd = shelf_cmd();
    cmd.arg("validate").arg(&config).assert().failure();
}

#[test]
fn test_cli_validate_warns_on_zero_size() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("shelf.json");
    fs::write(&config, r#"{"images": {"cover": {"width": 0, "height": 280}}}"#).unwrap();

    let mut cmd = shelf_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("images.cover"));
}

#[test]
fn test_cli_init_writes_placeholder() {
    let ws = Workspace::new();
    ws.run(&["init"]);
    let placeholder = ws.media().join("book_cover/default.jpg");
    assert!(placeholder.is_file());
    assert_eq!(dimensions(&placeholder), (210, 280));

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"));
}

#[test]
fn test_cli_book_lifecycle() {
    let ws = Workspace::new();
    ws.run(&["init"]);

    let author = ws.add(&["author", "add", "A"]);
    let book = ws.add(&["book", "add", "B1", "--author", &author]);

    let listing: serde_json::Value =
        serde_json::from_str(&ws.run(&["book", "list", "--json"])).unwrap();
    assert_eq!(listing[0]["slug"], "b1-by-a");
    assert_eq!(listing[0]["cover"], "book_cover/default.jpg");
    assert_eq!(listing[0]["poll_up"], 0);

    let f1 = ws.write_png("f1.png", 300, 300);
    ws.run(&["book", "set-cover", &book, f1.to_str().unwrap()]);
    let listing: serde_json::Value =
        serde_json::from_str(&ws.run(&["book", "list", "--json"])).unwrap();
    let first_cover = ws.media().join(listing[0]["cover"].as_str().unwrap());
    assert_eq!(dimensions(&first_cover), (210, 280));

    let f2 = ws.write_png("f2.png", 800, 600);
    ws.run(&["book", "set-cover", &book, f2.to_str().unwrap()]);
    let listing: serde_json::Value =
        serde_json::from_str(&ws.run(&["book", "list", "--json"])).unwrap();
    let second_cover = ws.media().join(listing[0]["cover"].as_str().unwrap());

    assert!(!first_cover.exists());
    assert_eq!(dimensions(&second_cover), (210, 280));
    assert!(ws.media().join("book_cover/default.jpg").is_file());

    ws.cmd()
        .args(["book", "vote", &book, "up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up: 1, down: 0, count: 1"));

    ws.cmd()
        .args(["poll", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B1"));

    ws.run(&["book", "delete", &book]);
    assert!(!second_cover.exists());
    ws.cmd()
        .args(["book", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B1").not());
}

#[test]
fn test_cli_author_rename_and_list() {
    let ws = Workspace::new();
    let author = ws.add(&["author", "add", "Tolkien"]);
    ws.run(&["author", "rename", &author, "J.R.R. Tolkien"]);

    ws.cmd()
        .args(["author", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jrr-tolkien"));
}

#[test]
fn test_cli_duplicate_tag_fails() {
    let ws = Workspace::new();
    ws.run(&["tag", "add", "SF"]);
    ws.cmd().args(["tag", "add", "SF"]).assert().failure();
}

#[test]
fn test_cli_carousel_rejects_bad_link() {
    let ws = Workspace::new();
    let slide = ws.write_png("slide.png", 1920, 1080);
    ws.cmd()
        .args(["carousel", "add", slide.to_str().unwrap(), "--link", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("link"));
}

#[test]
fn test_cli_carousel_add_crops() {
    let ws = Workspace::new();
    let slide = ws.write_png("slide.png", 1920, 1080);
    ws.run(&["carousel", "add", slide.to_str().unwrap(), "--name", "spring"]);

    let listing: serde_json::Value =
        serde_json::from_str(&ws.run(&["carousel", "list", "--json"])).unwrap();
    let img = ws.media().join(listing[0]["img"].as_str().unwrap());
    assert_eq!(dimensions(&img), (1600, 900));
}

#[test]
fn test_cli_unknown_book_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["book", "delete", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_zero_pool_size_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("shelf.json");
    let json = serde_json::json!({
        "database": { "path": dir.path().join("shelf.db"), "pool_size": 0 },
        "media": { "root": dir.path().join("media") },
    });
    fs::write(&config, json.to_string()).unwrap();

    let mut cmd = shelf_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["tag", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pool_size"));
}
