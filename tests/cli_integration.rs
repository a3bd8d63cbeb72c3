//! Integration tests for the `armada` binary.
//!
//! These tests run the compiled binary with an isolated configuration.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running armada, isolated from the user's config.
fn armada(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("armada").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env_remove("ARMADA_CONFIG")
        .env_remove("ARMADA_LOG");
    cmd
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armada"));
}

#[test]
fn run_prints_results() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["run", "!greet Alice 3", "!add 1 2", "!echo hello   world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, Alice! Hello, Alice! Hello, Alice!"))
        .stdout(predicate::str::contains("\n3\n"))
        .stdout(predicate::str::contains("hello   world"));
}

#[test]
fn run_reports_failures() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["run", "!add 1 2 3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[too_many_arguments]"));

    armada(&home)
        .args(["run", "!nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command 'nothing'"));
}

#[test]
fn user_flag_reaches_handlers() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["--user", "grace", "run", "!whoami"])
        .assert()
        .success()
        .stdout(predicate::str::diff("grace\n"));
}

#[test]
fn prefix_flag_overrides_default() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["--prefix", "?", "run", "?yell hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HI"));

    armada(&home)
        .args(["--prefix", "?", "run", "!yell hi"])
        .assert()
        .failure();
}

#[test]
fn config_file_sets_prefix_and_routes() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("armada.toml");
    fs::write(
        &path,
        "prefix = \"$\"\ncase_insensitive = false\n\n[prefixes]\nadmin = \">\"\n",
    )
    .unwrap();

    armada(&home)
        .arg("--config")
        .arg(&path)
        .args(["run", "$whoami"])
        .assert()
        .success();

    armada(&home)
        .arg("--config")
        .arg(&path)
        .args(["--route", "admin", "run", ">whoami"])
        .assert()
        .success();

    armada(&home)
        .arg("--config")
        .arg(&path)
        .args(["run", "$WHOAMI"])
        .assert()
        .failure();
}

#[test]
fn config_discovered_in_default_locations() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["run", "!yell hi"])
        .assert()
        .success()
        .stdout(predicate::str::diff("HI\n"));

    let dotdir = home.path().join(".armada");
    fs::create_dir_all(&dotdir).unwrap();
    fs::write(dotdir.join("config.toml"), "prefix = \"$\"\n").unwrap();
    armada(&home)
        .args(["run", "$yell hi"])
        .assert()
        .success()
        .stdout(predicate::str::diff("HI\n"));

    let xdg = home.path().join("xdg/armada");
    fs::create_dir_all(&xdg).unwrap();
    fs::write(xdg.join("config.toml"), "prefix = \"%\"\n").unwrap();
    armada(&home)
        .args(["run", "%yell hi"])
        .assert()
        .success()
        .stdout(predicate::str::diff("HI\n"));
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("armada.toml");
    fs::write(&path, "prefix = \"\"\n").unwrap();

    armada(&home)
        .arg("--config")
        .arg(&path)
        .args(["run", "!whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn disabled_gear_is_reported() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["--disable", "math", "run", "!add 1 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gear 'math' is disabled"));
}

#[test]
fn repl_reads_stdin() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .arg("repl")
        .write_stdin("!add 2 2\n\n!nope\n!convert 2 min s\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("4\n"))
        .stdout(predicate::str::contains("120 seconds"));
}

#[test]
fn list_shows_gears_and_usage() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("greetings: Polite commands"))
        .stdout(predicate::str::contains("!greet (name) <times>"));
}

#[test]
fn list_json_is_parseable() {
    let home = TempDir::new().unwrap();
    let output = armada(&home).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let listings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let shout = listings
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["name"] == "shout")
        .unwrap();
    assert_eq!(shout["aliases"], serde_json::json!(["yell"]));
    assert_eq!(shout["gear"], "core");
    assert!(shout.get("data").is_none());

    let repeat = listings
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["name"] == "repeat")
        .unwrap();
    assert_eq!(repeat["data"]["max"], 10.0);
}

#[test]
fn help_describes_command() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["help", "plus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add two integers"))
        .stdout(predicate::str::contains("Usage: !add (a) (b)"))
        .stdout(predicate::str::contains("!add 1.5 2.25"));

    armada(&home)
        .args(["help", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command 'nope'"));
}

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    armada(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armada"));
}
