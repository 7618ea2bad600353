//! Integration tests for CLI argument handling.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn compat_check() -> Command {
    let mut cmd = Command::new(cargo_bin("compat-check"));
    cmd.env_remove("PACKAGIST_PUBLIC")
        .env_remove("PACKAGIST_SECRET")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    compat_check()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("clear"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    compat_check()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn check_help_lists_flags() -> Result<(), Box<dyn std::error::Error>> {
    compat_check()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--php-version"))
        .stdout(predicate::str::contains("--only-direct"))
        .stdout(predicate::str::contains("--jobs"));
    Ok(())
}

#[test]
fn only_direct_without_lockfile_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    compat_check()
        .current_dir(temp.path())
        .args(["check", "acme-org", "acme", "--only-direct"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--only-direct requires --lockfile"));
    assert!(!temp.path().join("results").exists());
    Ok(())
}

#[test]
fn missing_credentials_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    compat_check()
        .current_dir(temp.path())
        .args(["check", "acme-org", "acme"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PACKAGIST_PUBLIC"));
    Ok(())
}

#[test]
fn invalid_php_version_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    compat_check()
        .current_dir(temp.path())
        .args(["check", "acme-org", "acme", "--php-version", "latest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a PHP version"));
    Ok(())
}

#[test]
fn show_without_results_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    compat_check()
        .current_dir(temp.path())
        .args(["show", "acme"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No results stored for acme"));
    Ok(())
}

#[test]
fn show_renders_stored_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("results"))?;
    fs::write(
        temp.path().join("results/results_acme.json"),
        r#"[["acme\/billing","Compatible",">=8.1","OK"],["acme\/legacy","Unknown","","General error"]]"#,
    )?;

    compat_check()
        .current_dir(temp.path())
        .args(["show", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final result"))
        .stdout(predicate::str::contains("acme/legacy"))
        .stdout(predicate::str::contains(
            "Summary for acme: Compatible: 1 / 2 (50%)",
        ));
    Ok(())
}

#[test]
fn quiet_show_prints_only_summary() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("results"))?;
    fs::write(
        temp.path().join("results/results_acme.json"),
        r#"[["acme/billing","Compatible",">=8.1","OK"]]"#,
    )?;

    compat_check()
        .current_dir(temp.path())
        .args(["--quiet", "show", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final result").not())
        .stdout(predicate::str::contains("Compatible: 1 / 1 (100%)"));
    Ok(())
}

#[test]
fn clear_removes_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let ledger = temp.path().join("store/results_acme.json");
    fs::create_dir_all(temp.path().join("store"))?;
    fs::write(&ledger, "[]")?;

    compat_check()
        .current_dir(temp.path())
        .args(["clear", "acme", "--results-dir", "store"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(!ledger.exists());
    Ok(())
}
