//! Tests for the `bank` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bank(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bank").unwrap();
    cmd.arg("--data-dir")
        .arg(dir.path())
        .env_remove("BANK_LOGIN")
        .env_remove("BANK_PASSWORD")
        .env("RUST_LOG", "warn");
    cmd
}

fn as_admin(dir: &TempDir) -> Command {
    let mut cmd = bank(dir);
    cmd.args(["--login", "admin"]).env("BANK_PASSWORD", "admin");
    cmd
}

#[test]
fn init_writes_config_and_seeds() {
    let dir = TempDir::new().unwrap();

    bank(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized ledger"))
        .stdout(predicate::str::contains("Users: 1, accounts: 1"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("users").is_dir());

    bank(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn admin_lists_seeded_account() {
    let dir = TempDir::new().unwrap();

    as_admin(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking (acc-"))
        .stdout(predicate::str::contains("0.00 CZK"));
}

#[test]
fn open_rename_and_audit() {
    let dir = TempDir::new().unwrap();

    as_admin(&dir)
        .args(["account", "open", "-t", "savings", "--name", "Holiday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Opened account: Holiday"));

    as_admin(&dir)
        .args(["account", "rename", "Holiday", "Vacation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed account: Vacation"));

    as_admin(&dir)
        .args(["account", "audit", "Vacation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATION"))
        .stdout(predicate::str::contains("renamed=Vacation"));
}

#[test]
fn transfer_from_empty_account_fails() {
    let dir = TempDir::new().unwrap();

    as_admin(&dir)
        .args(["account", "open", "--name", "Target"])
        .assert()
        .success();

    as_admin(&dir)
        .args(["transfer", "Checking", "Target", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));
}

#[test]
fn account_commands_require_login() {
    let dir = TempDir::new().unwrap();

    bank(&dir)
        .args(["account", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--login"));
}

#[test]
fn wrong_password_is_rejected() {
    let dir = TempDir::new().unwrap();

    bank(&dir)
        .args(["--login", "admin", "account", "list"])
        .env("BANK_PASSWORD", "not-admin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password"));
}

#[test]
fn repeated_wrong_passwords_lock_out_later_runs() {
    let dir = TempDir::new().unwrap();

    for _ in 0..5 {
        bank(&dir)
            .args(["--login", "admin", "account", "list"])
            .env("BANK_PASSWORD", "not-admin")
            .assert()
            .failure();
    }

    bank(&dir)
        .args(["--login", "admin", "account", "list"])
        .env("BANK_PASSWORD", "not-admin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Too many failed logins"));

    // Locked even with the right password
    bank(&dir)
        .args(["--login", "admin", "account", "list"])
        .env("BANK_PASSWORD", "admin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Too many failed logins"));
}

#[test]
fn register_and_search_user() {
    let dir = TempDir::new().unwrap();

    bank(&dir)
        .args([
            "user", "register", "jsmith", "--email", "john@example.com", "--name", "John",
            "--last-name", "Smith",
        ])
        .env("BANK_PASSWORD", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered user: jsmith"));

    as_admin(&dir)
        .args(["user", "search", "Jon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("John Smith"));
}
