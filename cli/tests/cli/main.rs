#![cfg(unix)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::{json, Value};

mod create;
mod packages;

pub(crate) const FRAMEWORK: &str = "@ongov/ontario-frontend";

/// Runs the binary inside `dir` with `package_manager` standing in for npm.
/// `true` and `false` give a package manager that always succeeds or fails.
pub(crate) fn ontario_frontend_cmd(dir: &Path, package_manager: &str) -> Command {
    let mut cmd = Command::cargo_bin("ontario-frontend").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("ONTARIO_FRONTEND_PACKAGE_MANAGER", package_manager);
    cmd
}

pub(crate) fn write_manifest(dir: &Path, manifest: Value) {
    fs::write(
        dir.join("package.json"),
        serde_json::to_vec_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

/// A project that already declares both eslint dependencies.
pub(crate) fn project_with_eslint_declared() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        json!({
            "name": "site",
            "dependencies": { FRAMEWORK: "latest" },
            "devDependencies": {
                "eslint": "^8.57.0",
                "@ongov/eslint-config-ontario-frontend": "latest"
            }
        }),
    );
    dir
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    ontario_frontend_cmd(dir.path(), "true")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("create"))
        .stdout(predicates::str::contains("add-package"))
        .stdout(predicates::str::contains("remove-package"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    ontario_frontend_cmd(dir.path(), "true")
        .args(["--config", "nope.toml", "add-package", "eslint"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("does not exist"));
}

#[test]
fn config_file_selects_the_package_manager() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        json!({ "dependencies": { FRAMEWORK: "latest" } }),
    );
    fs::write(dir.path().join("ontario-frontend.toml"), "package_manager = \"false\"\n").unwrap();

    let mut cmd = Command::cargo_bin("ontario-frontend").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ONTARIO_FRONTEND_PACKAGE_MANAGER")
        .args(["add-package", "prettier"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("false install --save-dev prettier"));
}
