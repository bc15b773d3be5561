use std::fs;

use predicates::prelude::*;
use serde_json::json;

use crate::{ontario_frontend_cmd, project_with_eslint_declared, write_manifest, FRAMEWORK};

#[test]
fn add_package_installs_and_copies_config() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), json!({ "dependencies": { FRAMEWORK: "latest" } }));

    ontario_frontend_cmd(dir.path(), "true")
        .args(["add-package", "prettier"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "prettier: dependencies and configuration files added",
        ));

    assert!(dir.path().join(".prettierrc.js").is_file());
    assert!(dir.path().join(".prettierignore").is_file());
}

#[test]
fn add_package_twice_is_a_no_op() {
    let project = project_with_eslint_declared();

    // `false` fails any install, so a second run must not call it.
    ontario_frontend_cmd(project.path(), "false")
        .args(["add-package", "eslint"])
        .assert()
        .success()
        .stdout(predicates::str::contains("eslint: configuration files added"));
    fs::write(project.path().join(".eslintrc.js"), "module.exports = {};").unwrap();

    ontario_frontend_cmd(project.path(), "false")
        .args(["add-package", "eslint"])
        .assert()
        .success()
        .stdout(predicates::str::contains("eslint: already present, nothing to do"))
        .stderr(predicates::str::contains(".eslintrc.js already exists"));

    assert_eq!(
        fs::read_to_string(project.path().join(".eslintrc.js")).unwrap(),
        "module.exports = {};"
    );
}

#[test]
fn add_package_outside_a_project_fails() {
    let dir = tempfile::tempdir().unwrap();

    ontario_frontend_cmd(dir.path(), "true")
        .args(["add-package", "eslint"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("is not an Ontario.ca Frontend project"))
        .stderr(predicates::str::contains("--project-dir"));

    assert!(!dir.path().join(".eslintrc.js").exists());
}

#[test]
fn project_dir_points_elsewhere() {
    let root = tempfile::tempdir().unwrap();
    let project = project_with_eslint_declared();

    ontario_frontend_cmd(root.path(), "false")
        .args(["add-package", "eslint", "--project-dir"])
        .arg(project.path())
        .assert()
        .success();

    assert!(project.path().join(".eslintrc.js").is_file());
    assert!(!root.path().join(".eslintrc.js").exists());
}

#[test]
fn failed_install_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), json!({ "dependencies": { FRAMEWORK: "latest" } }));

    ontario_frontend_cmd(dir.path(), "false")
        .args(["add-package", "eslint"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("Failed to install"))
        .stderr(predicates::str::contains("No configuration files were changed"));

    assert!(!dir.path().join(".eslintrc.js").exists());
}

#[test]
fn unknown_package_is_rejected_by_the_parser() {
    let dir = tempfile::tempdir().unwrap();

    ontario_frontend_cmd(dir.path(), "true")
        .args(["add-package", "stylelint"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("eslint").and(predicates::str::contains("prettier")));
}

#[test]
fn remove_package_with_yes() {
    let project = project_with_eslint_declared();
    fs::write(project.path().join(".eslintrc.js"), "module.exports = {};").unwrap();

    ontario_frontend_cmd(project.path(), "true")
        .args(["remove-package", "eslint", "--yes"])
        .assert()
        .success()
        .stdout(predicates::str::contains("eslint: removed"))
        .stderr(predicates::str::contains(".eslintignore was not found"));

    assert!(!project.path().join(".eslintrc.js").exists());
}

#[test]
fn declining_removal_keeps_everything() {
    let project = project_with_eslint_declared();
    fs::write(project.path().join(".eslintrc.js"), "module.exports = {};").unwrap();

    ontario_frontend_cmd(project.path(), "false")
        .args(["remove-package", "eslint"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("Are you sure you want to remove eslint"))
        .stdout(predicates::str::contains("removed").not());

    assert!(project.path().join(".eslintrc.js").exists());
}

#[test]
fn removing_what_is_not_installed_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), json!({ "dependencies": { FRAMEWORK: "latest" } }));

    ontario_frontend_cmd(dir.path(), "false")
        .args(["remove-package", "prettier", "-y"])
        .assert()
        .success()
        .stdout(predicates::str::contains("prettier: not installed, nothing to do"));
}

#[test]
fn repeated_package_name_is_handled_once() {
    let project = project_with_eslint_declared();

    ontario_frontend_cmd(project.path(), "false")
        .args(["add-package", "eslint", "eslint"])
        .assert()
        .success()
        .stdout(predicates::str::contains("eslint: configuration files added"))
        .stdout(predicates::str::contains("already present").not());
}
