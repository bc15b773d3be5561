use std::fs;

use serde_json::Value;

use crate::{ontario_frontend_cmd, FRAMEWORK};

#[test]
fn create_scaffolds_a_project() {
    let root = tempfile::tempdir().unwrap();

    ontario_frontend_cmd(root.path(), "true")
        .args(["create", "my-site", "--en-page", "home", "--fr-page", "accueil", "--prettier"])
        .assert()
        .success()
        .stdout(predicates::str::contains("npm run serve"))
        .stdout(predicates::str::contains("npm run build"));

    let project = root.path().join("my-site");
    let manifest: Value =
        serde_json::from_slice(&fs::read(project.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "my-site");
    assert_eq!(manifest["dependencies"][FRAMEWORK], "latest");
    assert_eq!(manifest["devDependencies"]["prettier"], "latest");
    assert!(project.join("src/home.njk").is_file());
    assert!(project.join("src/accueil.njk").is_file());
    assert!(project.join(".prettierrc.js").is_file());
    assert!(!project.join(".eslintrc.js").exists());

    // The new project is immediately a valid target for add-package.
    ontario_frontend_cmd(&project, "true")
        .args(["add-package", "eslint"])
        .assert()
        .success();
    assert!(project.join(".eslintrc.js").is_file());
}

#[test]
fn create_rejects_an_existing_directory() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("my-site")).unwrap();

    ontario_frontend_cmd(root.path(), "true")
        .args(["create", "my-site"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("already exists"));
}

#[test]
fn create_rejects_bad_page_names() {
    let root = tempfile::tempdir().unwrap();

    ontario_frontend_cmd(root.path(), "true")
        .args(["create", "my-site", "--en-page", "Home Page"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("Invalid English page name"));

    assert!(!root.path().join("my-site").exists());
}

#[test]
fn failed_install_is_reported_for_the_project() {
    let root = tempfile::tempdir().unwrap();

    ontario_frontend_cmd(root.path(), "false")
        .args(["create", "my-site"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains(
            "Failed to install dependencies for project 'my-site'",
        ));

    assert!(root.path().join("my-site/package.json").is_file());
}
