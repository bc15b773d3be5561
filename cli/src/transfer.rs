use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::TransferError;
use crate::registry::ConfigFile;

pub fn ensure_directory(path: &Path) -> Result<(), TransferError> {
    fs::create_dir_all(path).map_err(|err| TransferError::CreateDirectory {
        path: path.to_path_buf(),
        err,
    })?;
    debug!("Directory ensured: {}", path.display());
    Ok(())
}

pub fn write_file(path: &Path, contents: &str) -> Result<(), TransferError> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    fs::write(path, contents).map_err(|err| TransferError::Write {
        path: path.to_path_buf(),
        err,
    })?;
    debug!("File written: {}", path.display());
    Ok(())
}

pub fn copy_file(source: &Path, destination: &Path) -> Result<(), TransferError> {
    if let Some(parent) = destination.parent() {
        ensure_directory(parent)?;
    }
    fs::copy(source, destination).map_err(|err| TransferError::Copy {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        err,
    })?;
    debug!("Copied {} to {}", source.display(), destination.display());
    Ok(())
}

/// Copies every file under `source` into `destination`, keeping the relative
/// layout. Existing files are overwritten.
pub fn copy_dir_all(source: &Path, destination: &Path) -> Result<usize, TransferError> {
    let mut copied = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| TransferError::Walk {
            root: source.to_path_buf(),
            err,
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            ensure_directory(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copies each config file from `shared_dir` into `target_root`. Stops at the
/// first failure; files copied before it stay in place.
pub fn copy_config_files(
    shared_dir: &Path,
    files: &[ConfigFile],
    target_root: &Path,
) -> Result<Vec<PathBuf>, TransferError> {
    let mut copied = Vec::with_capacity(files.len());
    for file in files {
        copy_file(
            &shared_dir.join(&file.source),
            &target_root.join(&file.destination),
        )?;
        copied.push(file.destination.clone());
    }
    Ok(copied)
}

/// Removes each config file present under `target_root`, skipping missing
/// ones. Returns the destinations that were removed.
pub fn remove_config_files(
    files: &[ConfigFile],
    target_root: &Path,
) -> Result<Vec<PathBuf>, TransferError> {
    let mut removed = Vec::new();
    for file in files {
        let path = target_root.join(&file.destination);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                removed.push(file.destination.clone());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} already absent", path.display());
            }
            Err(err) => return Err(TransferError::Remove { path, err }),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lint_files() -> Vec<ConfigFile> {
        vec![
            ConfigFile {
                source: "lint/.lintrc".into(),
                destination: ".lintrc".into(),
                warning_message: "lint config exists".into(),
            },
            ConfigFile {
                source: "lint/ignore".into(),
                destination: "config/.lintignore".into(),
                warning_message: "lint ignore exists".into(),
            },
        ]
    }

    fn shared_dir() -> tempfile::TempDir {
        let shared = tempfile::tempdir().unwrap();
        fs::create_dir_all(shared.path().join("lint")).unwrap();
        fs::write(shared.path().join("lint/.lintrc"), "{ \"rules\": {} }").unwrap();
        fs::write(shared.path().join("lint/ignore"), "dist/").unwrap();
        shared
    }

    #[test]
    fn copy_creates_intermediate_directories() {
        let shared = shared_dir();
        let project = tempfile::tempdir().unwrap();

        let copied = copy_config_files(shared.path(), &lint_files(), project.path()).unwrap();

        assert_eq!(copied.len(), 2);
        assert_eq!(
            fs::read_to_string(project.path().join("config/.lintignore")).unwrap(),
            "dist/"
        );
    }

    #[test]
    fn copy_failure_keeps_earlier_files() {
        let shared = shared_dir();
        fs::remove_file(shared.path().join("lint/ignore")).unwrap();
        let project = tempfile::tempdir().unwrap();

        let err = copy_config_files(shared.path(), &lint_files(), project.path()).unwrap_err();

        assert!(matches!(err, TransferError::Copy { .. }));
        assert!(project.path().join(".lintrc").exists());
        assert!(!project.path().join("config/.lintignore").exists());
    }

    #[test]
    fn remove_skips_missing_files() {
        let project = tempfile::tempdir().unwrap();
        fs::write(project.path().join(".lintrc"), "{}").unwrap();

        let removed = remove_config_files(&lint_files(), project.path()).unwrap();
        assert_eq!(removed, vec![PathBuf::from(".lintrc")]);
        assert!(!project.path().join(".lintrc").exists());

        let removed = remove_config_files(&lint_files(), project.path()).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn copy_dir_all_mirrors_the_tree() {
        let source = tempfile::tempdir().unwrap();
        fs::create_dir_all(source.path().join("src/assets/js")).unwrap();
        fs::write(source.path().join("src/assets/js/script.js"), "// js").unwrap();
        fs::write(source.path().join(".gitignore"), "node_modules/").unwrap();
        let destination = tempfile::tempdir().unwrap();

        let copied = copy_dir_all(source.path(), destination.path()).unwrap();

        assert_eq!(copied, 2);
        assert!(destination.path().join("src/assets/js/script.js").is_file());
        assert!(destination.path().join(".gitignore").is_file());
    }

    #[test]
    fn write_file_creates_parents() {
        let project = tempfile::tempdir().unwrap();
        let path = project.path().join("src/_data/globals.js");
        write_file(&path, "module.exports = {};").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "module.exports = {};");
    }
}
