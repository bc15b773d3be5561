use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ManifestError;
use crate::registry::ConfigFile;

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` the CLI reads. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl ProjectManifest {
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

pub async fn read_manifest(dir: &Path) -> Result<ProjectManifest, ManifestError> {
    let path = dir.join(MANIFEST_FILE);
    let contents = tokio::fs::read(&path)
        .await
        .map_err(|err| ManifestError::FailedToRead {
            path: path.clone(),
            err,
        })?;
    serde_json::from_slice(&contents)
        .map_err(|err| ManifestError::FailedDeserialization { path, err })
}

pub async fn manifest_exists(dir: &Path) -> bool {
    tokio::fs::metadata(dir.join(MANIFEST_FILE))
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Reads the manifest and checks it declares `framework`. The error is the
/// user-facing reason the directory does not qualify.
async fn check_scaffolded_project(
    dir: &Path,
    framework: &str,
) -> Result<ProjectManifest, String> {
    if !manifest_exists(dir).await {
        return Err(format!("no {MANIFEST_FILE} found"));
    }
    let manifest = read_manifest(dir).await.map_err(|err| err.to_string())?;
    if !manifest.declares(framework) {
        return Err(format!(
            "no '{framework}' dependency found inside of {MANIFEST_FILE}"
        ));
    }
    Ok(manifest)
}

pub async fn is_scaffolded_project(dir: &Path, framework: &str) -> bool {
    match check_scaffolded_project(dir, framework).await {
        Ok(_) => true,
        Err(reason) => {
            warn!("{} is not an Ontario.ca Frontend project: {}", dir.display(), reason);
            false
        }
    }
}

pub async fn is_dependency_declared(dir: &Path, name: &str) -> bool {
    if !manifest_exists(dir).await {
        return false;
    }
    match read_manifest(dir).await {
        Ok(manifest) => manifest.declares(name),
        Err(err) => {
            warn!("{err}");
            false
        }
    }
}

pub fn existing_config_files<'a>(root: &Path, files: &'a [ConfigFile]) -> Vec<&'a ConfigFile> {
    files
        .iter()
        .filter(|file| {
            let exists = root.join(&file.destination).exists();
            debug!("{} exists: {}", file.destination.display(), exists);
            exists
        })
        .collect()
}

pub fn any_config_file_exists(root: &Path, files: &[ConfigFile]) -> bool {
    !existing_config_files(root, files).is_empty()
}

pub fn resolve_project_dir(dir: Option<&Path>) -> std::io::Result<PathBuf> {
    let pwd = std::env::current_dir()?;
    Ok(match dir {
        Some(dir) if dir.is_relative() => pwd.join(dir),
        Some(dir) => dir.to_path_buf(),
        None => pwd,
    })
}
