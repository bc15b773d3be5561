use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RegistryError;

/// Names accepted by the `add-package` and `remove-package` commands.
pub const BUILTIN_PACKAGES: [&str; 2] = ["eslint", "prettier"];

const BUILTIN_DEFINITIONS: [(&str, &str); 2] = [
    (
        "eslint.json",
        include_str!("../resources/packages/eslint.json"),
    ),
    (
        "prettier.json",
        include_str!("../resources/packages/prettier.json"),
    ),
];

/// A configuration file contributed by a package. `source` is relative to the
/// shared boilerplate directory, `destination` to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub warning_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageDefinition {
    packages: Vec<String>,
    config_files: Vec<ConfigFile>,
    #[serde(default)]
    local: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub dependencies: Vec<String>,
    pub config_files: Vec<ConfigFile>,
    /// Dependency name -> directory under the local packages root.
    pub local_dirs: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<String>,
        config_files: Vec<ConfigFile>,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies,
            config_files,
            local_dirs: BTreeMap::new(),
        }
    }

    /// What to hand the package manager for each dependency. With a local
    /// root, dependencies that have a local directory install from that path.
    pub fn install_specifiers(&self, dependencies: &[String], local_root: Option<&Path>) -> Vec<String> {
        dependencies
            .iter()
            .map(|dependency| {
                match local_root.zip(self.local_dirs.get(dependency)) {
                    Some((root, dir)) => root.join(dir).to_string_lossy().to_string(),
                    None => dependency.clone(),
                }
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct Registry {
    packages: Vec<PackageDescriptor>,
}

impl Registry {
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_definitions(&BUILTIN_DEFINITIONS)
    }

    pub fn from_definitions(definitions: &[(&'static str, &str)]) -> Result<Self, RegistryError> {
        let mut packages = Vec::new();
        for (definition, contents) in definitions {
            let parsed: BTreeMap<String, PackageDefinition> = serde_json::from_str(contents)
                .map_err(|err| RegistryError::InvalidDefinition {
                    definition: *definition,
                    err,
                })?;
            packages.extend(parsed.into_iter().map(|(name, def)| PackageDescriptor {
                name,
                dependencies: def.packages,
                config_files: def.config_files,
                local_dirs: def.local,
            }));
        }
        Self::new(packages)
    }

    pub fn new(packages: Vec<PackageDescriptor>) -> Result<Self, RegistryError> {
        for (i, package) in packages.iter().enumerate() {
            if packages[..i].iter().any(|p| p.name == package.name) {
                return Err(RegistryError::DuplicatePackage(package.name.clone()));
            }
        }
        Ok(Self { packages })
    }

    pub fn lookup(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }
}
