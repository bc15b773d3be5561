//! Add/remove workflows for optional packages.
//!
//! Every invocation re-reads the project manifest; nothing is cached between
//! runs. Dependency probes for a batch run concurrently, the install, copy,
//! uninstall and remove steps run one package at a time in the order given.

use std::path::PathBuf;

use futures::future::join_all;
use tracing::{debug, info};

use crate::error::PackageError;
use crate::installer::PackageManager;
use crate::project::{
    any_config_file_exists, existing_config_files, is_dependency_declared, is_scaffolded_project,
    MANIFEST_FILE,
};
use crate::registry::{ConfigFile, PackageDescriptor, Registry};
use crate::transfer::{copy_config_files, remove_config_files};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub destination: PathBuf,
    pub message: String,
}

impl ConfigWarning {
    fn new(file: &ConfigFile) -> Self {
        Self {
            destination: file.destination.clone(),
            message: file.warning_message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigStep {
    /// Destinations written, relative to the project root.
    Copied(Vec<PathBuf>),
    /// At least one destination already existed, so nothing was written.
    Skipped(Vec<ConfigWarning>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    DependenciesAndConfig,
    DependenciesOnly,
    ConfigOnly,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub package: String,
    pub installed: Vec<String>,
    pub already_declared: Vec<String>,
    pub config: ConfigStep,
}

impl AddOutcome {
    pub fn change(&self) -> Change {
        let config = matches!(&self.config, ConfigStep::Copied(files) if !files.is_empty());
        match (!self.installed.is_empty(), config) {
            (true, true) => Change::DependenciesAndConfig,
            (true, false) => Change::DependenciesOnly,
            (false, true) => Change::ConfigOnly,
            (false, false) => Change::Nothing,
        }
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        match &self.config {
            ConfigStep::Skipped(warnings) => warnings,
            ConfigStep::Copied(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRemoval {
    pub package: String,
    pub uninstalled: Vec<String>,
    pub not_declared: Vec<String>,
    pub removed_files: Vec<PathBuf>,
    /// Config files that were expected but not found.
    pub missing_files: Vec<ConfigWarning>,
}

impl PackageRemoval {
    pub fn was_installed(&self) -> bool {
        !self.uninstalled.is_empty() || !self.removed_files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Declined,
    Removed(Vec<PackageRemoval>),
}

pub struct Orchestrator<P> {
    registry: Registry,
    package_manager: P,
    project_dir: PathBuf,
    shared_dir: PathBuf,
    framework_dependency: String,
    local_packages_dir: Option<PathBuf>,
}

impl<P: PackageManager> Orchestrator<P> {
    pub fn new(
        registry: Registry,
        package_manager: P,
        project_dir: impl Into<PathBuf>,
        shared_dir: impl Into<PathBuf>,
        framework_dependency: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            package_manager,
            project_dir: project_dir.into(),
            shared_dir: shared_dir.into(),
            framework_dependency: framework_dependency.into(),
            local_packages_dir: None,
        }
    }

    /// Install registry dependencies from local directories under `dir`.
    pub fn with_local_packages(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_packages_dir = Some(dir.into());
        self
    }

    pub fn package_manager(&self) -> &P {
        &self.package_manager
    }

    pub async fn add_package(&self, name: &str) -> Result<AddOutcome, PackageError> {
        let mut outcomes = self.add_packages(&[name.to_string()]).await?;
        Ok(outcomes.remove(0))
    }

    pub async fn add_packages(&self, names: &[String]) -> Result<Vec<AddOutcome>, PackageError> {
        let packages = self.resolve(names)?;
        self.ensure_project().await?;
        let probes = self.probe(&packages).await;

        let mut outcomes = Vec::with_capacity(packages.len());
        for (package, declared) in packages.into_iter().zip(probes) {
            info!("Installation process for {} started.", package.name);
            let (already_declared, missing) = partition(&package.dependencies, &declared);

            if missing.is_empty() {
                debug!("All dependencies of {} are already declared", package.name);
            } else {
                let specifiers =
                    package.install_specifiers(&missing, self.local_packages_dir.as_deref());
                self.package_manager
                    .install(&specifiers, true, &self.project_dir)
                    .await
                    .map_err(|err| PackageError::InstallationFailure {
                        package: package.name.clone(),
                        dependencies: missing.clone(),
                        err,
                    })?;
            }

            let existing = existing_config_files(&self.project_dir, &package.config_files);
            let config = if existing.is_empty() {
                let copied = copy_config_files(
                    &self.shared_dir,
                    &package.config_files,
                    &self.project_dir,
                )
                .map_err(|err| PackageError::FileTransferFailure {
                    package: package.name.clone(),
                    err,
                })?;
                ConfigStep::Copied(copied)
            } else {
                ConfigStep::Skipped(existing.into_iter().map(ConfigWarning::new).collect())
            };

            info!("Installation process for {} completed.", package.name);
            outcomes.push(AddOutcome {
                package: package.name.clone(),
                installed: missing,
                already_declared,
                config,
            });
        }
        Ok(outcomes)
    }

    /// Removes a package after `confirm` agrees. Declining touches nothing.
    pub async fn remove_package(
        &self,
        name: &str,
        confirm: impl FnOnce(&[String]) -> bool,
    ) -> Result<RemoveOutcome, PackageError> {
        self.remove_packages(&[name.to_string()], confirm).await
    }

    pub async fn remove_packages(
        &self,
        names: &[String],
        confirm: impl FnOnce(&[String]) -> bool,
    ) -> Result<RemoveOutcome, PackageError> {
        if !confirm(names) {
            info!("Exiting the package removal process.");
            return Ok(RemoveOutcome::Declined);
        }
        let packages = self.resolve(names)?;
        self.ensure_project().await?;
        let probes = self.probe(&packages).await;

        let mut removals = Vec::with_capacity(packages.len());
        for (package, declared) in packages.into_iter().zip(probes) {
            info!("Removal process for {} started.", package.name);
            let (present, not_declared) = partition(&package.dependencies, &declared);

            if present.is_empty() {
                debug!("No dependencies of {} are declared", package.name);
            } else {
                self.package_manager
                    .uninstall(&present, true, &self.project_dir)
                    .await
                    .map_err(|err| PackageError::UninstallationFailure {
                        package: package.name.clone(),
                        dependencies: present.clone(),
                        err,
                    })?;
            }

            let existing = existing_config_files(&self.project_dir, &package.config_files);
            let missing_files = package
                .config_files
                .iter()
                .filter(|file| !existing.contains(file))
                .map(ConfigWarning::new)
                .collect();
            let removed_files = if any_config_file_exists(&self.project_dir, &package.config_files)
            {
                remove_config_files(&package.config_files, &self.project_dir).map_err(|err| {
                    PackageError::FileTransferFailure {
                        package: package.name.clone(),
                        err,
                    }
                })?
            } else {
                debug!("No configuration files of {} are present", package.name);
                Vec::new()
            };

            info!("Removal process for {} completed.", package.name);
            removals.push(PackageRemoval {
                package: package.name.clone(),
                uninstalled: present,
                not_declared,
                removed_files,
                missing_files,
            });
        }
        Ok(RemoveOutcome::Removed(removals))
    }

    /// Looks up every name before anything runs. Repeated names collapse onto
    /// their first occurrence.
    fn resolve(&self, names: &[String]) -> Result<Vec<&PackageDescriptor>, PackageError> {
        let mut packages: Vec<&PackageDescriptor> = Vec::with_capacity(names.len());
        for name in names {
            let package =
                self.registry
                    .lookup(name)
                    .ok_or_else(|| PackageError::InvalidPackage {
                        name: name.clone(),
                        available: self.registry.names(),
                    })?;
            if packages.iter().any(|seen| seen.name == package.name) {
                debug!("{} was named more than once", name);
                continue;
            }
            packages.push(package);
        }
        Ok(packages)
    }

    async fn ensure_project(&self) -> Result<(), PackageError> {
        if is_scaffolded_project(&self.project_dir, &self.framework_dependency).await {
            return Ok(());
        }
        Err(PackageError::NotAScaffoldedProject {
            dir: self.project_dir.clone(),
            reason: format!(
                "no {MANIFEST_FILE} declaring '{}' was found",
                self.framework_dependency
            ),
        })
    }

    /// Which dependencies of each package are declared, probed concurrently.
    async fn probe(&self, packages: &[&PackageDescriptor]) -> Vec<Vec<bool>> {
        join_all(packages.iter().map(|package| {
            join_all(
                package
                    .dependencies
                    .iter()
                    .map(|dependency| is_dependency_declared(&self.project_dir, dependency)),
            )
        }))
        .await
    }
}

/// Splits `dependencies` into (declared, undeclared), keeping order.
fn partition(dependencies: &[String], declared: &[bool]) -> (Vec<String>, Vec<String>) {
    let (yes, no): (Vec<_>, Vec<_>) = dependencies
        .iter()
        .zip(declared)
        .partition(|(_, declared)| **declared);
    (
        yes.into_iter().map(|(name, _)| name.clone()).collect(),
        no.into_iter().map(|(name, _)| name.clone()).collect(),
    )
}
