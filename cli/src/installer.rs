use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::ProcessError;

/// The host package manager. Every call blocks until the child exits.
#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn install(
        &self,
        dependencies: &[String],
        save_dev: bool,
        cwd: &Path,
    ) -> Result<(), ProcessError>;

    async fn uninstall(
        &self,
        dependencies: &[String],
        save_dev: bool,
        cwd: &Path,
    ) -> Result<(), ProcessError>;

    /// Installs everything the manifest in `cwd` lists.
    async fn install_all(&self, cwd: &Path) -> Result<(), ProcessError>;
}

/// Shells out to `<program> install|uninstall ...` with the terminal's stdio.
pub struct SubprocessPackageManager {
    program: String,
}

impl SubprocessPackageManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: Vec<&str>, cwd: &Path) -> Result<(), ProcessError> {
        let command = std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Running '{}' in {}", command, cwd.display());
        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| ProcessError::Spawn {
                command: command.clone(),
                err,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::NonZeroExit {
                command,
                code: status.code(),
            })
        }
    }
}

fn dependency_args<'a>(
    subcommand: &'a str,
    dependencies: &'a [String],
    save_dev: bool,
) -> Vec<&'a str> {
    let mut args = vec![subcommand];
    if save_dev {
        args.push("--save-dev");
    }
    args.extend(dependencies.iter().map(String::as_str));
    args
}

#[async_trait]
impl PackageManager for SubprocessPackageManager {
    async fn install(
        &self,
        dependencies: &[String],
        save_dev: bool,
        cwd: &Path,
    ) -> Result<(), ProcessError> {
        if dependencies.is_empty() {
            return Ok(());
        }
        self.run(dependency_args("install", dependencies, save_dev), cwd)
            .await?;
        for dependency in dependencies {
            info!("{} successfully installed.", dependency);
        }
        Ok(())
    }

    async fn uninstall(
        &self,
        dependencies: &[String],
        save_dev: bool,
        cwd: &Path,
    ) -> Result<(), ProcessError> {
        if dependencies.is_empty() {
            return Ok(());
        }
        self.run(dependency_args("uninstall", dependencies, save_dev), cwd)
            .await?;
        for dependency in dependencies {
            info!("{} successfully uninstalled.", dependency);
        }
        Ok(())
    }

    async fn install_all(&self, cwd: &Path) -> Result<(), ProcessError> {
        info!("Installing all dependencies. This may take a minute.");
        self.run(vec!["install"], cwd).await
    }
}
