use figment::Error as FigmentError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use std::path::PathBuf;
use tera::Error as TeraError;
use thiserror::Error as DeriveError;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "ontario-frontend.toml";
pub(crate) const DEVELOPER_SITE_URL: &str = "https://developer.ontario.ca";

#[derive(Debug, DeriveError)]
pub enum PackageError {
    #[error("Invalid package option '{name}'. Available packages are: {}", available.join(", "))]
    InvalidPackage { name: String, available: Vec<String> },

    #[error("'{}' is not an Ontario.ca Frontend project: {reason}", dir.display())]
    NotAScaffoldedProject { dir: PathBuf, reason: String },

    #[error("Failed to install {} for package '{package}': {err}", dependencies.join(", "))]
    InstallationFailure {
        package: String,
        dependencies: Vec<String>,
        err: ProcessError,
    },

    #[error("Failed to uninstall {} for package '{package}': {err}", dependencies.join(", "))]
    UninstallationFailure {
        package: String,
        dependencies: Vec<String>,
        err: ProcessError,
    },

    #[error("Failed to transfer configuration files for package '{package}': {err}")]
    FileTransferFailure { package: String, err: TransferError },
}

impl PackageError {
    pub fn context(&self) -> Option<String> {
        match self {
            Self::InvalidPackage { .. } => Some(format!(
                "Tip: Run 'ontario-frontend add-package --help' to list the packages that can be added.\nFor more information, visit our developer site at {}",
                DEVELOPER_SITE_URL
            )),
            Self::NotAScaffoldedProject { .. } => Some(
"Ensure you are performing this command within your Ontario.ca Frontend project, ie. the directory containing a package.json that lists the framework as a dependency.
Tip: Use '--project-dir' to point at a project elsewhere.".to_string(),
            ),
            Self::InstallationFailure { .. } | Self::UninstallationFailure { .. } => Some(
"The package manager did not complete successfully. Its output above usually names the cause, eg. a network problem or a version conflict.
No configuration files were changed.".to_string(),
            ),
            Self::FileTransferFailure { .. } => Some(
"Configuration files that were transferred before the failure were kept. Check the permissions of the project directory and run the command again.".to_string(),
            ),
        }
    }
}

#[derive(Debug, DeriveError)]
pub enum ProcessError {
    #[error("Failed to run '{command}': {err}")]
    Spawn { command: String, err: IoError },

    #[error("Command '{command}' exited with {}", code.map_or_else(|| "no exit code".to_string(), |code| format!("code {code}")))]
    NonZeroExit { command: String, code: Option<i32> },
}

#[derive(Debug, DeriveError)]
pub enum TransferError {
    #[error("Failed to copy '{}' to '{}': {err}", source_path.display(), destination.display())]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        err: IoError,
    },

    #[error("Failed to remove '{}': {err}", path.display())]
    Remove { path: PathBuf, err: IoError },

    #[error("Failed to write '{}': {err}", path.display())]
    Write { path: PathBuf, err: IoError },

    #[error("Failed to create directory '{}': {err}", path.display())]
    CreateDirectory { path: PathBuf, err: IoError },

    #[error("Failed to walk '{}': {err}", root.display())]
    Walk { root: PathBuf, err: walkdir::Error },
}

#[derive(Debug, DeriveError)]
pub enum ManifestError {
    #[error("Failed to read '{}': {err}", path.display())]
    FailedToRead { path: PathBuf, err: IoError },

    #[error("Failed to parse '{}': {err}", path.display())]
    FailedDeserialization { path: PathBuf, err: SerdeJsonError },
}

#[derive(Debug, DeriveError)]
pub enum ScaffoldError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidName {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Failed to read the working directory: {0}")]
    WorkingDirectory(IoError),

    #[error("Project directory '{}' already exists", .0.display())]
    ProjectExists(PathBuf),

    #[error("No package definition named '{0}'")]
    UnknownPackage(String),

    #[error("Failed to render template '{template}': {err}")]
    TemplateRender { template: String, err: TeraError },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Failed to install dependencies for project '{project}': {err}")]
    Installation { project: String, err: ProcessError },
}

impl ScaffoldError {
    pub fn context(&self) -> Option<String> {
        match self {
            Self::InvalidName { .. } => Some(
"Names may only contain lowercase letters, numbers, hyphens and underscores, and cannot begin with a dot or an underscore.".to_string(),
            ),
            Self::ProjectExists(_) => Some(
"Choose another project name, or pass '--dir' to create the project somewhere else.".to_string(),
            ),
            Self::Installation { .. } => Some(
"The project files were generated. Fix the problem reported above, then run 'npm install' inside the project directory.".to_string(),
            ),
            Self::TemplateRender { .. } | Self::Transfer(_) => Some(format!(
                "Check that the resources directory is complete and readable.\nFor more information, visit our developer site at {}",
                DEVELOPER_SITE_URL
            )),
            Self::WorkingDirectory(_) | Self::UnknownPackage(_) => None,
        }
    }
}

#[derive(Debug, DeriveError)]
pub enum ConfigError {
    #[error("The provided config path '{}' does not exist", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to load config: {err}")]
    FailedToLoad { err: Box<FigmentError> },
}

impl ConfigError {
    pub fn context(&self) -> String {
        match self {
            Self::ConfigNotFound { .. } => "The config path was invalid, please double check that the path is correct and try again.\nTip: Try using an absolute path.".to_string(),
            Self::FailedToLoad { .. } => format!(
"The config exists, but there was a problem parsing it. Settings are read from '{}' in the working directory, or the file passed with '--config', and then from 'ONTARIO_FRONTEND_*' environment variables.
Valid keys are 'package_manager', 'framework_dependency', 'resources_dir' and 'local_packages_dir'.",
                DEFAULT_CONFIG_FILE
            ),
        }
    }
}

#[derive(Debug, DeriveError)]
pub enum RegistryError {
    #[error("Failed to parse package definitions '{definition}': {err}")]
    InvalidDefinition {
        definition: &'static str,
        err: SerdeJsonError,
    },

    #[error("Package '{0}' is defined more than once")]
    DuplicatePackage(String),
}
