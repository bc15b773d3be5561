use {
    crate::error::{ConfigError, DEFAULT_CONFIG_FILE},
    figment::{
        providers::{Env, Format, Toml},
        Figment,
    },
    serde::{Deserialize, Deserializer, Serialize},
    std::path::{Path, PathBuf},
};

pub const ENV_PREFIX: &str = "ONTARIO_FRONTEND_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_package_manager", deserialize_with = "scalar_string")]
    pub package_manager: String,
    #[serde(default = "default_framework_dependency", deserialize_with = "scalar_string")]
    pub framework_dependency: String,
    #[serde(default = "default_resources_dir", deserialize_with = "scalar_path")]
    pub resources_dir: PathBuf,
    #[serde(default = "default_local_packages_dir", deserialize_with = "scalar_path")]
    pub local_packages_dir: PathBuf,
}

/// Environment values arrive typed, so `ONTARIO_FRONTEND_PACKAGE_MANAGER=true`
/// is a bool by the time it reaches serde. Every key here is text.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(value) => value,
        Scalar::Bool(value) => value.to_string(),
        Scalar::Int(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
    })
}

fn scalar_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
    scalar_string(deserializer).map(PathBuf::from)
}

fn default_package_manager() -> String {
    "npm".to_string()
}

fn default_framework_dependency() -> String {
    "@ongov/ontario-frontend".to_string()
}

fn default_resources_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn default_local_packages_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap_or(Path::new("./"))
        .join("packages")
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            package_manager: default_package_manager(),
            framework_dependency: default_framework_dependency(),
            resources_dir: default_resources_dir(),
            local_packages_dir: default_local_packages_dir(),
        }
    }
}

impl CliConfig {
    pub fn shared_boilerplate_dir(&self) -> PathBuf {
        self.resources_dir.join("boilerplate").join("shared")
    }

    pub fn create_boilerplate_dir(&self) -> PathBuf {
        self.resources_dir.join("boilerplate").join("create-app")
    }

    /// Where the framework itself lives when installing with `--local`.
    pub fn local_framework_dir(&self) -> PathBuf {
        self.local_packages_dir.join("ontario-frontend")
    }
}

/// Loads `config_path` (which must exist) or the optional default file in the
/// working directory, then applies `ONTARIO_FRONTEND_*` overrides.
pub fn load_config(config_path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let file = match config_path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    extract(
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX)),
    )
}

fn extract(figment: Figment) -> Result<CliConfig, ConfigError> {
    figment.extract().map_err(|e| ConfigError::FailedToLoad { err: Box::new(e) })
}
