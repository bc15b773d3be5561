use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use crate::registry::BUILTIN_PACKAGES;

#[derive(Parser, Debug)]
#[command(version, about = "Scaffold and extend Ontario.ca Frontend projects")]
pub struct OntarioFrontendCli {
    /// Path to a TOML config file. Defaults to ./ontario-frontend.toml when present
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,
    /// Log every step, including the commands being run
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Ontario.ca Frontend project
    Create {
        #[arg(value_name = "PROJECT_NAME")]
        project_name: String,
        /// Name of the English home page
        #[arg(long, default_value = "home")]
        en_page: String,
        /// Name of the French home page
        #[arg(long, default_value = "accueil")]
        fr_page: String,
        /// Add ESLint and its configuration
        #[arg(long)]
        eslint: bool,
        /// Add Prettier and its configuration
        #[arg(long)]
        prettier: bool,
        /// Depend on the framework from the local packages directory
        #[arg(long)]
        local: bool,
        /// Where to create the project. Defaults to ./<project-name>
        #[arg(short = 'd', long)]
        dir: Option<PathBuf>,
    },
    /// Add optional packages and their configuration to a project
    AddPackage {
        #[arg(
            value_name = "PACKAGE",
            required = true,
            value_parser = PossibleValuesParser::new(BUILTIN_PACKAGES)
        )]
        packages: Vec<String>,
        /// Install from the local packages directory
        #[arg(long)]
        local: bool,
        #[arg(short = 'p', long)]
        project_dir: Option<PathBuf>,
    },
    /// Remove optional packages and their configuration from a project
    RemovePackage {
        #[arg(
            value_name = "PACKAGE",
            required = true,
            value_parser = PossibleValuesParser::new(BUILTIN_PACKAGES)
        )]
        packages: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        auto_confirm: bool,
        #[arg(short = 'p', long)]
        project_dir: Option<PathBuf>,
    },
}
