use std::io;
use std::path::Path;
use std::process::ExitCode;

use atty::Stream;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ontario_frontend_cli::command::{Command, OntarioFrontendCli};
use ontario_frontend_cli::common::confirm_removal;
use ontario_frontend_cli::config::{load_config, CliConfig};
use ontario_frontend_cli::create::{create_project, print_next_steps, CreateOptions};
use ontario_frontend_cli::error::{ConfigError, PackageError, ScaffoldError};
use ontario_frontend_cli::installer::SubprocessPackageManager;
use ontario_frontend_cli::orchestrator::{
    AddOutcome, Change, Orchestrator, PackageRemoval, RemoveOutcome,
};
use ontario_frontend_cli::project::resolve_project_dir;
use ontario_frontend_cli::registry::Registry;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = OntarioFrontendCli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if let Some(tip) = tip(&err) {
                error!("{tip}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(atty::is(Stream::Stderr))
        .with_target(false)
        .without_time()
        .init();
}

fn tip(err: &anyhow::Error) -> Option<String> {
    if let Some(err) = err.downcast_ref::<PackageError>() {
        return err.context();
    }
    if let Some(err) = err.downcast_ref::<ScaffoldError>() {
        return err.context();
    }
    err.downcast_ref::<ConfigError>().map(ConfigError::context)
}

async fn run(cli: OntarioFrontendCli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let registry = Registry::builtin()?;
    let package_manager = SubprocessPackageManager::new(&config.package_manager);

    match cli.command {
        Command::Create {
            project_name,
            en_page,
            fr_page,
            eslint,
            prettier,
            local,
            dir,
        } => {
            let options = CreateOptions {
                project_name,
                en_page,
                fr_page,
                eslint,
                prettier,
                local,
                dir,
            };
            let project_path =
                create_project(options, &config, &registry, &package_manager).await?;
            print_next_steps(&project_path);
        }
        Command::AddPackage {
            packages,
            local,
            project_dir,
        } => {
            let mut orchestrator =
                orchestrator(registry, package_manager, &config, project_dir.as_deref())?;
            if local {
                orchestrator = orchestrator.with_local_packages(&config.local_packages_dir);
            }
            for outcome in orchestrator.add_packages(&packages).await? {
                report_addition(&outcome);
            }
        }
        Command::RemovePackage {
            packages,
            auto_confirm,
            project_dir,
        } => {
            let orchestrator =
                orchestrator(registry, package_manager, &config, project_dir.as_deref())?;
            let outcome = orchestrator
                .remove_packages(&packages, |names| {
                    auto_confirm || confirm_removal(names, &mut io::stdin().lock())
                })
                .await?;
            if let RemoveOutcome::Removed(removals) = outcome {
                for removal in &removals {
                    report_removal(removal);
                }
            }
        }
    }
    Ok(())
}

fn orchestrator(
    registry: Registry,
    package_manager: SubprocessPackageManager,
    config: &CliConfig,
    project_dir: Option<&Path>,
) -> anyhow::Result<Orchestrator<SubprocessPackageManager>> {
    Ok(Orchestrator::new(
        registry,
        package_manager,
        resolve_project_dir(project_dir)?,
        config.shared_boilerplate_dir(),
        config.framework_dependency.clone(),
    ))
}

fn report_addition(outcome: &AddOutcome) {
    for dependency in &outcome.already_declared {
        info!("{} is already installed.", dependency);
    }
    for warning in outcome.warnings() {
        warn!(
            "{} already exists. {}",
            warning.destination.display(),
            warning.message
        );
    }
    let summary = match outcome.change() {
        Change::DependenciesAndConfig => "dependencies and configuration files added",
        Change::DependenciesOnly => "dependencies added",
        Change::ConfigOnly => "configuration files added",
        Change::Nothing => "already present, nothing to do",
    };
    println!("{}: {}", outcome.package, summary);
}

fn report_removal(removal: &PackageRemoval) {
    for dependency in &removal.not_declared {
        info!("{} is not installed, skipping.", dependency);
    }
    for missing in &removal.missing_files {
        warn!(
            "{} was not found, skipping.",
            missing.destination.display()
        );
    }
    if removal.was_installed() {
        println!("{}: removed", removal.package);
    } else {
        println!("{}: not installed, nothing to do", removal.package);
    }
}
