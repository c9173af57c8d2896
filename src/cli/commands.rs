use crate::archive;
use crate::cli::options::{Commands, DeployArgs, OutputFormat, PackArgs, StaticDeployCli, TargetArgs};
use crate::cli::output::{print_deployment_report, print_hosts};
use crate::deploy::Deployer;
use crate::inventory::Inventory;
use crate::transport::HostTransport;
use crate::types::{DeployOptions, DeploymentReport};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

/// Dispatch a parsed command line
pub async fn run(cli: StaticDeployCli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            archive,
            target,
            deploy,
            format,
        } => {
            let inventory = target.resolve().context("Failed to resolve hosts")?;
            let report = run_deploy(&archive, inventory, &target, &deploy, format).await?;
            print_deployment_report(&report, format)?;
        }
        Commands::Pack { pack } => {
            let path = run_pack(&pack, archive::ARCHIVE_ROOT)?;
            println!("{}", path.display());
        }
        Commands::Release {
            pack,
            target,
            deploy,
            format,
        } => {
            let inventory = target.resolve().context("Failed to resolve hosts")?;
            // the archive root has to be the directory the deploy promotes
            let archive = run_pack(&pack, &inventory.layout.nested_dir)?;
            let report = run_deploy(&archive, inventory, &target, &deploy, format).await?;
            print_deployment_report(&report, format)?;
        }
        Commands::Hosts { target, format } => {
            let inventory = target.resolve().context("Failed to resolve hosts")?;
            print_hosts(&inventory, format)?;
        }
    }

    Ok(())
}

pub async fn run_deploy(
    archive: &Path,
    inventory: Inventory,
    target: &TargetArgs,
    deploy: &DeployArgs,
    format: OutputFormat,
) -> Result<DeploymentReport> {
    let transport = HostTransport::new(target.ssh_transport());

    let deployer = Deployer::new(inventory.hosts, transport)
        .with_layout(inventory.layout)
        .with_options(DeployOptions::from(deploy))
        .with_announce(format == OutputFormat::Text);

    deployer
        .deploy(archive)
        .await
        .with_context(|| format!("Deployment of {} failed", archive.display()))
}

pub fn run_pack(args: &PackArgs, root: &str) -> Result<PathBuf> {
    let timestamp = Local::now().naive_local();
    let path = archive::pack_directory(&args.source, &args.output, root, &timestamp)
        .with_context(|| format!("Failed to pack {}", args.source.display()))?;
    info!("Packed {}", path.display());
    Ok(path)
}
