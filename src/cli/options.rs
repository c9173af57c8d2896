use crate::inventory::{Inventory, InventoryError};
use crate::transport::SshTransport;
use crate::types::{ConnectionMethod, DeployOptions};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Main static-deploy CLI interface
#[derive(Parser)]
#[command(name = "static-deploy")]
#[command(about = "Ship packed web_static releases to web servers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct StaticDeployCli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy an existing archive to the target hosts
    Deploy {
        /// Path to the .tgz archive
        archive: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        deploy: DeployArgs,

        /// Output format for the deployment report
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Pack a web_static directory into versions/web_static_<timestamp>.tgz
    Pack {
        #[command(flatten)]
        pack: PackArgs,
    },

    /// Pack a fresh archive and deploy it
    Release {
        #[command(flatten)]
        pack: PackArgs,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        deploy: DeployArgs,

        /// Output format for the deployment report
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the hosts a deployment would target
    Hosts {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Inventory file (YAML or JSON) with hosts and layout
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,

    /// Target host address; repeat to deploy to several hosts
    #[arg(long = "host")]
    pub hosts: Vec<String>,

    /// SSH user for all ssh hosts
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH port for all ssh hosts
    #[arg(long)]
    pub port: Option<u16>,

    /// SSH identity file for all ssh hosts
    #[arg(long)]
    pub identity_file: Option<PathBuf>,

    /// Per-command timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Refuse ssh hosts whose key is not already in known_hosts
    #[arg(long)]
    pub strict_host_key_checking: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Show what would be run without contacting any host
    #[arg(long)]
    pub dry_run: bool,

    /// Check the SHA-256 of the uploaded archive on each host
    #[arg(long)]
    pub verify_upload: bool,

    /// Require the archive to contain a single top-level web_static/ directory
    #[arg(long)]
    pub verify_layout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Directory to pack
    #[arg(long, default_value = "web_static")]
    pub source: PathBuf,

    /// Directory receiving the archive
    #[arg(long, default_value = "versions")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl TargetArgs {
    /// Inventory file (or built-in hosts) with command-line overrides applied
    pub fn resolve(&self) -> Result<Inventory, InventoryError> {
        let mut inventory = match &self.inventory {
            Some(path) => Inventory::load(path)?,
            None => Inventory::default(),
        };

        if !self.hosts.is_empty() {
            inventory = inventory.with_ssh_hosts(self.hosts.iter().cloned());
        }

        for host in inventory
            .hosts
            .iter_mut()
            .filter(|h| h.connection.method == ConnectionMethod::Ssh)
        {
            if let Some(user) = &self.user {
                host.connection.user = Some(user.clone());
            }
            if let Some(port) = self.port {
                host.connection.port = Some(port);
            }
            if let Some(identity) = &self.identity_file {
                host.connection.identity_file = Some(identity.clone());
            }
        }

        inventory.validate()?;
        Ok(inventory)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Ssh transport configured from the connection flags
    pub fn ssh_transport(&self) -> SshTransport {
        SshTransport::new()
            .with_strict_host_key_checking(self.strict_host_key_checking)
            .with_default_timeout(self.timeout())
    }
}

impl From<&DeployArgs> for DeployOptions {
    fn from(args: &DeployArgs) -> Self {
        Self {
            dry_run: args.dry_run,
            verify_upload: args.verify_upload,
            verify_layout: args.verify_layout,
        }
    }
}
