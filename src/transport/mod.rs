//! Remote execution seam used by the deployer
//!
//! A [`Transport`] opens a [`RemoteSession`] per host. Sessions expose the
//! two primitives a release needs: copying a local file to the host and
//! running a shell command there.

pub mod local;
pub mod ssh;

pub use local::LocalTransport;
pub use ssh::SshTransport;

use crate::types::{ConnectionMethod, TargetHost};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload of {local} to {remote} failed: {reason}")]
    Upload {
        local: String,
        remote: String,
        reason: String,
    },

    #[error("Connection to {destination} failed: {stderr}")]
    Connection { destination: String, stderr: String },

    #[error("Invalid ssh_args for {host}: {reason}")]
    InvalidSshArgs { host: String, reason: String },

    #[error("Remote path needs shell quoting, which scp does not do portably: {path:?}")]
    UnsafeRemotePath { path: String },

    #[error("Command timed out after {secs}s: {command}")]
    Timeout { command: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Captured result of one remote command. A non-zero exit is reported here,
/// not as a [`TransportError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_output(output: &std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, host: &TargetHost) -> Result<Box<dyn RemoteSession>>;
}

#[async_trait]
pub trait RemoteSession: Send + Sync {
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    async fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// Picks the ssh or local transport from each host's connection method
#[derive(Debug, Default, Clone)]
pub struct HostTransport {
    ssh: SshTransport,
    local: LocalTransport,
}

impl HostTransport {
    pub fn new(ssh: SshTransport) -> Self {
        Self {
            ssh,
            local: LocalTransport::new(),
        }
    }
}

#[async_trait]
impl Transport for HostTransport {
    async fn connect(&self, host: &TargetHost) -> Result<Box<dyn RemoteSession>> {
        match host.connection.method {
            ConnectionMethod::Ssh => self.ssh.connect(host).await,
            ConnectionMethod::Local => self.local.connect(host).await,
        }
    }
}
