use crate::transport::{CommandOutput, RemoteSession, Result, Transport, TransportError};
use crate::types::TargetHost;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Runs release commands on the local machine through `sh -c`
#[derive(Debug, Default, Clone)]
pub struct LocalTransport;

impl LocalTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn connect(&self, host: &TargetHost) -> Result<Box<dyn RemoteSession>> {
        Ok(Box::new(LocalSession {
            host: host.display_name().to_string(),
        }))
    }
}

pub struct LocalSession {
    host: String,
}

#[async_trait]
impl RemoteSession for LocalSession {
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        debug!(
            "Copying {} to {} on {}",
            local_path.display(),
            remote_path,
            self.host
        );

        let remote = Path::new(remote_path);
        if let Some(parent) = remote.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::copy(local_path, remote)
            .await
            .map_err(|e| TransportError::Upload {
                local: local_path.display().to_string(),
                remote: remote_path.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!("Executing command on {}: {}", self.host, command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|source| TransportError::Spawn {
                program: "sh".to_string(),
                source,
            })?;

        Ok(CommandOutput::from_output(&output))
    }
}
