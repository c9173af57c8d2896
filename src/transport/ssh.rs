use crate::transport::{CommandOutput, RemoteSession, Result, Transport, TransportError};
use crate::types::TargetHost;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit status ssh reserves for its own failures (unreachable host, auth,
/// dropped connection)
const SSH_CONNECTION_FAILURE: i32 = 255;

/// Runs release commands over the system `ssh` and `scp` clients
#[derive(Debug, Clone)]
pub struct SshTransport {
    strict_host_key_checking: bool,
    default_timeout: Option<Duration>,
    ssh_program: String,
    scp_program: String,
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SshTransport {
    pub fn new() -> Self {
        Self {
            strict_host_key_checking: false,
            default_timeout: None,
            ssh_program: "ssh".to_string(),
            scp_program: "scp".to_string(),
        }
    }

    pub fn with_strict_host_key_checking(mut self, strict: bool) -> Self {
        self.strict_host_key_checking = strict;
        self
    }

    /// Timeout applied to hosts that do not set their own
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Use other ssh/scp executables, e.g. wrappers that add auditing
    pub fn with_programs(mut self, ssh: impl Into<String>, scp: impl Into<String>) -> Self {
        self.ssh_program = ssh.into();
        self.scp_program = scp.into();
        self
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn connect(&self, host: &TargetHost) -> Result<Box<dyn RemoteSession>> {
        Ok(Box::new(SshSession::for_host(host, self)?))
    }
}

pub struct SshSession {
    destination: String,
    scp_destination: String,
    port: Option<u16>,
    common_args: Vec<String>,
    timeout: Option<Duration>,
    ssh_program: String,
    scp_program: String,
}

impl SshSession {
    fn for_host(host: &TargetHost, transport: &SshTransport) -> Result<Self> {
        let strict = if transport.strict_host_key_checking {
            "yes"
        } else {
            "no"
        };
        let mut common_args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("StrictHostKeyChecking={strict}"),
        ];

        if let Some(identity) = &host.connection.identity_file {
            common_args.push("-i".to_string());
            common_args.push(identity.display().to_string());
        }

        if let Some(extra) = &host.connection.ssh_args {
            let words =
                shell_words::split(extra).map_err(|e| TransportError::InvalidSshArgs {
                    host: host.to_string(),
                    reason: e.to_string(),
                })?;
            common_args.extend(words);
        }

        Ok(Self {
            destination: host.ssh_destination(),
            scp_destination: host.scp_destination(),
            port: host.connection.port,
            common_args,
            timeout: host.connection.timeout.or(transport.default_timeout),
            ssh_program: transport.ssh_program.clone(),
            scp_program: transport.scp_program.clone(),
        })
    }

    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = self.common_args.clone();
        if let Some(port) = self.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push(self.destination.clone());
        args.push(command.to_string());
        args
    }

    /// scp arguments for one upload. The remote path is rejected when it would
    /// need quoting: legacy scp splits it in the remote shell, sftp-mode scp
    /// takes quotes literally.
    pub fn scp_args(&self, local_path: &Path, remote_path: &str) -> Result<Vec<String>> {
        if remote_path.is_empty() || shell_words::quote(remote_path) != remote_path {
            return Err(TransportError::UnsafeRemotePath {
                path: remote_path.to_string(),
            });
        }

        let mut args = self.common_args.clone();
        if let Some(port) = self.port {
            args.push("-P".to_string());
            args.push(port.to_string());
        }
        args.push(local_path.display().to_string());
        args.push(format!("{}:{}", self.scp_destination, remote_path));
        Ok(args)
    }

    async fn output(&self, program: &str, args: Vec<String>, label: &str) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(&args).kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| TransportError::Timeout {
                    command: label.to_string(),
                    secs: timeout.as_secs(),
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| TransportError::Spawn {
            program: program.to_string(),
            source,
        })?;

        Ok(CommandOutput::from_output(&output))
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        debug!(
            "Uploading {} to {}:{}",
            local_path.display(),
            self.scp_destination,
            remote_path
        );

        let args = self.scp_args(local_path, remote_path)?;
        let label = format!("scp {}", local_path.display());
        let output = self.output(&self.scp_program, args, &label).await?;

        if !output.success {
            return Err(TransportError::Upload {
                local: local_path.display().to_string(),
                remote: format!("{}:{}", self.scp_destination, remote_path),
                reason: output.stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!("Executing command on {}: {}", self.destination, command);

        let output = self
            .output(&self.ssh_program, self.ssh_args(command), command)
            .await?;

        if output.exit_code == SSH_CONNECTION_FAILURE {
            warn!(
                "ssh to {} failed before the command ran: {}",
                self.destination,
                output.stderr.trim()
            );
            return Err(TransportError::Connection {
                destination: self.destination.clone(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}
