use crate::archive;
use crate::deploy::steps::{DeployStep, ReleasePlan};
use crate::deploy::{DeployError, Result};
use crate::transport::{RemoteSession, Transport, TransportError};
use crate::types::*;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SUCCESS_NOTICE: &str = "New version deployed!";

/// Ships one archive to every configured host, one host at a time
pub struct Deployer<T: Transport> {
    hosts: Vec<TargetHost>,
    transport: T,
    layout: ReleaseLayout,
    options: DeployOptions,
    announce: bool,
}

impl<T: Transport> Deployer<T> {
    pub fn new(hosts: Vec<TargetHost>, transport: T) -> Self {
        Self {
            hosts,
            transport,
            layout: ReleaseLayout::default(),
            options: DeployOptions::default(),
            announce: true,
        }
    }

    pub fn with_layout(mut self, layout: ReleaseLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_options(mut self, options: DeployOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether to print the success notice on stdout
    pub fn with_announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    pub fn hosts(&self) -> &[TargetHost] {
        &self.hosts
    }

    pub fn layout(&self) -> &ReleaseLayout {
        &self.layout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Deploys the archive at `archive_path` to every host in order.
    ///
    /// Nothing is contacted unless the archive exists locally. The first
    /// failing step stops the whole run; hosts already processed keep the
    /// new release and the failing host keeps whatever steps completed.
    pub async fn deploy(&self, archive_path: impl AsRef<Path>) -> Result<DeploymentReport> {
        let archive_path = archive_path.as_ref();
        let archive = self.check_preconditions(archive_path)?;
        let plan = ReleasePlan::new(&archive, &self.layout);

        info!(
            "Deploying release {} to {} host(s)",
            plan.release_name(),
            self.hosts.len()
        );

        let mut report = DeploymentReport::new(&archive, self.options.dry_run);

        if self.options.dry_run {
            for host in &self.hosts {
                report.hosts.push(self.rehearse(host, &plan));
            }
            report.finish();
            return Ok(report);
        }

        let checksum = if self.options.verify_upload {
            Some(archive::sha256_file(archive_path)?)
        } else {
            None
        };

        for host in &self.hosts {
            match self.deploy_to_host(host, &plan, checksum.as_deref()).await {
                Ok(result) => report.hosts.push(result),
                Err(e) => {
                    warn!("Deployment to {} failed: {}", host, e);
                    return Err(e);
                }
            }
        }

        report.finish();
        info!("Release {} deployed to all hosts", report.release_name);
        if self.announce {
            println!("{SUCCESS_NOTICE}");
        }
        Ok(report)
    }

    fn check_preconditions(&self, archive_path: &Path) -> Result<ArchiveRef> {
        if !archive_path.exists() {
            return Err(DeployError::ArchiveNotFound {
                path: archive_path.display().to_string(),
            });
        }

        let archive =
            ArchiveRef::from_path(archive_path).ok_or_else(|| DeployError::InvalidArchiveName {
                path: archive_path.display().to_string(),
            })?;

        if self.hosts.is_empty() {
            return Err(DeployError::NoHosts);
        }

        if self.options.verify_layout {
            let found = archive::top_level_entries(archive_path)?;
            let expected = &self.layout.nested_dir;
            if found.len() != 1 || !found.contains(expected) {
                return Err(DeployError::UnexpectedLayout {
                    archive: archive.file_name().to_string(),
                    expected: expected.clone(),
                    found: found.into_iter().collect(),
                });
            }
            debug!("Archive layout verified: single {}/ directory", expected);
        }

        Ok(archive)
    }

    async fn deploy_to_host(
        &self,
        host: &TargetHost,
        plan: &ReleasePlan,
        checksum: Option<&str>,
    ) -> Result<HostDeployment> {
        info!("Deploying {} to host: {}", plan.release_name(), host);
        let started = Instant::now();
        let transport_error = |step: DeployStep| {
            move |source: TransportError| DeployError::Transport {
                host: host.to_string(),
                step,
                source,
            }
        };

        let session = self
            .transport
            .connect(host)
            .await
            .map_err(transport_error(DeployStep::Connect))?;

        session
            .upload(plan.archive.path(), &plan.upload_path)
            .await
            .map_err(transport_error(DeployStep::Upload))?;
        debug!("Uploaded {} to {}:{}", plan.archive.file_name(), host, plan.upload_path);

        let mut commands = Vec::with_capacity(plan.commands.len() + 1);

        if let Some(expected) = checksum {
            let command = plan.checksum_command();
            self.verify_upload(host, session.as_ref(), &command, expected)
                .await?;
            commands.push(command);
        }

        for step in &plan.commands {
            debug!("[{}] {}: {}", host, step.step, step.command);
            let output = session
                .run(&step.command)
                .await
                .map_err(transport_error(step.step))?;

            if !output.success {
                return Err(DeployError::RemoteCommand {
                    host: host.to_string(),
                    step: step.step,
                    exit_code: output.exit_code,
                    stderr: output.stderr.trim().to_string(),
                });
            }
            commands.push(step.command.clone());
        }

        let duration = started.elapsed();
        info!(
            "Release {} is current on {} ({:.2}s)",
            plan.release_name(),
            host,
            duration.as_secs_f64()
        );

        Ok(HostDeployment {
            host: host.display_name().to_string(),
            address: host.address.clone(),
            upload_path: plan.upload_path.clone(),
            commands,
            duration,
        })
    }

    async fn verify_upload(
        &self,
        host: &TargetHost,
        session: &dyn RemoteSession,
        command: &str,
        expected: &str,
    ) -> Result<()> {
        let output = session
            .run(command)
            .await
            .map_err(|source| DeployError::Transport {
                host: host.to_string(),
                step: DeployStep::VerifyUpload,
                source,
            })?;

        if !output.success {
            return Err(DeployError::RemoteCommand {
                host: host.to_string(),
                step: DeployStep::VerifyUpload,
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let actual = output.stdout.split_whitespace().next().unwrap_or_default();
        if actual != expected {
            return Err(DeployError::ChecksumMismatch {
                host: host.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        debug!("Upload checksum verified on {}", host);
        Ok(())
    }

    fn rehearse(&self, host: &TargetHost, plan: &ReleasePlan) -> HostDeployment {
        info!(
            "[dry-run] {}: upload {} -> {}",
            host,
            plan.archive.path().display(),
            plan.upload_path
        );

        let mut commands = Vec::with_capacity(plan.commands.len() + 1);
        if self.options.verify_upload {
            commands.push(plan.checksum_command());
        }
        commands.extend(plan.commands.iter().map(|c| c.command.clone()));

        for command in &commands {
            info!("[dry-run] {}: {}", host, command);
        }

        HostDeployment {
            host: host.display_name().to_string(),
            address: host.address.clone(),
            upload_path: plan.upload_path.clone(),
            commands,
            duration: Duration::ZERO,
        }
    }
}
