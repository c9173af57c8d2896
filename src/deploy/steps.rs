//! Remote command sequence for one release

use crate::types::{ArchiveRef, ReleaseLayout};
use serde::{Deserialize, Serialize};
use shell_words::quote;
use std::fmt;

/// Stages of a host deployment, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    Connect,
    Upload,
    VerifyUpload,
    CreateReleaseDir,
    Extract,
    RemoveUpload,
    PromoteContents,
    RemoveNestedDir,
    RemoveCurrentLink,
    LinkCurrent,
}

impl DeployStep {
    pub fn description(&self) -> &'static str {
        match self {
            DeployStep::Connect => "connect to host",
            DeployStep::Upload => "upload archive",
            DeployStep::VerifyUpload => "verify uploaded archive",
            DeployStep::CreateReleaseDir => "create release directory",
            DeployStep::Extract => "extract archive",
            DeployStep::RemoveUpload => "remove uploaded archive",
            DeployStep::PromoteContents => "move release contents up",
            DeployStep::RemoveNestedDir => "remove nested directory",
            DeployStep::RemoveCurrentLink => "remove current link",
            DeployStep::LinkCurrent => "link current release",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    pub step: DeployStep,
    pub command: String,
}

/// Everything a host needs to receive one archive
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub archive: ArchiveRef,
    pub upload_path: String,
    pub release_dir: String,
    pub commands: Vec<StepCommand>,
}

impl ReleasePlan {
    pub fn new(archive: &ArchiveRef, layout: &ReleaseLayout) -> Self {
        let upload_path = layout.upload_path(archive);
        let release_dir = layout.release_dir(archive);
        let nested = layout.nested_path(archive);
        let current = layout.current_link();

        let commands = vec![
            StepCommand {
                step: DeployStep::CreateReleaseDir,
                command: format!("mkdir -p {}", quote(&release_dir)),
            },
            StepCommand {
                step: DeployStep::Extract,
                command: format!("tar -xzf {} -C {}", quote(&upload_path), quote(&release_dir)),
            },
            StepCommand {
                step: DeployStep::RemoveUpload,
                command: format!("rm {}", quote(&upload_path)),
            },
            StepCommand {
                step: DeployStep::PromoteContents,
                // the glob must stay outside the quotes
                command: format!(
                    "mv {}* {}",
                    quote(&format!("{nested}/")),
                    quote(&release_dir)
                ),
            },
            StepCommand {
                step: DeployStep::RemoveNestedDir,
                command: format!("rm -rf {}", quote(&nested)),
            },
            StepCommand {
                step: DeployStep::RemoveCurrentLink,
                command: format!("rm -rf {}", quote(current)),
            },
            StepCommand {
                step: DeployStep::LinkCurrent,
                command: format!("ln -s {} {}", quote(&release_dir), quote(current)),
            },
        ];

        Self {
            archive: archive.clone(),
            upload_path,
            release_dir,
            commands,
        }
    }

    pub fn release_name(&self) -> &str {
        self.archive.release_name()
    }

    pub fn checksum_command(&self) -> String {
        format!("sha256sum {}", quote(&self.upload_path))
    }
}
