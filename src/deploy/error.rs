use crate::deploy::steps::DeployStep;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: String },

    #[error("Cannot derive a release name from archive path: {path}")]
    InvalidArchiveName { path: String },

    #[error("Archive {archive} must contain only a top-level {expected}/ directory, found: {found:?}")]
    UnexpectedLayout {
        archive: String,
        expected: String,
        found: Vec<String>,
    },

    #[error("No target hosts configured")]
    NoHosts,

    #[error("Transport failure on {host} during {step}: {source}")]
    Transport {
        host: String,
        step: DeployStep,
        #[source]
        source: TransportError,
    },

    #[error("Remote command failed on {host} during {step} (exit code {exit_code}): {stderr}")]
    RemoteCommand {
        host: String,
        step: DeployStep,
        exit_code: i32,
        stderr: String,
    },

    #[error("Uploaded archive checksum mismatch on {host}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        host: String,
        expected: String,
        actual: String,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),
}

impl DeployError {
    /// Host the failure happened on, if it got that far
    pub fn host(&self) -> Option<&str> {
        match self {
            DeployError::Transport { host, .. }
            | DeployError::RemoteCommand { host, .. }
            | DeployError::ChecksumMismatch { host, .. } => Some(host),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<DeployStep> {
        match self {
            DeployError::Transport { step, .. } | DeployError::RemoteCommand { step, .. } => {
                Some(*step)
            }
            DeployError::ChecksumMismatch { .. } => Some(DeployStep::VerifyUpload),
            _ => None,
        }
    }

    /// True for failures raised before any host was contacted
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DeployError::ArchiveNotFound { .. }
                | DeployError::InvalidArchiveName { .. }
                | DeployError::UnexpectedLayout { .. }
                | DeployError::NoHosts
                | DeployError::Archive(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
