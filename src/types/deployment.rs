use crate::types::release::ArchiveRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Switches that extend the base release sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOptions {
    /// Log every upload and command without contacting any host
    pub dry_run: bool,
    /// Compare the remote SHA-256 of the uploaded archive with the local one
    pub verify_upload: bool,
    /// Require a single top-level nested directory in the archive before deploying
    pub verify_layout: bool,
}

/// Outcome of one deploy call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub deployment_id: Uuid,
    pub archive: String,
    pub release_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub hosts: Vec<HostDeployment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostDeployment {
    pub host: String,
    pub address: String,
    pub upload_path: String,
    pub commands: Vec<String>,
    #[serde(with = "serde_duration_ms")]
    pub duration: Duration,
}

impl DeploymentReport {
    pub fn new(archive: &ArchiveRef, dry_run: bool) -> Self {
        Self {
            deployment_id: Uuid::new_v4(),
            archive: archive.file_name().to_string(),
            release_name: archive.release_name().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            hosts: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_commands(&self) -> usize {
        self.hosts.iter().map(|h| h.commands.len()).sum()
    }
}

mod serde_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
