use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A host that receives releases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHost {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub method: ConnectionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,
    /// Extra arguments passed verbatim to ssh and scp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_args: Option<String>,
    #[serde(
        default,
        rename = "timeout_secs",
        with = "serde_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMethod {
    #[default]
    Ssh,
    Local,
}

impl TargetHost {
    pub fn ssh(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            connection: ConnectionConfig::default(),
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self {
            address: "localhost".to_string(),
            name: Some(name.into()),
            connection: ConnectionConfig {
                method: ConnectionMethod::Local,
                ..ConnectionConfig::default()
            },
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    /// `user@address` form understood by ssh and scp
    pub fn ssh_destination(&self) -> String {
        match &self.connection.user {
            Some(user) => format!("{user}@{}", self.address),
            None => self.address.clone(),
        }
    }

    /// Like [`ssh_destination`](Self::ssh_destination), with IPv6 addresses
    /// bracketed so scp does not read the colons as the path separator
    pub fn scp_destination(&self) -> String {
        let address = if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]", self.address)
        } else {
            self.address.clone()
        };
        match &self.connection.user {
            Some(user) => format!("{user}@{address}"),
            None => address,
        }
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Display for ConnectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionMethod::Ssh => f.write_str("ssh"),
            ConnectionMethod::Local => f.write_str("local"),
        }
    }
}

mod serde_duration_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => Some(d.as_secs()).serialize(serializer),
            None => None::<u64>.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs_opt = Option::<u64>::deserialize(deserializer)?;
        Ok(secs_opt.map(Duration::from_secs))
    }
}
