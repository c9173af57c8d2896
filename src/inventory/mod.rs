//! Host inventory: which hosts receive a release and where it lands on them

pub mod error;
pub mod validator;

pub use error::*;
pub use validator::*;

use crate::types::{ReleaseLayout, TargetHost};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Hosts used when no inventory is given
pub const DEFAULT_HOSTS: [&str; 2] = ["34.74.23.57", "35.196.161.89"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub hosts: Vec<TargetHost>,
    #[serde(default)]
    pub layout: ReleaseLayout,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            hosts: Self::default_hosts(),
            layout: ReleaseLayout::default(),
        }
    }
}

impl Inventory {
    pub fn default_hosts() -> Vec<TargetHost> {
        DEFAULT_HOSTS.iter().map(|a| TargetHost::ssh(*a)).collect()
    }

    /// Loads a YAML or JSON inventory, chosen by file extension
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Err(InventoryError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let inventory = match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(InventoryError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };

        debug!(
            "Loaded {} host(s) from {}",
            inventory.hosts.len(),
            path.display()
        );
        Ok(inventory)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, InventoryError> {
        let inventory: Self =
            serde_yaml::from_str(content).map_err(|e| InventoryError::InvalidYaml {
                reason: e.to_string(),
            })?;
        inventory.validate()?;
        Ok(inventory)
    }

    pub fn from_json_str(content: &str) -> Result<Self, InventoryError> {
        let inventory: Self =
            serde_json::from_str(content).map_err(|e| InventoryError::InvalidJson {
                reason: e.to_string(),
            })?;
        inventory.validate()?;
        Ok(inventory)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        InventoryValidatorSet::new().validate(self)
    }

    /// Replaces the host list with plain ssh hosts
    pub fn with_ssh_hosts<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = addresses.into_iter().map(TargetHost::ssh).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionMethod;

    #[test]
    fn test_default_inventory_targets_fixed_hosts() {
        let inventory = Inventory::default();
        let addresses: Vec<&str> = inventory.hosts.iter().map(|h| h.address.as_str()).collect();

        assert_eq!(addresses, vec!["34.74.23.57", "35.196.161.89"]);
        assert!(inventory
            .hosts
            .iter()
            .all(|h| h.connection.method == ConnectionMethod::Ssh));
        assert_eq!(inventory.layout, ReleaseLayout::default());
        assert!(inventory.validate().is_ok());
    }

    #[test]
    fn test_with_ssh_hosts_keeps_order() {
        let inventory = Inventory::default().with_ssh_hosts(["b.example", "a.example"]);
        assert_eq!(inventory.hosts[0].address, "b.example");
        assert_eq!(inventory.hosts[1].address, "a.example");
    }

    #[test]
    fn test_relative_layout_is_rejected() {
        let mut inventory = Inventory::default();
        inventory.layout.releases_dir = "data/releases".to_string();
        assert!(matches!(
            inventory.validate(),
            Err(ValidationError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_nested_dir_must_be_single_component() {
        let mut inventory = Inventory::default();
        inventory.layout.nested_dir = "a/b".to_string();
        assert!(inventory.validate().is_err());
    }

    #[test]
    fn test_tmp_dir_with_spaces_is_rejected() {
        let mut inventory = Inventory::default();
        inventory.layout.tmp_dir = "/tmp/up loads".to_string();
        assert!(matches!(
            inventory.validate(),
            Err(ValidationError::InvalidLayout { .. })
        ));
    }
}
