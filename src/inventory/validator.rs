use crate::inventory::error::ValidationError;
use crate::inventory::Inventory;
use crate::types::ConnectionMethod;
use std::collections::HashSet;

pub trait InventoryValidator {
    fn validate(&self, inventory: &Inventory) -> Result<(), ValidationError>;
}

pub struct HostListValidator;
pub struct ConnectivityValidator;
pub struct LayoutValidator;

impl InventoryValidator for HostListValidator {
    fn validate(&self, inventory: &Inventory) -> Result<(), ValidationError> {
        if inventory.hosts.is_empty() {
            return Err(ValidationError::EmptyHostList);
        }

        let mut seen = HashSet::new();
        for host in &inventory.hosts {
            let key = (host.connection.method, host.address.as_str(), host.connection.port);
            if !seen.insert(key) {
                return Err(ValidationError::DuplicateHost {
                    host: host.address.clone(),
                });
            }
        }
        Ok(())
    }
}

impl InventoryValidator for ConnectivityValidator {
    fn validate(&self, inventory: &Inventory) -> Result<(), ValidationError> {
        for host in &inventory.hosts {
            match host.connection.method {
                ConnectionMethod::Ssh => {
                    if host.address.trim().is_empty() {
                        return Err(ValidationError::InvalidHost {
                            reason: "ssh host without an address".to_string(),
                        });
                    }
                    if host.address.chars().any(char::is_whitespace) {
                        return Err(ValidationError::InvalidHost {
                            reason: format!("address contains whitespace: {:?}", host.address),
                        });
                    }
                    if let Some(extra) = &host.connection.ssh_args {
                        if let Err(e) = shell_words::split(extra) {
                            return Err(ValidationError::InvalidHost {
                                reason: format!("ssh_args for {} cannot be parsed: {e}", host),
                            });
                        }
                    }
                }
                ConnectionMethod::Local => {}
            }
        }
        Ok(())
    }
}

impl InventoryValidator for LayoutValidator {
    fn validate(&self, inventory: &Inventory) -> Result<(), ValidationError> {
        let layout = &inventory.layout;
        for (field, value) in [
            ("tmp_dir", &layout.tmp_dir),
            ("releases_dir", &layout.releases_dir),
            ("current_link", &layout.current_link),
        ] {
            if !value.starts_with('/') {
                return Err(ValidationError::InvalidLayout {
                    reason: format!("{field} must be an absolute path, got {value:?}"),
                });
            }
        }

        // scp cannot carry a quoted remote path portably
        if shell_words::quote(&layout.tmp_dir) != layout.tmp_dir.as_str() {
            return Err(ValidationError::InvalidLayout {
                reason: format!(
                    "tmp_dir must not contain whitespace or shell metacharacters, got {:?}",
                    layout.tmp_dir
                ),
            });
        }

        let nested = layout.nested_dir.as_str();
        if nested.is_empty() || nested.contains('/') || nested == "." || nested == ".." {
            return Err(ValidationError::InvalidLayout {
                reason: format!("nested_dir must be a single directory name, got {nested:?}"),
            });
        }
        Ok(())
    }
}

pub struct InventoryValidatorSet {
    validators: Vec<Box<dyn InventoryValidator>>,
}

impl InventoryValidatorSet {
    pub fn new() -> Self {
        Self {
            validators: vec![
                Box::new(HostListValidator),
                Box::new(ConnectivityValidator),
                Box::new(LayoutValidator),
            ],
        }
    }

    pub fn validate(&self, inventory: &Inventory) -> Result<(), ValidationError> {
        for validator in &self.validators {
            validator.validate(inventory)?;
        }
        Ok(())
    }
}

impl Default for InventoryValidatorSet {
    fn default() -> Self {
        Self::new()
    }
}
