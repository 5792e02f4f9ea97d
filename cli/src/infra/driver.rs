//! `MachineDriver` for machines declared in the config file.

use std::path::PathBuf;

use anyhow::Result;
use rigger_common::{AuthCapability, DriverError, DriverKind, EphemeralPassword, MachineDriver};

use crate::domain::config::{MachineSpec, validate_machine_name};
use crate::domain::error::ConfigError;

/// A pre-existing machine reached at a fixed address.
pub struct StaticDriver {
    name: String,
    spec: MachineSpec,
    key_path: PathBuf,
    password: Option<EphemeralPassword>,
}

impl StaticDriver {
    /// Builds the driver for machine `name`.
    ///
    /// A bootstrap password is attached only for driver kinds that use one.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the host is empty, or the
    /// default key location cannot be determined.
    pub fn from_spec(name: &str, spec: &MachineSpec, password: Option<String>) -> Result<Self> {
        validate_machine_name(name)?;
        if spec.host.trim().is_empty() {
            return Err(ConfigError::MissingHost(name.to_string()).into());
        }
        let key_path = match &spec.key_path {
            Some(path) => path.clone(),
            None => default_key_path(name)?,
        };
        let password = password
            .filter(|_| spec.driver.supports_password())
            .map(EphemeralPassword::new);
        Ok(Self {
            name: name.to_string(),
            spec: spec.clone(),
            key_path,
            password,
        })
    }

    #[must_use]
    pub fn kind(&self) -> DriverKind {
        self.spec.driver
    }
}

/// `~/.rigger/machines/<name>/id_rsa`
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_key_path(name: &str) -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".rigger").join("machines").join(name).join("id_rsa"))
}

impl MachineDriver for StaticDriver {
    fn ssh_hostname(&self) -> Result<String, DriverError> {
        Ok(self.spec.host.clone())
    }

    fn ssh_port(&self) -> Result<u16, DriverError> {
        if self.spec.port == 0 {
            return Err(DriverError::NoPort(self.name.clone()));
        }
        Ok(self.spec.port)
    }

    fn ssh_username(&self) -> String {
        self.spec.user.clone()
    }

    fn ssh_key_path(&self) -> PathBuf {
        self.key_path.clone()
    }

    fn machine_name(&self) -> String {
        self.name.clone()
    }

    fn driver_name(&self) -> String {
        self.spec.driver.name().to_string()
    }

    fn auth_capability(&self) -> AuthCapability<'_> {
        match &self.password {
            Some(password) => AuthCapability::Password(password),
            None => AuthCapability::NoPassword,
        }
    }
}
