//! Persistence of deployment records in the deployments file
//!
//! The file is a JSON object keyed by network name, each entry an object
//! keyed by contract name:
//!
//! ```json
//! { "localhost": { "DiceGame": { "address": "0x…", … } } }
//! ```

use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::{errors::ScriptError, types::DeploymentRecord};

/// The deployment records of a single network, keyed by contract name
pub type NetworkDeployments = BTreeMap<String, DeploymentRecord>;

/// The full contents of a deployments file, keyed by network name
pub type DeploymentsFile = BTreeMap<String, NetworkDeployments>;

/// A view of the deployments file scoped to one network
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    /// The path of the deployments file
    path: PathBuf,
    /// The network whose records are read and written
    network: String,
}

impl DeploymentStore {
    /// Create a store for the given file and network
    pub fn new(path: impl Into<PathBuf>, network: impl Into<String>) -> Self {
        Self { path: path.into(), network: network.into() }
    }

    /// The network this store is scoped to
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Read every network's records. A missing file reads as empty.
    pub fn read_all(&self) -> Result<DeploymentsFile, ScriptError> {
        if !self.path.exists() {
            return Ok(DeploymentsFile::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", self.path.display())))?;
        if contents.trim().is_empty() {
            return Ok(DeploymentsFile::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", self.path.display())))
    }

    /// Read the records of this store's network
    pub fn records(&self) -> Result<NetworkDeployments, ScriptError> {
        Ok(self.read_all()?.remove(&self.network).unwrap_or_default())
    }

    /// Read the record for a single contract, if deployed
    pub fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, ScriptError> {
        Ok(self.records()?.remove(name))
    }

    /// Write the record for a contract, preserving all other entries
    pub fn save(&self, name: &str, record: &DeploymentRecord) -> Result<(), ScriptError> {
        let mut all = self.read_all()?;
        all.entry(self.network.clone()).or_default().insert(name.to_string(), record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(&all)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
    }
}
