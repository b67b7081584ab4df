//! Loading of compiled contract artifacts
//!
//! Both Hardhat (`"bytecode": "0x…"`) and Foundry
//! (`"bytecode": { "object": "0x…" }`) artifact layouts are accepted.

use std::{fs, path::PathBuf, str::FromStr};

use alloy::primitives::{keccak256, Bytes, B256};
use serde::Deserialize;

use crate::{constants::ARTIFACT_EXTENSION, errors::ScriptError};

/// The bytecode field of an artifact
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat layout, a bare hex string
    Hex(String),
    /// Foundry layout, an object holding the hex string
    Object {
        /// The creation bytecode
        object: String,
    },
}

/// The subset of an artifact the scripts need
#[derive(Deserialize)]
struct Artifact {
    /// The creation bytecode of the contract
    bytecode: ArtifactBytecode,
}

/// A directory of compiled contract artifacts, one `<Name>.json` per contract
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    /// The directory holding the artifacts
    dir: PathBuf,
}

impl ArtifactDir {
    /// Create a handle to the given artifacts directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the creation bytecode of the named contract
    pub fn bytecode(&self, name: &str) -> Result<Bytes, ScriptError> {
        let path = self.dir.join(name).with_extension(ARTIFACT_EXTENSION);
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

        parse_bytecode(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))
    }
}

/// Extract the creation bytecode from an artifact's JSON
pub fn parse_bytecode(artifact_json: &str) -> Result<Bytes, String> {
    let artifact: Artifact = serde_json::from_str(artifact_json).map_err(|e| e.to_string())?;
    let hex = match artifact.bytecode {
        ArtifactBytecode::Hex(hex) => hex,
        ArtifactBytecode::Object { object } => object,
    };

    let bytecode = Bytes::from_str(&hex).map_err(|e| e.to_string())?;
    if bytecode.is_empty() {
        return Err("artifact has empty bytecode, is the contract abstract?".to_string());
    }

    Ok(bytecode)
}

/// The hash identifying a contract's creation bytecode in deployment records
pub fn bytecode_hash(bytecode: &[u8]) -> B256 {
    keccak256(bytecode)
}
