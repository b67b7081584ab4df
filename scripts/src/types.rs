//! Type definitions used throughout the scripts

use std::collections::BTreeMap;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, TxHash, B256, U256},
};
use serde::{Deserialize, Serialize};

use crate::{constants::DEPLOYER_ACCOUNT, errors::ScriptError};

/// Named accounts resolved from the script configuration, e.g. `deployer`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAccounts(BTreeMap<String, Address>);

impl NamedAccounts {
    /// Build the named accounts from the deployer signer, if any, and
    /// additional `name -> address` entries.
    ///
    /// The signer's address always takes the `deployer` slot.
    pub fn new(
        deployer: Option<Address>,
        extra: impl IntoIterator<Item = (String, Address)>,
    ) -> Self {
        let mut accounts: BTreeMap<String, Address> = extra.into_iter().collect();
        if let Some(deployer) = deployer {
            accounts.insert(DEPLOYER_ACCOUNT.to_string(), deployer);
        }

        Self(accounts)
    }

    /// Resolve a named account, failing if it is not configured
    pub fn get(&self, name: &str) -> Result<Address, ScriptError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::Configuration(format!("named account `{name}` is not set")))
    }
}

/// The persisted metadata of a deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The address of the deployed contract
    pub address: Address,
    /// The account that sent the deployment transaction
    pub deployer: Address,
    /// Human-readable constructor arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// The ABI-encoded constructor arguments
    #[serde(default)]
    pub encoded_args: Bytes,
    /// keccak256 of the creation bytecode, excluding constructor arguments
    pub bytecode_hash: B256,
    /// The hash of the deployment transaction
    pub transaction_hash: TxHash,
    /// The block in which the deployment was included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// The wei sent along with the deployment
    #[serde(default)]
    pub value: U256,
}

impl DeploymentRecord {
    /// Whether this record was produced by the given bytecode and arguments
    pub fn matches(&self, bytecode_hash: B256, encoded_args: &[u8]) -> bool {
        self.bytecode_hash == bytecode_hash && &self.encoded_args[..] == encoded_args
    }
}

/// Options for a single deployment
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// The account sending the deployment transaction
    pub from: Address,
    /// Whether to log deployment progress
    pub log: bool,
    /// Constructor arguments
    pub args: Vec<DynSolValue>,
    /// Whether to request a block be mined right away on local networks
    pub auto_mine: bool,
    /// The wei to send along with the deployment
    pub value: U256,
}

impl DeployOptions {
    /// Options deploying from the given account with no arguments
    pub fn new(from: Address) -> Self {
        Self { from, log: false, args: Vec::new(), auto_mine: false, value: U256::ZERO }
    }

    /// ABI-encode the constructor arguments
    pub fn encoded_args(&self) -> Bytes {
        if self.args.is_empty() {
            return Bytes::new();
        }

        DynSolValue::Tuple(self.args.clone()).abi_encode_params().into()
    }

    /// Render the constructor arguments for the deployment record
    pub fn display_args(&self) -> Vec<String> {
        self.args.iter().map(display_sol_value).collect()
    }
}

/// The outcome of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    /// The deployment record, either fresh or reused
    pub record: DeploymentRecord,
    /// Whether a deployment transaction was sent
    pub newly_deployed: bool,
}

/// A reference to a deployed contract, optionally bound to a signing account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    /// The deployment name of the contract
    pub name: String,
    /// The recorded address of the contract
    pub address: Address,
    /// The account used to send transactions to the contract
    pub signer: Option<Address>,
}

/// Render a Solidity value the way it is written in a deployments file
fn display_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(addr) => addr.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(n, _) => n.to_string(),
        DynSolValue::Int(n, _) => n.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => Bytes::from(b.clone()).to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn test_deployer_overrides_extra_entry() {
        let signer = address!("0x00000000000000000000000000000000000000d1");
        let other = address!("0x00000000000000000000000000000000000000d2");
        let accounts = NamedAccounts::new(
            Some(signer),
            [("deployer".to_string(), other), ("treasury".to_string(), other)],
        );

        assert_eq!(accounts.get("deployer").unwrap(), signer);
        assert_eq!(accounts.get("treasury").unwrap(), other);
    }

    #[test]
    fn test_missing_account_is_configuration_error() {
        let accounts = NamedAccounts::default();
        assert!(matches!(accounts.get("deployer"), Err(ScriptError::Configuration(_))));
    }

    #[test]
    fn test_address_arg_encoding() {
        let dice_game = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1");
        let mut options = DeployOptions::new(Address::ZERO);
        options.args = vec![DynSolValue::Address(dice_game)];

        let encoded = options.encoded_args();
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[12..], dice_game.as_slice());
        assert_eq!(options.display_args(), vec![dice_game.to_string()]);
    }
}
