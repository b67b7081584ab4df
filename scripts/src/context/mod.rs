//! The execution context a deployment procedure runs against
//!
//! Procedures only see the chain and the deployment state through
//! [`DeploymentContext`], which is implemented against a live RPC node by
//! [`NetworkContext`] and in memory by [`InMemoryContext`].

use alloy::primitives::{Address, TxHash};

use crate::{
    errors::ScriptError,
    types::{ContractHandle, DeployOptions, DeployResult, NamedAccounts},
};

mod memory;
mod network;

pub use memory::{InMemoryContext, Operation, SubmittedTransaction};
pub use network::NetworkContext;

/// The capabilities a deployment procedure needs from its environment
#[allow(async_fn_in_trait)]
pub trait DeploymentContext {
    /// Resolve the configured named accounts. Never touches the network.
    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError>;

    /// Look up a deployed contract by name on the active network, binding it
    /// to `signer` for subsequent transactions
    async fn get_contract(
        &self,
        name: &str,
        signer: Option<Address>,
    ) -> Result<ContractHandle, ScriptError>;

    /// Read the on-chain address of a contract, checking that code lives there
    async fn get_address(&self, contract: &ContractHandle) -> Result<Address, ScriptError>;

    /// Deploy a contract, reusing the existing deployment if the bytecode and
    /// constructor arguments are unchanged
    async fn deploy(&self, name: &str, options: DeployOptions)
        -> Result<DeployResult, ScriptError>;

    /// Transfer ownership of an `Ownable` contract, sent from the handle's signer
    async fn transfer_ownership(
        &self,
        contract: &ContractHandle,
        new_owner: Address,
    ) -> Result<TxHash, ScriptError>;
}
