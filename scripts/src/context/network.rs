//! A deployment context backed by a live RPC node

use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{ext::AnvilApi, DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use tracing::{info, warn};

use crate::{
    artifacts::{bytecode_hash, ArtifactDir},
    constants::LOCAL_CHAIN_IDS,
    deployments::DeploymentStore,
    errors::ScriptError,
    solidity::IOwnable,
    types::{ContractHandle, DeployOptions, DeployResult, DeploymentRecord, NamedAccounts},
};

use super::DeploymentContext;

/// Deploys through an RPC provider, persisting records to the deployments file
pub struct NetworkContext {
    /// The provider, holding the deployer's wallet when one is configured
    provider: DynProvider,
    /// The address of the wallet attached to the provider
    signer: Option<Address>,
    /// The configured named accounts
    accounts: NamedAccounts,
    /// The deployment records of the active network
    store: DeploymentStore,
    /// The compiled contract artifacts
    artifacts: ArtifactDir,
}

impl NetworkContext {
    /// Create a context from an already configured provider
    pub fn new(
        provider: DynProvider,
        signer: Option<Address>,
        accounts: NamedAccounts,
        store: DeploymentStore,
        artifacts: ArtifactDir,
    ) -> Self {
        Self { provider, signer, accounts, store, artifacts }
    }

    /// Whether the connected chain is a local devnet
    async fn is_local_chain(&self) -> Result<bool, ScriptError> {
        let chain_id =
            self.provider.get_chain_id().await.map_err(|e| ScriptError::Network(e.to_string()))?;

        Ok(LOCAL_CHAIN_IDS.contains(&chain_id))
    }

    /// Check that transactions from `from` can be signed
    fn ensure_signer(&self, from: Address) -> Result<(), ScriptError> {
        match self.signer {
            Some(signer) if signer == from => Ok(()),
            _ => Err(ScriptError::Configuration(format!("no signer available for {from}"))),
        }
    }
}

impl DeploymentContext for NetworkContext {
    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
        Ok(self.accounts.clone())
    }

    async fn get_contract(
        &self,
        name: &str,
        signer: Option<Address>,
    ) -> Result<ContractHandle, ScriptError> {
        let record = self.store.get(name)?.ok_or_else(|| {
            ScriptError::DependencyNotFound(format!(
                "no deployment of `{name}` on network `{}`",
                self.store.network()
            ))
        })?;

        Ok(ContractHandle { name: name.to_string(), address: record.address, signer })
    }

    async fn get_address(&self, contract: &ContractHandle) -> Result<Address, ScriptError> {
        let code = self
            .provider
            .get_code_at(contract.address)
            .await
            .map_err(|e| ScriptError::Network(e.to_string()))?;

        if code.is_empty() {
            return Err(ScriptError::DependencyNotFound(format!(
                "no code at {} for `{}`, the deployments file may be stale",
                contract.address, contract.name
            )));
        }

        Ok(contract.address)
    }

    async fn deploy(
        &self,
        name: &str,
        options: DeployOptions,
    ) -> Result<DeployResult, ScriptError> {
        self.ensure_signer(options.from)?;

        let bytecode = self.artifacts.bytecode(name)?;
        let bytecode_hash = bytecode_hash(&bytecode);
        let encoded_args = options.encoded_args();

        if let Some(record) = self.store.get(name)? {
            if record.matches(bytecode_hash, &encoded_args) {
                if options.log {
                    info!("reusing \"{name}\" at {}", record.address);
                }
                return Ok(DeployResult { record, newly_deployed: false });
            }
        }

        // Resolved before sending so a failed lookup cannot strand a sent deployment
        let auto_mine = options.auto_mine && self.is_local_chain().await?;

        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_value(options.value)
            .with_deploy_code([&bytecode[..], &encoded_args[..]].concat());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::Deployment(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        if options.log {
            info!("deploying \"{name}\" (tx: {tx_hash})...");
        }

        if auto_mine {
            if let Err(e) = self.provider.evm_mine(None).await {
                warn!("failed to mine a block for \"{name}\", awaiting the receipt anyway: {e}");
            }
        }

        let receipt =
            pending.get_receipt().await.map_err(|e| ScriptError::Deployment(e.to_string()))?;
        if !receipt.status() {
            return Err(ScriptError::Deployment(format!("transaction {tx_hash} reverted")));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::Deployment(format!("receipt of {tx_hash} has no contract address"))
        })?;

        let record = DeploymentRecord {
            address,
            deployer: options.from,
            args: options.display_args(),
            encoded_args,
            bytecode_hash,
            transaction_hash: tx_hash,
            block_number: receipt.block_number,
            value: options.value,
        };
        self.store.save(name, &record)?;

        if options.log {
            info!("deployed \"{name}\" at {address} with {} gas", receipt.gas_used);
        }

        Ok(DeployResult { record, newly_deployed: true })
    }

    async fn transfer_ownership(
        &self,
        contract: &ContractHandle,
        new_owner: Address,
    ) -> Result<TxHash, ScriptError> {
        let from = contract.signer.or(self.signer).ok_or_else(|| {
            ScriptError::Configuration(format!("no signer bound to `{}`", contract.name))
        })?;
        self.ensure_signer(from)?;

        let ownable = IOwnable::new(contract.address, self.provider.clone());
        let receipt = ownable
            .transferOwnership(new_owner)
            .from(from)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractInteraction(format!(
                "transferOwnership on `{}` reverted in {}",
                contract.name, receipt.transaction_hash
            )));
        }

        info!("transferred ownership of \"{}\" to {new_owner}", contract.name);
        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy::{providers::ProviderBuilder, transports::mock::Asserter};

    use super::*;
    use crate::utils::parse_signer;

    /// The first default Anvil account
    const ANVIL_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_chain_lookup_fails_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("RiggedRoll.json"), r#"{ "bytecode": "0x6080" }"#).unwrap();
        let deployments_path = dir.path().join("deployments.json");

        let signer = parse_signer(ANVIL_PKEY).unwrap();
        let from = signer.address();

        // A single failing response, consumed by whichever request comes first.
        // Sending first would surface as a deployment error instead.
        let asserter = Asserter::new();
        asserter.push_failure_msg("connection refused");
        let provider = ProviderBuilder::new().wallet(signer).connect_mocked_client(asserter);

        let ctx = NetworkContext::new(
            DynProvider::new(provider),
            Some(from),
            NamedAccounts::new(Some(from), []),
            DeploymentStore::new(&deployments_path, "localhost"),
            ArtifactDir::new(dir.path()),
        );

        let mut options = DeployOptions::new(from);
        options.auto_mine = true;
        let res = ctx.deploy("RiggedRoll", options).await;

        assert!(matches!(res, Err(ScriptError::Network(_))));
        assert!(!deployments_path.exists());
    }
}
