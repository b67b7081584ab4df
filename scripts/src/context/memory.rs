//! An in-memory deployment context
//!
//! Simulates just enough of a chain to run deployment procedures without a
//! node: contract addresses are derived from sender and nonce, every
//! transaction is mined in its own block, and `Ownable` ownership is tracked
//! with the same revert rules as the OpenZeppelin implementation. Used for
//! dry runs and in tests.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    artifacts::{bytecode_hash, ArtifactDir},
    constants::{DEPLOYER_ACCOUNT, MAX_SEEDED_NONCE},
    deployments::NetworkDeployments,
    errors::ScriptError,
    types::{ContractHandle, DeployOptions, DeployResult, DeploymentRecord, NamedAccounts},
};

use super::DeploymentContext;

/// A transaction submitted to the in-memory chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedTransaction {
    /// A contract creation
    Deploy {
        /// The deployment name
        name: String,
        /// The sender
        from: Address,
        /// The address of the created contract
        address: Address,
        /// The human-readable constructor arguments
        args: Vec<String>,
        /// The wei sent along
        value: U256,
        /// The transaction hash
        hash: TxHash,
    },
    /// A call to `transferOwnership`
    TransferOwnership {
        /// The contract called
        contract: Address,
        /// The sender
        from: Address,
        /// The requested owner
        new_owner: Address,
        /// Whether the call reverted
        reverted: bool,
        /// The transaction hash
        hash: TxHash,
    },
}

/// A chain operation whose next call can be made to fail
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`DeploymentContext::get_contract`]
    GetContract,
    /// [`DeploymentContext::get_address`]
    GetAddress,
    /// [`DeploymentContext::deploy`]
    Deploy,
    /// [`DeploymentContext::transfer_ownership`]
    TransferOwnership,
}

/// The mutable state of the simulated chain
#[derive(Default)]
struct ChainState {
    /// Deployment records of the simulated network
    records: NetworkDeployments,
    /// Addresses holding contract code
    code: HashSet<Address>,
    /// The owner of each `Ownable` contract
    owners: HashMap<Address, Address>,
    /// The next nonce of each sender
    nonces: HashMap<Address, u64>,
    /// Every transaction submitted, in order
    transactions: Vec<SubmittedTransaction>,
    /// The number of requests made against the chain or deployment state
    requests: usize,
    /// The latest block number
    block_number: u64,
    /// Errors returned by the next call of an operation
    failures: HashMap<Operation, ScriptError>,
}

impl ChainState {
    /// Take the next nonce of `from`, mine a block and return the tx hash
    fn next_transaction(&mut self, from: Address) -> (u64, TxHash) {
        let nonce = self.nonces.entry(from).or_default();
        let current = *nonce;
        *nonce += 1;
        self.block_number += 1;

        let hash = keccak256([from.as_slice(), &current.to_be_bytes()].concat());
        (current, hash)
    }

    /// Count a request for `op`, failing it if a failure is queued
    fn request(&mut self, op: Operation) -> Result<(), ScriptError> {
        self.requests += 1;
        match self.failures.remove(&op) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Advance the nonce of a seeded contract's deployer past the nonce that
    /// created it, if it was created by a plain CREATE within the search range
    fn seed_nonce(&mut self, record: &DeploymentRecord) {
        let Some(used) =
            (0..MAX_SEEDED_NONCE).find(|n| record.deployer.create(*n) == record.address)
        else {
            return;
        };

        let nonce = self.nonces.entry(record.deployer).or_default();
        *nonce = (*nonce).max(used + 1);
    }
}

/// A deployment context that never leaves the process
pub struct InMemoryContext {
    /// The configured named accounts
    accounts: NamedAccounts,
    /// Creation bytecode registered directly, by contract name
    bytecodes: HashMap<String, Bytes>,
    /// A fallback artifacts directory for bytecode not registered directly
    artifacts: Option<ArtifactDir>,
    /// The simulated chain
    state: Mutex<ChainState>,
}

impl InMemoryContext {
    /// Create an empty chain with the given accounts
    pub fn new(accounts: NamedAccounts) -> Self {
        Self {
            accounts,
            bytecodes: HashMap::new(),
            artifacts: None,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Register the creation bytecode of a contract
    pub fn with_artifact(mut self, name: &str, bytecode: impl Into<Bytes>) -> Self {
        self.bytecodes.insert(name.to_string(), bytecode.into());
        self
    }

    /// Read bytecode not registered directly from an artifacts directory
    pub fn with_artifact_dir(mut self, artifacts: ArtifactDir) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Seed the chain with existing deployments. Each seeded contract has code
    /// and is owned by its deployer, whose nonce is moved past the deployment.
    pub fn with_deployments(mut self, records: NetworkDeployments) -> Self {
        let state = self.state.get_mut();
        for (name, record) in records {
            state.seed_nonce(&record);
            state.code.insert(record.address);
            state.owners.insert(record.address, record.deployer);
            state.records.insert(name, record);
        }

        self
    }

    /// Seed a single existing deployment
    pub fn with_deployment(self, name: &str, record: DeploymentRecord) -> Self {
        self.with_deployments(NetworkDeployments::from([(name.to_string(), record)]))
    }

    /// Make the next call of `op` fail with `error` before touching the chain
    pub fn with_failure(mut self, op: Operation, error: ScriptError) -> Self {
        self.state.get_mut().failures.insert(op, error);
        self
    }

    /// Every transaction submitted so far
    pub async fn transactions(&self) -> Vec<SubmittedTransaction> {
        self.state.lock().await.transactions.clone()
    }

    /// The number of requests made against the chain or deployment state
    pub async fn requests(&self) -> usize {
        self.state.lock().await.requests
    }

    /// The current deployment records
    pub async fn records(&self) -> NetworkDeployments {
        self.state.lock().await.records.clone()
    }

    /// The owner of an `Ownable` contract
    pub async fn owner_of(&self, contract: Address) -> Option<Address> {
        self.state.lock().await.owners.get(&contract).copied()
    }

    /// Resolve the creation bytecode of a contract
    fn bytecode(&self, name: &str) -> Result<Bytes, ScriptError> {
        if let Some(bytecode) = self.bytecodes.get(name) {
            return Ok(bytecode.clone());
        }

        match &self.artifacts {
            Some(artifacts) => artifacts.bytecode(name),
            None => Err(ScriptError::ArtifactParsing(format!("no artifact for `{name}`"))),
        }
    }
}

impl DeploymentContext for InMemoryContext {
    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
        Ok(self.accounts.clone())
    }

    async fn get_contract(
        &self,
        name: &str,
        signer: Option<Address>,
    ) -> Result<ContractHandle, ScriptError> {
        let mut state = self.state.lock().await;
        state.request(Operation::GetContract)?;

        let record = state.records.get(name).ok_or_else(|| {
            ScriptError::DependencyNotFound(format!("no deployment of `{name}` in memory"))
        })?;

        Ok(ContractHandle { name: name.to_string(), address: record.address, signer })
    }

    async fn get_address(&self, contract: &ContractHandle) -> Result<Address, ScriptError> {
        let mut state = self.state.lock().await;
        state.request(Operation::GetAddress)?;

        if !state.code.contains(&contract.address) {
            return Err(ScriptError::DependencyNotFound(format!(
                "no code at {} for `{}`",
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
        let bytecode = self.bytecode(name)?;
        let bytecode_hash = bytecode_hash(&bytecode);
        let encoded_args = options.encoded_args();

        let mut state = self.state.lock().await;
        state.request(Operation::Deploy)?;

        if let Some(record) = state.records.get(name) {
            if record.matches(bytecode_hash, &encoded_args) {
                if options.log {
                    info!("reusing \"{name}\" at {}", record.address);
                }
                return Ok(DeployResult { record: record.clone(), newly_deployed: false });
            }
        }

        let (nonce, hash) = state.next_transaction(options.from);
        let address = options.from.create(nonce);
        let record = DeploymentRecord {
            address,
            deployer: options.from,
            args: options.display_args(),
            encoded_args,
            bytecode_hash,
            transaction_hash: hash,
            block_number: Some(state.block_number),
            value: options.value,
        };

        state.code.insert(address);
        state.owners.insert(address, options.from);
        state.records.insert(name.to_string(), record.clone());
        state.transactions.push(SubmittedTransaction::Deploy {
            name: name.to_string(),
            from: options.from,
            address,
            args: record.args.clone(),
            value: options.value,
            hash,
        });

        if options.log {
            info!("deploying \"{name}\" (tx: {hash})...: deployed at {address}");
        }

        Ok(DeployResult { record, newly_deployed: true })
    }

    async fn transfer_ownership(
        &self,
        contract: &ContractHandle,
        new_owner: Address,
    ) -> Result<TxHash, ScriptError> {
        let from = match contract.signer {
            Some(signer) => signer,
            None => self.accounts.get(DEPLOYER_ACCOUNT)?,
        };

        let mut state = self.state.lock().await;
        state.request(Operation::TransferOwnership)?;

        if !state.code.contains(&contract.address) {
            return Err(ScriptError::ContractInteraction(format!(
                "no code at {} for `{}`",
                contract.address, contract.name
            )));
        }

        let (_, hash) = state.next_transaction(from);
        let owner = state.owners.get(&contract.address).copied();
        let revert_reason = if owner != Some(from) {
            Some(format!("OwnableUnauthorizedAccount({from})"))
        } else if new_owner == Address::ZERO {
            Some(format!("OwnableInvalidOwner({new_owner})"))
        } else {
            None
        };

        state.transactions.push(SubmittedTransaction::TransferOwnership {
            contract: contract.address,
            from,
            new_owner,
            reverted: revert_reason.is_some(),
            hash,
        });

        if let Some(reason) = revert_reason {
            return Err(ScriptError::ContractInteraction(format!(
                "transferOwnership on `{}` reverted: {reason}",
                contract.name
            )));
        }

        state.owners.insert(contract.address, new_owner);
        info!("transferred ownership of \"{}\" to {new_owner}", contract.name);
        Ok(hash)
    }
}
