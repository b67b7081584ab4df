//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, list_deployments, transfer_ownership},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NETWORK, DEFAULT_RPC_URL},
    context::DeploymentContext,
    deployments::DeploymentStore,
    errors::ScriptError,
    utils::parse_named_account,
};

/// Deploy and manage the dice game contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Name of the network deployments are recorded under
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the file containing deployment records
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Additional named accounts, as `name=0xaddress`
    #[arg(long = "account", value_parser = parse_named_account)]
    pub accounts: Vec<(String, Address)>,

    /// Simulate against the recorded deployments without sending
    /// transactions or writing the deployments file
    #[arg(long)]
    pub dry_run: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the scripts
#[derive(Subcommand)]
pub enum Command {
    /// Run the deployment procedures
    Deploy(DeployArgs),
    /// Transfer ownership of a deployed contract
    TransferOwnership(TransferOwnershipArgs),
    /// List the deployments recorded for the network
    List,
}

impl Command {
    /// Run the command against the given context
    pub async fn run<C: DeploymentContext>(
        self,
        ctx: &C,
        store: &DeploymentStore,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, ctx).await,
            Command::TransferOwnership(args) => transfer_ownership(args, ctx).await,
            Command::List => list_deployments(store),
        }
    }
}

/// Arguments of the `deploy` command
#[derive(Args)]
pub struct DeployArgs {
    /// Only run the procedures carrying one of these tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Hand ownership of `RiggedRoll` to this address once deployed.
    /// A failed handover is logged but does not fail the deployment.
    #[arg(long)]
    pub transfer_owner: Option<String>,
}

/// Arguments of the `transfer-ownership` command
#[derive(Args)]
pub struct TransferOwnershipArgs {
    /// Deployment name of the contract
    #[arg(short, long)]
    pub contract: String,

    /// Address of the new owner
    #[arg(short = 'o', long)]
    pub new_owner: Address,
}
