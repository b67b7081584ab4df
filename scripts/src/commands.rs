//! Implementations of the various deploy scripts

use tracing::info;

use crate::{
    cli::{DeployArgs, TransferOwnershipArgs},
    constants::DEPLOYER_ACCOUNT,
    context::{DeploymentContext, InMemoryContext, SubmittedTransaction},
    deployments::DeploymentStore,
    errors::ScriptError,
    procedures::{run_procedures, ProcedureConfig, RiggedRollConfig},
};

/// Run the procedures selected by the given tags
pub async fn deploy<C: DeploymentContext>(args: DeployArgs, ctx: &C) -> Result<(), ScriptError> {
    let config = ProcedureConfig {
        rigged_roll: RiggedRollConfig { new_owner: args.transfer_owner },
    };

    let results = run_procedures(ctx, &args.tags, &config).await?;
    for (procedure, result) in results {
        let status = if result.newly_deployed { "deployed" } else { "reused" };
        println!("{procedure}: {status} at {:#x}", result.record.address);
    }

    Ok(())
}

/// Transfer ownership of a deployed contract, failing if the transfer fails
pub async fn transfer_ownership<C: DeploymentContext>(
    args: TransferOwnershipArgs,
    ctx: &C,
) -> Result<(), ScriptError> {
    let deployer = ctx.named_accounts().await?.get(DEPLOYER_ACCOUNT)?;
    let contract = ctx.get_contract(&args.contract, Some(deployer)).await?;
    let tx_hash = ctx.transfer_ownership(&contract, args.new_owner).await?;

    println!("Ownership of {} transferred to {:#x} in {tx_hash}", args.contract, args.new_owner);
    Ok(())
}

/// Print the deployments recorded for the store's network
pub fn list_deployments(store: &DeploymentStore) -> Result<(), ScriptError> {
    let records = store.records()?;
    if records.is_empty() {
        println!("No deployments on network `{}`", store.network());
        return Ok(());
    }

    for (name, record) in records {
        println!("{name}: {:#x}", record.address);
        println!("\tdeployer: {:#x}", record.deployer);
        println!("\targs: [{}]", record.args.join(", "));
        println!("\ttx: {}", record.transaction_hash);
    }

    Ok(())
}

/// Log what a dry run would have sent
pub async fn report_dry_run(ctx: &InMemoryContext) {
    let transactions = ctx.transactions().await;
    info!("dry run complete, {} transaction(s) simulated, none sent", transactions.len());

    for tx in transactions {
        match tx {
            SubmittedTransaction::Deploy { name, from, address, .. } => {
                info!("would deploy \"{name}\" from {from} at {address}");
            }
            SubmittedTransaction::TransferOwnership { contract, new_owner, reverted, .. } => {
                info!("would transfer ownership of {contract} to {new_owner} (reverts: {reverted})");
            }
        }
    }
}
