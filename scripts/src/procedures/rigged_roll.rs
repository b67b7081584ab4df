//! Deployment of the `RiggedRoll` contract against the deployed `DiceGame`

use std::str::FromStr;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use tracing::warn;

use crate::{
    constants::{DEPLOYER_ACCOUNT, DICE_GAME_CONTRACT, RIGGED_ROLL_CONTRACT},
    context::DeploymentContext,
    errors::ScriptError,
    types::{DeployOptions, DeployResult},
};

/// Configuration of the `RiggedRoll` deployment
#[derive(Debug, Clone, Default)]
pub struct RiggedRollConfig {
    /// The address, in hex, to hand ownership of `RiggedRoll` to once deployed.
    /// `None` leaves the deployer as owner.
    pub new_owner: Option<String>,
}

/// Deploy `RiggedRoll` wired to the deployed `DiceGame`.
///
/// Fails if the `deployer` account is not configured or `DiceGame` is not
/// deployed on the active network. When an owner is configured, ownership is
/// handed over afterwards; a failed handover is logged and does not fail the
/// deployment.
pub async fn deploy_rigged_roll<C: DeploymentContext>(
    ctx: &C,
    config: &RiggedRollConfig,
) -> Result<DeployResult, ScriptError> {
    let deployer = ctx.named_accounts().await?.get(DEPLOYER_ACCOUNT)?;

    let dice_game = ctx.get_contract(DICE_GAME_CONTRACT, None).await?;
    let dice_game_address = ctx.get_address(&dice_game).await?;

    let options = DeployOptions {
        from: deployer,
        log: true,
        args: vec![DynSolValue::Address(dice_game_address)],
        auto_mine: true,
        value: U256::ZERO,
    };
    let result = ctx.deploy(RIGGED_ROLL_CONTRACT, options).await?;

    if let Some(new_owner) = &config.new_owner {
        let rigged_roll = ctx.get_contract(RIGGED_ROLL_CONTRACT, Some(deployer)).await?;

        let transfer = async {
            let new_owner = Address::from_str(new_owner)
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
            ctx.transfer_ownership(&rigged_roll, new_owner).await
        };

        if let Err(e) = transfer.await {
            warn!("ownership transfer of \"{RIGGED_ROLL_CONTRACT}\" failed: {e}");
        }
    }

    Ok(result)
}
