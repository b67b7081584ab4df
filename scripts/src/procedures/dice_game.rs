//! Deployment of the `DiceGame` contract

use crate::{
    constants::{DEPLOYER_ACCOUNT, DICE_GAME_CONTRACT, DICE_GAME_FUNDING_WEI},
    context::DeploymentContext,
    errors::ScriptError,
    types::{DeployOptions, DeployResult},
};

/// Deploy `DiceGame`, funding its prize pool at construction
pub async fn deploy_dice_game<C: DeploymentContext>(ctx: &C) -> Result<DeployResult, ScriptError> {
    let deployer = ctx.named_accounts().await?.get(DEPLOYER_ACCOUNT)?;

    let options = DeployOptions {
        log: true,
        auto_mine: true,
        value: DICE_GAME_FUNDING_WEI,
        ..DeployOptions::new(deployer)
    };
    ctx.deploy(DICE_GAME_CONTRACT, options).await
}
