//! Deployment procedures and the runner selecting them by tag

use std::fmt::{self, Display};

use itertools::Itertools;
use tracing::{error, info};

use crate::{
    constants::{DICE_GAME_TAG, RIGGED_ROLL_TAG},
    context::DeploymentContext,
    errors::ScriptError,
    types::DeployResult,
};

mod dice_game;
mod rigged_roll;

pub use dice_game::deploy_dice_game;
pub use rigged_roll::{deploy_rigged_roll, RiggedRollConfig};

/// The deployment procedures, in the order they run
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Procedure {
    /// Deploys the `DiceGame` contract
    DiceGame,
    /// Deploys the `RiggedRoll` contract against `DiceGame`
    RiggedRoll,
}

impl Procedure {
    /// Every procedure, in execution order
    pub const ALL: [Procedure; 2] = [Procedure::DiceGame, Procedure::RiggedRoll];

    /// The tags the runner selects this procedure by
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Procedure::DiceGame => &[DICE_GAME_TAG],
            Procedure::RiggedRoll => &[RIGGED_ROLL_TAG],
        }
    }

    /// Run the procedure against the given context
    pub async fn run<C: DeploymentContext>(
        &self,
        ctx: &C,
        config: &ProcedureConfig,
    ) -> Result<DeployResult, ScriptError> {
        match self {
            Procedure::DiceGame => deploy_dice_game(ctx).await,
            Procedure::RiggedRoll => deploy_rigged_roll(ctx, &config.rigged_roll).await,
        }
    }
}

impl Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::DiceGame => write!(f, "{DICE_GAME_TAG}"),
            Procedure::RiggedRoll => write!(f, "{RIGGED_ROLL_TAG}"),
        }
    }
}

/// Per-procedure configuration
#[derive(Debug, Clone, Default)]
pub struct ProcedureConfig {
    /// Configuration of the `RiggedRoll` deployment
    pub rigged_roll: RiggedRollConfig,
}

/// Select the procedures carrying any of `tags`, or all of them if `tags` is empty
pub fn select_procedures(tags: &[String]) -> Vec<Procedure> {
    Procedure::ALL
        .into_iter()
        .filter(|p| tags.is_empty() || p.tags().iter().any(|t| tags.iter().any(|s| s == t)))
        .collect()
}

/// Run the procedures selected by `tags` in order, stopping at the first failure
pub async fn run_procedures<C: DeploymentContext>(
    ctx: &C,
    tags: &[String],
    config: &ProcedureConfig,
) -> Result<Vec<(Procedure, DeployResult)>, ScriptError> {
    let procedures = select_procedures(tags);
    if procedures.is_empty() {
        info!("no procedures match tags [{}]", tags.iter().join(", "));
        return Ok(Vec::new());
    }

    info!("running procedures: {}", procedures.iter().join(", "));

    let mut results = Vec::with_capacity(procedures.len());
    for procedure in procedures {
        let result = procedure.run(ctx, config).await.inspect_err(|e| {
            error!("procedure {procedure} failed: {e}");
        })?;
        results.push((procedure, result));
    }

    Ok(results)
}
