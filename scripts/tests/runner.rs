use std::fs;

use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use eyre::Result;
use scripts::{
    artifacts::{bytecode_hash, ArtifactDir},
    cli::DeployArgs,
    commands::deploy,
    constants::{
        DICE_GAME_CONTRACT, DICE_GAME_FUNDING_WEI, DICE_GAME_TAG, RIGGED_ROLL_CONTRACT,
        RIGGED_ROLL_TAG,
    },
    context::{InMemoryContext, SubmittedTransaction},
    deployments::DeploymentStore,
    errors::ScriptError,
    procedures::{run_procedures, select_procedures, Procedure, ProcedureConfig},
    types::{DeploymentRecord, NamedAccounts},
    utils::setup_dry_run_context,
};

/// The deployer account, the first default Anvil account
const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// The first default Anvil private key
const DEPLOYER_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn empty_chain() -> InMemoryContext {
    InMemoryContext::new(NamedAccounts::new(Some(DEPLOYER), []))
        .with_artifact(DICE_GAME_CONTRACT, vec![0x60, 0x01])
        .with_artifact(RIGGED_ROLL_CONTRACT, vec![0x60, 0x02])
}

fn tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_select_by_tag() {
    assert_eq!(select_procedures(&[]), vec![Procedure::DiceGame, Procedure::RiggedRoll]);
    assert_eq!(select_procedures(&tags(&["RiggedRoll"])), vec![Procedure::RiggedRoll]);
    assert_eq!(
        select_procedures(&tags(&["RiggedRoll", "DiceGame"])),
        vec![Procedure::DiceGame, Procedure::RiggedRoll]
    );
    assert!(select_procedures(&tags(&["Unknown"])).is_empty());

    // Procedures display as the tag that selects them
    for procedure in Procedure::ALL {
        assert_eq!(select_procedures(&[procedure.to_string()]), vec![procedure]);
    }
    assert_eq!(Procedure::DiceGame.to_string(), DICE_GAME_TAG);
    assert_eq!(Procedure::RiggedRoll.to_string(), RIGGED_ROLL_TAG);
}

#[tokio::test]
async fn test_full_run_wires_contracts() -> Result<()> {
    let ctx = empty_chain();

    let results = run_procedures(&ctx, &[], &ProcedureConfig::default()).await?;
    assert_eq!(results.len(), 2);

    let (first, dice_game) = &results[0];
    let (second, rigged_roll) = &results[1];
    assert_eq!(*first, Procedure::DiceGame);
    assert_eq!(*second, Procedure::RiggedRoll);
    assert_eq!(dice_game.record.value, DICE_GAME_FUNDING_WEI);
    assert_eq!(rigged_roll.record.args, vec![dice_game.record.address.to_string()]);

    let transactions = ctx.transactions().await;
    assert_eq!(transactions.len(), 2);
    assert!(matches!(
        &transactions[0],
        SubmittedTransaction::Deploy { name, value, .. }
            if name == DICE_GAME_CONTRACT && *value == DICE_GAME_FUNDING_WEI
    ));

    // A second run reuses both deployments
    let rerun = run_procedures(&ctx, &[], &ProcedureConfig::default()).await?;
    assert!(rerun.iter().all(|(_, r)| !r.newly_deployed));
    assert_eq!(ctx.transactions().await.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_rigged_roll_tag_needs_dice_game() -> Result<()> {
    let ctx = empty_chain();

    let res = run_procedures(&ctx, &tags(&["RiggedRoll"]), &ProcedureConfig::default()).await;

    assert!(matches!(res, Err(ScriptError::DependencyNotFound(_))));
    assert!(ctx.transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_tagged_run_after_dice_game() -> Result<()> {
    let ctx = empty_chain();

    run_procedures(&ctx, &tags(&["DiceGame"]), &ProcedureConfig::default()).await?;
    let results = run_procedures(&ctx, &tags(&["RiggedRoll"]), &ProcedureConfig::default()).await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, Procedure::RiggedRoll);
    assert_eq!(ctx.records().await.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_seeded_chain_continues_deployer_nonce() -> Result<()> {
    // DiceGame recorded as the deployer's first creation
    let dice_game = DEPLOYER.create(0);
    let record = DeploymentRecord {
        address: dice_game,
        deployer: DEPLOYER,
        args: vec![],
        encoded_args: Bytes::new(),
        bytecode_hash: bytecode_hash(&[0x60, 0x01]),
        transaction_hash: TxHash::repeat_byte(0xdd),
        block_number: Some(1),
        value: DICE_GAME_FUNDING_WEI,
    };
    let ctx = empty_chain().with_deployment(DICE_GAME_CONTRACT, record);

    let results = run_procedures(&ctx, &[], &ProcedureConfig::default()).await?;

    let (_, dice_game_result) = &results[0];
    let (_, rigged_roll) = &results[1];
    assert!(!dice_game_result.newly_deployed);
    assert!(rigged_roll.newly_deployed);
    assert_eq!(rigged_roll.record.address, DEPLOYER.create(1));
    assert_ne!(rigged_roll.record.address, dice_game);

    // The seeded contract is left as it was
    assert_eq!(ctx.records().await[DICE_GAME_CONTRACT].address, dice_game);
    assert_eq!(ctx.owner_of(dice_game).await, Some(DEPLOYER));
    assert_eq!(rigged_roll.record.value, U256::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_leaves_deployments_file_untouched() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifacts_dir = dir.path().join("artifacts");
    fs::create_dir_all(&artifacts_dir)?;
    fs::write(artifacts_dir.join("DiceGame.json"), r#"{ "bytecode": "0x6001" }"#)?;
    fs::write(
        artifacts_dir.join("RiggedRoll.json"),
        r#"{ "bytecode": { "object": "0x6002" } }"#,
    )?;

    let deployments_path = dir.path().join("deployments.json");
    let store = DeploymentStore::new(&deployments_path, "localhost");
    let ctx = setup_dry_run_context(
        Some(DEPLOYER_PKEY),
        vec![],
        &store,
        ArtifactDir::new(&artifacts_dir),
    )?;

    deploy(DeployArgs { tags: vec![], transfer_owner: None }, &ctx).await?;

    assert_eq!(ctx.transactions().await.len(), 2);
    assert!(ctx.records().await.values().all(|r| r.deployer == DEPLOYER));
    assert!(!deployments_path.exists());

    Ok(())
}
