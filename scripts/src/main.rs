use clap::Parser;
use scripts::{
    artifacts::ArtifactDir,
    cli::Cli,
    commands::report_dry_run,
    constants::DEFAULT_LOG_FILTER,
    deployments::DeploymentStore,
    errors::ScriptError,
    utils::{setup_dry_run_context, setup_network_context},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        network,
        deployments_path,
        artifacts_dir,
        accounts,
        dry_run,
        command,
    } = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().pretty().with_env_filter(filter).init();

    let store = DeploymentStore::new(deployments_path, network);
    let artifacts = ArtifactDir::new(artifacts_dir);

    if dry_run {
        let ctx = setup_dry_run_context(priv_key.as_deref(), accounts, &store, artifacts)?;
        command.run(&ctx, &store).await?;
        report_dry_run(&ctx).await;
        return Ok(());
    }

    let ctx =
        setup_network_context(priv_key.as_deref(), &rpc_url, accounts, store.clone(), artifacts)?;
    command.run(&ctx, &store).await
}
