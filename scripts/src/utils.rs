//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};

use crate::{
    artifacts::ArtifactDir,
    context::{InMemoryContext, NetworkContext},
    deployments::DeploymentStore,
    errors::ScriptError,
    types::NamedAccounts,
};

/// Parse a hex private key into a local signer
pub fn parse_signer(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Sets up the provider for the given RPC url, attaching a wallet for the
/// private key if one is given.
///
/// No request is made to the node here.
pub fn setup_client(
    priv_key: Option<&str>,
    rpc_url: &str,
) -> Result<(DynProvider, Option<Address>), ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    match priv_key {
        Some(priv_key) => {
            let signer = parse_signer(priv_key)?;
            let address = signer.address();
            let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
            Ok((DynProvider::new(provider), Some(address)))
        }
        None => {
            let provider = ProviderBuilder::new().connect_http(url);
            Ok((DynProvider::new(provider), None))
        }
    }
}

/// Build a context deploying through the node at `rpc_url`
pub fn setup_network_context(
    priv_key: Option<&str>,
    rpc_url: &str,
    accounts: Vec<(String, Address)>,
    store: DeploymentStore,
    artifacts: ArtifactDir,
) -> Result<NetworkContext, ScriptError> {
    let (provider, signer) = setup_client(priv_key, rpc_url)?;
    let accounts = NamedAccounts::new(signer, accounts);

    Ok(NetworkContext::new(provider, signer, accounts, store, artifacts))
}

/// Build an in-memory context seeded with the network's recorded deployments
pub fn setup_dry_run_context(
    priv_key: Option<&str>,
    accounts: Vec<(String, Address)>,
    store: &DeploymentStore,
    artifacts: ArtifactDir,
) -> Result<InMemoryContext, ScriptError> {
    let signer = priv_key.map(parse_signer).transpose()?.map(|s| s.address());
    let accounts = NamedAccounts::new(signer, accounts);

    Ok(InMemoryContext::new(accounts)
        .with_artifact_dir(artifacts)
        .with_deployments(store.records()?))
}

/// Parse a named account given as `name=0xaddress`
pub fn parse_named_account(s: &str) -> Result<(String, Address), String> {
    let (name, address) =
        s.split_once('=').ok_or_else(|| format!("expected `name=0xaddress`, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing account name in `{s}`"));
    }

    let address = Address::from_str(address.trim()).map_err(|e| e.to_string())?;
    Ok((name.to_string(), address))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    /// The first default Anvil account
    const ANVIL_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_named_account() {
        let (name, addr) =
            parse_named_account("treasury=0x6A1a956e2C58298D1d4df38647e790925b0431e1").unwrap();
        assert_eq!(name, "treasury");
        assert_eq!(addr, address!("0x6A1a956e2C58298D1d4df38647e790925b0431e1"));

        assert!(parse_named_account("0x6A1a956e2C58298D1d4df38647e790925b0431e1").is_err());
        assert!(parse_named_account("=0x6A1a956e2C58298D1d4df38647e790925b0431e1").is_err());
        assert!(parse_named_account("treasury=0x1234").is_err());
    }

    #[test]
    fn test_signer_address() {
        let signer = parse_signer(ANVIL_PKEY).unwrap();
        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(parse_signer("not a key").is_err());
    }

    #[test]
    fn test_setup_client_without_key() {
        let (_, signer) = setup_client(None, "http://127.0.0.1:8545").unwrap();
        assert_eq!(signer, None);
        assert!(setup_client(None, "not a url").is_err());
    }
}
