//! Implementations of the various deploy scripts

use std::io::Write;

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::{
    artifacts::ArtifactStore,
    cli::{DeployArgs, DeployProxyArgs, DeployTokensArgs},
    constants::{PROXY_ADMIN_STORAGE_SLOT, TEST_TOKENS},
    deployer::ContractDeployer,
    errors::ScriptError,
    utils::{
        address_from_storage_word, bridge_initialize_calldata, proxy_constructor_args,
        proxy_initializer_calldata, write_line,
    },
};

/// The addresses produced by a proxied deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyDeployment {
    /// The implementation contract
    pub implementation: Address,
    /// The proxy contract, through which the implementation is used
    pub proxy: Address,
    /// The proxy admin contract, zero if the proxy has none
    pub proxy_admin: Address,
}

/// Deploy a single contract and announce its address
pub async fn deploy_contract(
    args: DeployArgs,
    artifacts: &ArtifactStore,
    deployer: &impl ContractDeployer,
    out: &mut impl Write,
) -> Result<Address, ScriptError> {
    deploy_and_announce(&args.contract, &args.args, &args.label, artifacts, deployer, out).await
}

/// Deploy the three test tokens, one after another
pub async fn deploy_tokens(
    args: DeployTokensArgs,
    artifacts: &ArtifactStore,
    deployer: &impl ContractDeployer,
    out: &mut impl Write,
) -> Result<Vec<Address>, ScriptError> {
    let mut addresses = Vec::with_capacity(TEST_TOKENS.len());
    for (label, name, symbol) in TEST_TOKENS {
        let ctor_args = [name.to_string(), symbol.to_string()];
        let address =
            deploy_and_announce(&args.contract, &ctor_args, label, artifacts, deployer, out)
                .await?;
        addresses.push(address);
    }

    Ok(addresses)
}

/// Deploy the bridge behind an upgradeable proxy, then initialize it
/// through the proxy
pub async fn deploy_proxy(
    args: DeployProxyArgs,
    artifacts: &ArtifactStore,
    deployer: &impl ContractDeployer,
    out: &mut impl Write,
) -> Result<ProxyDeployment, ScriptError> {
    let implementation_artifact = artifacts.resolve(&args.contract)?;
    let proxy_artifact = artifacts.resolve(&args.proxy_artifact)?;

    // Deploy the implementation contract
    let implementation = deployer
        .deploy(&args.contract, implementation_artifact.creation_code(&[])?)
        .await?;
    info!(contract = %args.contract, %implementation, "implementation deployed");

    // Deploy the proxy, pointed at the implementation
    let init_data = proxy_initializer_calldata(&implementation_artifact);
    let ctor_args = proxy_constructor_args(
        &proxy_artifact,
        implementation,
        deployer.deployer_address(),
        init_data,
    )?;
    let proxy = deployer
        .deploy(&args.proxy_artifact, proxy_artifact.creation_code_with(&ctor_args)?)
        .await?;
    write_line(out, &format!("The Bridge contract deployed to {proxy}"))?;

    // Get proxy admin contract address
    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    let admin_word = deployer
        .storage_at(proxy, U256::from_be_bytes(PROXY_ADMIN_STORAGE_SLOT.0))
        .await?;
    let proxy_admin = address_from_storage_word(admin_word);
    if proxy_admin.is_zero() {
        debug!(%proxy, "proxy has no admin contract");
    } else {
        info!(%proxy_admin, "proxy admin deployed");
    }

    deployer.call(proxy, bridge_initialize_calldata()).await?;
    write_line(out, "The Contract has inited")?;

    Ok(ProxyDeployment { implementation, proxy, proxy_admin })
}

/// Resolve, deploy, and announce a contract under `label`
async fn deploy_and_announce(
    contract: &str,
    ctor_args: &[String],
    label: &str,
    artifacts: &ArtifactStore,
    deployer: &impl ContractDeployer,
    out: &mut impl Write,
) -> Result<Address, ScriptError> {
    let artifact = artifacts.resolve(contract)?;
    let creation_code = artifact.creation_code(ctor_args)?;

    let address = deployer.deploy(contract, creation_code).await?;
    write_line(out, &format!("The {label} contract deployed to {address}"))?;

    Ok(address)
}
