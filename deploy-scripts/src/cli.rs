//! Definitions of CLI arguments and commands for deploy scripts

use std::{io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::{
    artifacts::ArtifactStore,
    commands::{deploy_contract, deploy_proxy, deploy_tokens},
    config::ProjectConfig,
    constants::{
        BRIDGE_SWAP_CONTRACT, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATIONS,
        DEFAULT_CONTRACT_LABEL, LOCALHOST_NETWORK, PROXY_CONTRACT, TEST_TOKEN_CONTRACT,
    },
    deployer::{ContractDeployer, RpcDeployer},
    errors::ScriptError,
    utils::write_line,
};

/// Deploy the bridge and test token contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, env = "DEPLOY_NETWORK", default_value = LOCALHOST_NETWORK, global = true)]
    pub network: String,

    /// The directory holding the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR, global = true)]
    pub artifacts: PathBuf,

    /// The number of confirmations to wait for on each transaction
    #[arg(
        long,
        default_value_t = DEFAULT_CONFIRMATIONS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub confirmations: u64,

    /// The log level, overridden by `RUST_LOG` when set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: Level,

    /// Format for logs, can be json or text
    #[arg(long, env = "LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands the CLI accepts
#[derive(Subcommand)]
pub enum Command {
    /// Commands that send transactions to the selected network
    #[command(flatten)]
    Deploy(DeployCommand),
    /// List the configured networks and whether their credentials are present
    Networks,
}

/// The deployment scripts
#[derive(Subcommand)]
pub enum DeployCommand {
    /// Deploy a single contract, without a proxy
    Deploy(DeployArgs),
    /// Deploy the three test tokens in sequence
    DeployTokens(DeployTokensArgs),
    /// Deploy the bridge behind an upgradeable proxy and initialize it
    DeployProxy(DeployProxyArgs),
}

/// Deploy a single contract, without a proxy
#[derive(Args)]
pub struct DeployArgs {
    /// The name of the contract to deploy
    #[arg(short, long, default_value = TEST_TOKEN_CONTRACT)]
    pub contract: String,

    /// The name the deployed contract is announced under
    #[arg(short, long, default_value = DEFAULT_CONTRACT_LABEL)]
    pub label: String,

    /// Constructor arguments, in declaration order
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Deploy the three test tokens in sequence
#[derive(Args)]
pub struct DeployTokensArgs {
    /// The name of the token contract
    #[arg(short, long, default_value = TEST_TOKEN_CONTRACT)]
    pub contract: String,
}

/// Deploy the bridge behind an upgradeable proxy and initialize it.
///
/// Calls made directly to the proxy contract will be forwarded to the implementation contract.
/// Upgrade calls can only be made to the proxy through its admin.
#[derive(Args)]
pub struct DeployProxyArgs {
    /// The name of the implementation contract
    #[arg(short, long, default_value = BRIDGE_SWAP_CONTRACT)]
    pub contract: String,

    /// The name of the proxy contract artifact
    #[arg(long, default_value = PROXY_CONTRACT)]
    pub proxy_artifact: String,
}

impl Command {
    /// Run the command against the named network
    pub async fn run(
        self,
        config: &ProjectConfig,
        network: &str,
        artifacts: &ArtifactStore,
        confirmations: u64,
        out: &mut impl Write,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(command) => {
                let network = config.network(network)?;
                let deployer = RpcDeployer::connect(network, confirmations).await?;
                command.run(artifacts, &deployer, out).await
            }
            Command::Networks => list_networks(config, out),
        }
    }
}

impl DeployCommand {
    /// Run the script through the given deployer
    pub async fn run(
        self,
        artifacts: &ArtifactStore,
        deployer: &impl ContractDeployer,
        out: &mut impl Write,
    ) -> Result<(), ScriptError> {
        match self {
            DeployCommand::Deploy(args) => {
                deploy_contract(args, artifacts, deployer, out).await.map(|_| ())
            }
            DeployCommand::DeployTokens(args) => {
                deploy_tokens(args, artifacts, deployer, out).await.map(|_| ())
            }
            DeployCommand::DeployProxy(args) => {
                deploy_proxy(args, artifacts, deployer, out).await.map(|_| ())
            }
        }
    }
}

/// Write one line per configured network, without revealing any secrets
fn list_networks(config: &ProjectConfig, out: &mut impl Write) -> Result<(), ScriptError> {
    for network in config.networks.values() {
        // The hosted endpoints carry the API key in their path
        let host = network
            .url
            .split_once("://")
            .map_or(network.url.as_str(), |(_, rest)| rest)
            .split('/')
            .next()
            .unwrap_or_default();
        let chain_id = network.chain_id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let credentials = match network.missing_vars() {
            [] => "ok".to_string(),
            missing => format!("missing {}", missing.join(", ")),
        };

        write_line(
            out,
            &format!("{:<16}{:<36}{:<12}{}", network.name, host, chain_id, credentials),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{list_networks, Cli, Command, DeployCommand};
    use crate::config::ProjectConfig;

    #[test]
    fn test_parse_deploy_with_args() {
        let cli = Cli::parse_from([
            "deploy-scripts",
            "--network",
            "sepolia",
            "deploy",
            "--contract",
            "TestToken",
            "Token A",
            "TA",
        ]);

        assert_eq!(cli.network, "sepolia");
        match cli.command {
            Command::Deploy(DeployCommand::Deploy(args)) => {
                assert_eq!(args.contract, "TestToken");
                assert_eq!(args.label, "Bridge");
                assert_eq!(args.args, vec!["Token A", "TA"]);
            }
            _ => panic!("expected the deploy command"),
        }
    }

    #[test]
    fn test_parse_deploy_proxy_defaults() {
        let cli = Cli::parse_from(["deploy-scripts", "deploy-proxy"]);

        assert_eq!(cli.network, "localhost");
        assert_eq!(cli.confirmations, 1);
        match cli.command {
            Command::Deploy(DeployCommand::DeployProxy(args)) => {
                assert_eq!(args.contract, "BridgeSwap");
                assert_eq!(args.proxy_artifact, "TransparentUpgradeableProxy");
            }
            _ => panic!("expected the deploy-proxy command"),
        }
    }

    #[test]
    fn test_parse_negative_constructor_arg() {
        let cli = Cli::parse_from(["deploy-scripts", "deploy", "--contract", "Vault", "-5", "TA"]);

        match cli.command {
            Command::Deploy(DeployCommand::Deploy(args)) => {
                assert_eq!(args.contract, "Vault");
                assert_eq!(args.args, vec!["-5", "TA"]);
            }
            _ => panic!("expected the deploy command"),
        }
    }

    #[test]
    fn test_parse_rejects_zero_confirmations() {
        let res = Cli::try_parse_from(["deploy-scripts", "--confirmations", "0", "deploy-proxy"]);
        assert!(res.is_err());

        let cli = Cli::parse_from(["deploy-scripts", "--confirmations", "3", "deploy-proxy"]);
        assert_eq!(cli.confirmations, 3);
    }

    #[test]
    fn test_list_networks_hides_secrets() {
        let config = ProjectConfig::from_lookup(|var| match var {
            "Sepolia_API_KEY" => Some("sepolia-secret".to_string()),
            "PRIVATE_KEY" => Some("0xdeadbeef".to_string()),
            _ => None,
        });

        let mut out = Vec::new();
        list_networks(&config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("localhost"));
        assert!(lines[1].contains("polygon-mumbai.g.alchemy.com"));
        assert!(lines[1].ends_with("missing Mumbai_API_KEY"));
        assert!(lines[2].contains("11155111"));
        assert!(lines[2].ends_with("ok"));
        assert!(!out.contains("sepolia-secret"));
        assert!(!out.contains("0xdeadbeef"));
    }
}
