//! Network, compiler, and verification settings, assembled from the environment

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    constants::{
        ETHERSCAN_API_KEY_VAR, LOCALHOST_CHAIN_ID, LOCALHOST_NETWORK, LOCALHOST_RPC_URL,
        MUMBAI_API_KEY_VAR, MUMBAI_CHAIN_ID, MUMBAI_NETWORK, MUMBAI_RPC_URL_PREFIX,
        OPTIMIZER_RUNS, POLYGONSCAN_API_KEY_VAR, PRIVATE_KEY_VAR, SEPOLIA_API_KEY_VAR,
        SEPOLIA_CHAIN_ID, SEPOLIA_NETWORK, SEPOLIA_RPC_URL_PREFIX, SOLC_VERSION,
    },
    errors::ScriptError,
};

/// Optimizer settings passed to the Solidity compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerSettings {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u32,
}

/// The compiler settings the contract artifacts were built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidityConfig {
    /// The compiler version
    pub version: &'static str,
    /// The optimizer settings
    pub optimizer: OptimizerSettings,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: SOLC_VERSION,
            optimizer: OptimizerSettings { enabled: true, runs: OPTIMIZER_RUNS },
        }
    }
}

/// A network that contracts may be deployed to
#[derive(Debug, Clone)]
pub struct NetworkDescriptor {
    /// The name the network is selected by
    pub name: String,
    /// The RPC endpoint of the network
    pub url: String,
    /// Private keys of the accounts that sign for this network
    pub accounts: Vec<String>,
    /// The chain ID the RPC endpoint is expected to report
    pub chain_id: Option<u64>,
    /// Environment variables that were absent when the descriptor was built
    missing: Vec<&'static str>,
}

impl NetworkDescriptor {
    /// The environment variables this network needed but did not find
    pub fn missing_vars(&self) -> &[&'static str] {
        &self.missing
    }

    /// Check that every credential this network needs is present
    ///
    /// Configuration assembly never fails, so this must be called before the
    /// first transaction is sent
    pub fn ensure_credentials(&self) -> Result<(), ScriptError> {
        if !self.missing.is_empty() {
            return Err(ScriptError::ConfigError(format!(
                "network `{}` is missing environment variables: {}",
                self.name,
                self.missing.iter().join(", ")
            )));
        }

        if self.accounts.is_empty() {
            return Err(ScriptError::ConfigError(format!(
                "network `{}` has no signer accounts",
                self.name
            )));
        }

        Ok(())
    }
}

/// Block explorer API keys used by contract verification
#[derive(Debug, Clone, Default)]
pub struct EtherscanConfig {
    /// API keys indexed by network name
    pub api_keys: BTreeMap<String, String>,
}

/// The full project configuration
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Compiler settings
    pub solidity: SolidityConfig,
    /// Deployment targets indexed by name
    pub networks: BTreeMap<String, NetworkDescriptor>,
    /// Verification settings
    pub etherscan: EtherscanConfig,
}

impl ProjectConfig {
    /// Build the configuration from the process environment. A `.env` file
    /// must already have been loaded into it by the caller
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration, reading each variable through `lookup`
    ///
    /// Absent variables are interpolated as empty strings and recorded on the
    /// networks that need them
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let networks = [
            env.remote_network(
                SEPOLIA_NETWORK,
                SEPOLIA_RPC_URL_PREFIX,
                SEPOLIA_API_KEY_VAR,
                SEPOLIA_CHAIN_ID,
            ),
            env.remote_network(
                MUMBAI_NETWORK,
                MUMBAI_RPC_URL_PREFIX,
                MUMBAI_API_KEY_VAR,
                MUMBAI_CHAIN_ID,
            ),
            env.local_network(),
        ]
        .into_iter()
        .map(|network| (network.name.clone(), network))
        .collect();

        let api_keys = [
            (SEPOLIA_NETWORK, ETHERSCAN_API_KEY_VAR),
            (MUMBAI_NETWORK, POLYGONSCAN_API_KEY_VAR),
        ]
        .into_iter()
        .map(|(network, var)| (network.to_string(), env.get(var).unwrap_or_default()))
        .collect();

        Self {
            solidity: SolidityConfig::default(),
            networks,
            etherscan: EtherscanConfig { api_keys },
        }
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Result<&NetworkDescriptor, ScriptError> {
        self.networks.get(name).ok_or_else(|| {
            ScriptError::ConfigError(format!(
                "unknown network `{}`, expected one of: {}",
                name,
                self.networks.keys().join(", ")
            ))
        })
    }
}

/// Reads environment variables through a lookup function
struct EnvReader<F> {
    /// The variable lookup
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    /// Read a variable, treating an empty value as absent
    fn get(&self, var: &str) -> Option<String> {
        (self.lookup)(var).filter(|value| !value.is_empty())
    }

    /// Read the deployer key into an accounts list
    fn accounts(&self, missing: &mut Vec<&'static str>) -> Vec<String> {
        match self.get(PRIVATE_KEY_VAR) {
            Some(key) => vec![key],
            None => {
                missing.push(PRIVATE_KEY_VAR);
                vec![]
            }
        }
    }

    /// Build a network served by a hosted RPC endpoint keyed by `api_key_var`
    fn remote_network(
        &self,
        name: &str,
        url_prefix: &str,
        api_key_var: &'static str,
        chain_id: u64,
    ) -> NetworkDescriptor {
        let mut missing = Vec::new();
        let api_key = self.get(api_key_var).unwrap_or_else(|| {
            missing.push(api_key_var);
            String::new()
        });
        let accounts = self.accounts(&mut missing);

        NetworkDescriptor {
            name: name.to_string(),
            url: format!("{url_prefix}{api_key}"),
            accounts,
            chain_id: Some(chain_id),
            missing,
        }
    }

    /// Build the local development network
    fn local_network(&self) -> NetworkDescriptor {
        let mut missing = Vec::new();
        let accounts = self.accounts(&mut missing);

        NetworkDescriptor {
            name: LOCALHOST_NETWORK.to_string(),
            url: LOCALHOST_RPC_URL.to_string(),
            accounts,
            chain_id: Some(LOCALHOST_CHAIN_ID),
            missing,
        }
    }
}
