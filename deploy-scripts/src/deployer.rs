//! The seam through which the scripts send transactions to a network

use std::str::FromStr;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{config::NetworkDescriptor, errors::ScriptError};

/// Sends deployments and calls, resolving each only once it is confirmed
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// The address transactions are sent from
    fn deployer_address(&self) -> Address;

    /// Deploy `creation_code` and return the address of the confirmed contract
    ///
    /// `contract` names the deployment in logs
    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Address, ScriptError>;

    /// Send `calldata` to `to` and return the hash of the confirmed transaction
    async fn call(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError>;

    /// Read a storage slot of the contract at `address`
    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256, ScriptError>;
}

/// A deployer backed by an HTTP RPC endpoint and a local signer
pub struct RpcDeployer {
    /// The wallet-carrying provider
    provider: DynProvider,
    /// The signer's address
    sender: Address,
    /// The number of confirmations awaited on each transaction
    confirmations: u64,
}

impl RpcDeployer {
    /// Connect to `network`, signing with its first account
    ///
    /// Fails before any request is made if the network's credentials are
    /// missing, and afterwards if the endpoint reports an unexpected chain ID
    pub async fn connect(
        network: &NetworkDescriptor,
        confirmations: u64,
    ) -> Result<Self, ScriptError> {
        network.ensure_credentials()?;

        let priv_key = network.accounts.first().ok_or_else(|| {
            ScriptError::ClientInitialization(format!("no account for `{}`", network.name))
        })?;
        let signer = PrivateKeySigner::from_str(priv_key)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let sender = signer.address();

        let url =
            Url::parse(&network.url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);
        let provider = DynProvider::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        if let Some(expected) = network.chain_id {
            if expected != chain_id {
                return Err(ScriptError::ConfigError(format!(
                    "network `{}` expects chain ID {}, but the RPC endpoint reports {}",
                    network.name, expected, chain_id
                )));
            }
        }

        info!(network = %network.name, chain_id, deployer = %sender, "connected");
        Ok(Self { provider, sender, confirmations })
    }

    /// Send a transaction and wait for its receipt
    async fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        let pending = self.provider.send_transaction(tx).await.map_err(|e| e.to_string())?;
        debug!(tx_hash = %pending.tx_hash(), "awaiting confirmation");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| e.to_string())?;

        if !receipt.status() {
            return Err(format!("transaction {} reverted", receipt.transaction_hash));
        }

        debug!(
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "transaction confirmed"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl ContractDeployer for RpcDeployer {
    fn deployer_address(&self) -> Address {
        self.sender
    }

    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_deploy_code(creation_code);

        let receipt = self
            .send(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{contract}: receipt for {} has no contract address",
                receipt.transaction_hash
            ))
        })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(calldata);

        let receipt = self.send(tx).await.map_err(ScriptError::ContractInteraction)?;
        Ok(receipt.transaction_hash)
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256, ScriptError> {
        self.provider
            .get_storage_at(address, slot)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}
