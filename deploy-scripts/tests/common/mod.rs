//! Shared fixtures for the deploy script tests

use std::{fs, sync::Mutex};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use deploy_scripts::{artifacts::ArtifactStore, deployer::ContractDeployer, errors::ScriptError};
use serde_json::{json, Value};
use tempfile::TempDir;

/// The creation bytecode shared by every fixture artifact
pub const FIXTURE_BYTECODE: &str = "0x608060405234801561001057600080fd5b50";

/// The address the mock deployer sends from
pub const DEPLOYER: Address = Address::repeat_byte(0xde);

/// The admin address the mock reports in the proxy admin slot
pub const PROXY_ADMIN: Address = Address::repeat_byte(0xad);

/// An interaction observed by the mock deployer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A confirmed deployment
    Deployed {
        contract: String,
        creation_code: Bytes,
        address: Address,
    },
    /// A storage read
    StorageRead { address: Address, slot: U256 },
    /// A confirmed call
    Called { to: Address, calldata: Bytes },
}

/// An in-memory deployer that records every interaction
#[derive(Default)]
pub struct MockDeployer {
    /// The interactions seen so far, in order
    events: Mutex<Vec<Event>>,
    /// The zero-based index of a deployment to reject
    reject_deploy: Option<usize>,
    /// Whether to reject every call
    reject_calls: bool,
    /// The number of deployments attempted so far
    attempts: Mutex<usize>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that rejects the `index`th deployment
    pub fn rejecting_deploy(index: usize) -> Self {
        Self { reject_deploy: Some(index), ..Self::default() }
    }

    /// A mock that rejects every call
    pub fn rejecting_calls() -> Self {
        Self { reject_calls: true, ..Self::default() }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// The address the `n`th deployment is given
    pub fn address_for(n: usize) -> Address {
        Address::with_last_byte(n as u8 + 1)
    }
}

#[async_trait]
impl ContractDeployer for MockDeployer {
    fn deployer_address(&self) -> Address {
        DEPLOYER
    }

    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Address, ScriptError> {
        let index = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts - 1
        };

        if self.reject_deploy == Some(index) {
            return Err(ScriptError::ContractDeployment(format!("{contract}: rejected by mock")));
        }

        let address = Self::address_for(index);
        self.events.lock().unwrap().push(Event::Deployed {
            contract: contract.to_string(),
            creation_code,
            address,
        });
        Ok(address)
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        if self.reject_calls {
            return Err(ScriptError::ContractInteraction("execution reverted".to_string()));
        }

        self.events.lock().unwrap().push(Event::Called { to, calldata });
        Ok(TxHash::repeat_byte(0x11))
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256, ScriptError> {
        self.events.lock().unwrap().push(Event::StorageRead { address, slot });
        Ok(U256::from_be_slice(PROXY_ADMIN.as_slice()))
    }
}

/// Write the fixture artifacts into a fresh directory, returning it with a store over it
pub fn setup_artifacts() -> (TempDir, ArtifactStore) {
    let root = TempDir::new().unwrap();

    write_artifact(
        &root,
        "contracts/TestToken.sol",
        "TestToken",
        json!([constructor(&[("name", "string"), ("symbol", "string")])]),
    );
    write_artifact(
        &root,
        "contracts/BridgeSwap.sol",
        "BridgeSwap",
        json!([constructor(&[]), nullary_function("Initialize")]),
    );
    write_artifact(
        &root,
        "@openzeppelin/contracts/proxy/transparent/TransparentUpgradeableProxy.sol",
        "TransparentUpgradeableProxy",
        json!([constructor(&[
            ("_logic", "address"),
            ("initialOwner", "address"),
            ("_data", "bytes")
        ])]),
    );

    let store = ArtifactStore::new(root.path());
    (root, store)
}

fn write_artifact(root: &TempDir, source: &str, contract: &str, abi: Value) {
    let dir = root.path().join(source);
    fs::create_dir_all(&dir).unwrap();

    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": contract,
        "sourceName": source,
        "abi": abi,
        "bytecode": FIXTURE_BYTECODE,
        "deployedBytecode": FIXTURE_BYTECODE,
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(dir.join(format!("{contract}.json")), artifact.to_string()).unwrap();
}

fn constructor(inputs: &[(&str, &str)]) -> Value {
    let inputs: Vec<Value> = inputs
        .iter()
        .map(|(name, ty)| json!({ "name": name, "type": ty, "internalType": ty }))
        .collect();
    json!({ "type": "constructor", "stateMutability": "nonpayable", "inputs": inputs })
}

fn nullary_function(name: &str) -> Value {
    json!({
        "type": "function",
        "name": name,
        "inputs": [],
        "outputs": [],
        "stateMutability": "nonpayable"
    })
}

/// The lines written to a script's output
pub fn output_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec()).unwrap().lines().map(str::to_string).collect()
}
