//! Utilities for the deploy scripts.

use std::io::Write;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::{
    artifacts::Artifact,
    constants::{DEFAULT_INITIALIZER, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT},
    errors::ScriptError,
    solidity::{initializeCall, InitializeCall},
};

/// Prepare the data the proxy constructor delegates to the implementation
///
/// This is a call to `initialize()` if the implementation defines one, and
/// empty otherwise
pub fn proxy_initializer_calldata(implementation: &Artifact) -> Bytes {
    if implementation.has_nullary_function(DEFAULT_INITIALIZER) {
        initializeCall {}.abi_encode().into()
    } else {
        Bytes::new()
    }
}

/// Prepare calldata for the bridge contract's `Initialize` method
pub fn bridge_initialize_calldata() -> Bytes {
    InitializeCall {}.abi_encode().into()
}

/// Arrange the proxy constructor arguments for the proxy's constructor shape
///
/// A `TransparentUpgradeableProxy` takes `(logic, initialOwner, data)`, an
/// `ERC1967Proxy` takes `(logic, data)`
pub fn proxy_constructor_args(
    proxy: &Artifact,
    implementation: Address,
    owner: Address,
    init_data: Bytes,
) -> Result<Vec<DynSolValue>, ScriptError> {
    let num_inputs = proxy.abi.constructor.as_ref().map_or(0, |c| c.inputs.len());
    let implementation = DynSolValue::Address(implementation);
    let init_data = DynSolValue::Bytes(init_data.to_vec());

    match num_inputs {
        2 => Ok(vec![implementation, init_data]),
        3 => Ok(vec![implementation, DynSolValue::Address(owner), init_data]),
        n => Err(ScriptError::CalldataConstruction(format!(
            "unsupported proxy constructor with {n} arguments in `{}`",
            proxy.contract_name
        ))),
    }
}

/// Extract the address held in the low-order bytes of a storage word
pub fn address_from_storage_word(word: U256) -> Address {
    let bytes = word.to_be_bytes::<NUM_BYTES_STORAGE_SLOT>();
    Address::from_slice(&bytes[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..])
}

/// Write a single result line to the script's output
pub fn write_line(out: &mut impl Write, line: &str) -> Result<(), ScriptError> {
    writeln!(out, "{line}")
        .and_then(|_| out.flush())
        .map_err(|e| ScriptError::WriteOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};
    use serde_json::json;

    use super::{
        address_from_storage_word, bridge_initialize_calldata, proxy_constructor_args,
        proxy_initializer_calldata,
    };
    use crate::artifacts::Artifact;

    fn artifact(name: &str, abi: serde_json::Value) -> Artifact {
        Artifact::from_json(
            &json!({ "contractName": name, "abi": abi, "bytecode": "0x6080" }).to_string(),
        )
        .unwrap()
    }

    fn nullary(name: &str) -> serde_json::Value {
        json!({
            "type": "function",
            "name": name,
            "inputs": [],
            "outputs": [],
            "stateMutability": "nonpayable"
        })
    }

    #[test]
    fn test_initialize_selectors() {
        // keccak256("Initialize()") and keccak256("initialize()")
        assert_eq!(bridge_initialize_calldata().to_string(), "0x80f86009");

        let with_initializer = artifact("BridgeSwap", json!([nullary("initialize")]));
        assert_eq!(proxy_initializer_calldata(&with_initializer).to_string(), "0x8129fc1c");
    }

    #[test]
    fn test_proxy_initializer_empty_without_initialize() {
        let bridge = artifact("BridgeSwap", json!([nullary("Initialize")]));
        assert!(proxy_initializer_calldata(&bridge).is_empty());
    }

    #[test]
    fn test_proxy_constructor_shapes() {
        let input = |name: &str, ty: &str| json!({ "name": name, "type": ty });
        let implementation = Address::with_last_byte(1);
        let owner = Address::with_last_byte(2);

        let transparent = artifact(
            "TransparentUpgradeableProxy",
            json!([{
                "type": "constructor",
                "stateMutability": "payable",
                "inputs": [
                    input("_logic", "address"),
                    input("initialOwner", "address"),
                    input("_data", "bytes")
                ]
            }]),
        );
        let args =
            proxy_constructor_args(&transparent, implementation, owner, Default::default()).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args[1].as_address(), Some(owner));

        let erc1967 = artifact(
            "ERC1967Proxy",
            json!([{
                "type": "constructor",
                "stateMutability": "payable",
                "inputs": [input("implementation", "address"), input("_data", "bytes")]
            }]),
        );
        let args =
            proxy_constructor_args(&erc1967, implementation, owner, Default::default()).unwrap();
        assert_eq!(args[0].as_address(), Some(implementation));

        let no_constructor = artifact("Proxy", json!([]));
        assert!(proxy_constructor_args(&no_constructor, implementation, owner, Default::default())
            .is_err());
    }

    #[test]
    fn test_address_from_storage_word() {
        let admin = Address::repeat_byte(0xab);
        let word = U256::from_be_slice(admin.as_slice());
        assert_eq!(address_from_storage_word(word), admin);
    }
}
