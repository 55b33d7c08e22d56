//! Constants used in the deploy scripts

use alloy::primitives::{b256, B256};

// -----------------
// | Configuration |
// -----------------

/// The environment variable holding the Alchemy API key for Sepolia
pub const SEPOLIA_API_KEY_VAR: &str = "Sepolia_API_KEY";

/// The environment variable holding the Alchemy API key for Polygon Mumbai
pub const MUMBAI_API_KEY_VAR: &str = "Mumbai_API_KEY";

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";

/// The environment variable holding the Etherscan verification API key
pub const ETHERSCAN_API_KEY_VAR: &str = "EtherScan_API_KEY";

/// The environment variable holding the Polygonscan verification API key
pub const POLYGONSCAN_API_KEY_VAR: &str = "PolygonScan_API_KEY";

/// The name of the Sepolia test network
pub const SEPOLIA_NETWORK: &str = "sepolia";

/// The name of the Polygon Mumbai test network
pub const MUMBAI_NETWORK: &str = "polygonMumbai";

/// The name of the local development network
pub const LOCALHOST_NETWORK: &str = "localhost";

/// The Alchemy RPC endpoint for Sepolia, to which the API key is appended
pub const SEPOLIA_RPC_URL_PREFIX: &str = "https://eth-sepolia.g.alchemy.com/v2/";

/// The Alchemy RPC endpoint for Polygon Mumbai, to which the API key is appended
pub const MUMBAI_RPC_URL_PREFIX: &str = "https://polygon-mumbai.g.alchemy.com/v2/";

/// The RPC endpoint of a locally running development node
pub const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8545";

/// The chain ID of Sepolia
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// The chain ID of Polygon Mumbai
pub const MUMBAI_CHAIN_ID: u64 = 80_001;

/// The chain ID of a local development node
pub const LOCALHOST_CHAIN_ID: u64 = 31_337;

/// The Solidity compiler version the contracts are built with
pub const SOLC_VERSION: &str = "0.8.19";

/// The number of optimizer runs the contracts are built with
pub const OPTIMIZER_RUNS: u32 = 200;

// -------------
// | Artifacts |
// -------------

/// The default directory in which compilation artifacts are found
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The artifacts subdirectory holding full compiler inputs and outputs, never searched
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of a Solidity source directory in the artifacts tree
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of an artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The marker the compiler leaves in bytecode for each unlinked library
pub const LIBRARY_PLACEHOLDER_MARKER: &str = "__$";

// -------------
// | Contracts |
// -------------

/// The name of the test token contract
pub const TEST_TOKEN_CONTRACT: &str = "TestToken";

/// The name of the bridge contract deployed behind the proxy
pub const BRIDGE_SWAP_CONTRACT: &str = "BridgeSwap";

/// The name of the upgradeable proxy contract
///
/// Concretely, this is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
/// which itself deploys a `ProxyAdmin` contract owned by the deployer.
pub const PROXY_CONTRACT: &str = "TransparentUpgradeableProxy";

/// The label used when announcing a single deployed contract
pub const DEFAULT_CONTRACT_LABEL: &str = "Bridge";

/// The test tokens deployed by `deploy-tokens`, as `(label, name, symbol)`
pub const TEST_TOKENS: [(&str, &str, &str); 3] = [
    ("TokenA", "Token A", "TA"),
    ("tokenB", "Token B", "TB"),
    ("tokenC", "Token C", "TC"),
];

/// The name of the initializer the proxy constructor runs, if the implementation has one
pub const DEFAULT_INITIALIZER: &str = "initialize";

// --------------
// | Deployment |
// --------------

/// The default number of confirmations to wait for on each transaction
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;
